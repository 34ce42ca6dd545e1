use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Text currently shown in the three numeric inputs.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FieldTexts {
    pub rows: String,
    pub cols: String,
    pub mines: String,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Field {
    Rows,
    Cols,
    Mines,
}

#[derive(Properties, PartialEq)]
pub(crate) struct SetupProps {
    #[prop_or_default]
    pub open: bool,
    #[prop_or_default]
    pub result: Option<&'static str>,
    pub fields: FieldTexts,
    pub on_input: Callback<(Field, String)>,
    pub on_start: Callback<()>,
}

fn numeric_input(label: &'static str, field: Field, value: &str, on_input: &Callback<(Field, String)>) -> Html {
    let oninput = on_input.reform(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        (field, input.value())
    });
    html! {
        <label>
            {label}
            <input type="number" inputmode="numeric" value={value.to_string()} {oninput}/>
        </label>
    }
}

/// Configuration and result panel, shown before the first game and after each one.
#[function_component]
pub(crate) fn SetupView(props: &SetupProps) -> Html {
    let on_start = props.on_start.clone();
    let onclick = Callback::from(move |_: MouseEvent| on_start.emit(()));

    html! {
        <dialog id="setup" open={props.open}>
            <article>
                if let Some(result) = props.result {
                    <h2>{result}</h2>
                }
                <fieldset role="group">
                    {numeric_input("Width", Field::Cols, &props.fields.cols, &props.on_input)}
                    {numeric_input("Height", Field::Rows, &props.fields.rows, &props.on_input)}
                    {numeric_input("Mines", Field::Mines, &props.fields.mines, &props.on_input)}
                </fieldset>
                <footer>
                    <button {onclick}>{"Start"}</button>
                </footer>
            </article>
        </dialog>
    }
}
