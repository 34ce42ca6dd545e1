use crate::setup::{Field, FieldTexts, SetupView};
use crate::utils::*;
use bitflags::bitflags;
use clap::Args;
use gloo::timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use sweeper_core as game;
use yew::prelude::*;

/// Viewport height in cell units, boards taller than this shrink their cells.
const GRID_HEIGHT: f32 = 18.0;
/// Pixel size of one cell unit.
const CELL_UNIT_PX: f32 = 32.0;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CellPointerState {
    pos: game::Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CellMsg {
    Update(CellPointerState),
    Leave,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    FieldInput(Field, String),
    StartGame,
    ShowResult(u32),
}

fn cell_classes(appearance: game::CellAppearance) -> Classes {
    use game::{Background, Icon};

    classes!(
        "cell",
        match appearance.background {
            Background::Undiscovered => None,
            Background::Discovered => Some("open"),
            Background::Detonated => Some("oops"),
        },
        match appearance.icon {
            None => None,
            Some(Icon::Flag) => Some("flag"),
            Some(Icon::Mine) => Some("mine"),
        },
        appearance.number.map(|count| format!("num-{}", count)),
    )
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    pos: game::Coord2,
    appearance: game::CellAppearance,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        pos,
        appearance,
        callback,
    } = props.clone();

    let class = cell_classes(appearance);
    let text = appearance.number.map(|count| count.to_string());

    let pointer = |event: &'static str| {
        let callback = callback.clone();
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(CellMsg::Update(CellPointerState { pos, buttons }));
            log::trace!("{:?} mouse {} ({:?})", pos, event, buttons);
        })
    };
    let onmousedown = pointer("down");
    let onmouseup = pointer("up");
    let onmouseenter = pointer("enter");
    let onmouseleave = {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| {
            callback.emit(CellMsg::Leave);
            log::trace!("{:?} mouse leave", pos);
        })
    };

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseenter} {onmouseleave}>{text.unwrap_or_default()}</td>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board height to start with
    #[arg(long)]
    rows: Option<i64>,

    /// Board width to start with
    #[arg(long)]
    cols: Option<i64>,

    /// Mine count to start with
    #[arg(long)]
    mines: Option<i64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    session: game::Session,
    fields: FieldTexts,
    forced_seed: Option<u64>,
    current_cell_state: Option<CellPointerState>,
    defeat_timer: Option<Timeout>,
}

impl GameView {
    fn initial_config(props: &GameProps) -> game::GameConfig {
        let mut config = game::GameConfig::local_or_default();
        if let Some(rows) = props.rows {
            config.set_rows(rows);
        }
        if let Some(cols) = props.cols {
            config.set_cols(cols);
        }
        if let Some(mines) = props.mines {
            config.set_mines(mines);
        }
        config.normalized()
    }

    fn fields_for(config: game::GameConfig) -> FieldTexts {
        FieldTexts {
            rows: config.rows().to_string(),
            cols: config.cols().to_string(),
            mines: config.mines.to_string(),
        }
    }

    fn update_field(&mut self, field: Field, text: String) -> bool {
        let (slot, stored) = match field {
            Field::Rows => (&mut self.fields.rows, i64::from(self.session.set_rows_text(&text))),
            Field::Cols => (&mut self.fields.cols, i64::from(self.session.set_cols_text(&text))),
            Field::Mines => (
                &mut self.fields.mines,
                i64::from(self.session.set_mines_text(&text)),
            ),
        };
        let text = field_text(text, stored);
        if *slot != text {
            *slot = text;
            true
        } else {
            // the input already shows it
            false
        }
    }

    fn start_game(&mut self) {
        let seed = self.forced_seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        // dropping a pending timeout cancels it
        self.defeat_timer = None;
        self.session.start(seed);
        self.session.config().local_save();
        self.fields = Self::fields_for(self.session.config());
    }

    fn on_session_event(&mut self, ctx: &Context<Self>, event: game::SessionEvent) -> bool {
        if let game::SessionEvent::Detonated { generation, delay } = event {
            let link = ctx.link().clone();
            let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
            self.defeat_timer = Some(Timeout::new(millis, move || {
                link.send_message(Msg::ShowResult(generation))
            }));
        }
        event.has_update()
    }

    fn reveal_cell(&mut self, ctx: &Context<Self>, pos: game::Coord2) -> bool {
        match self.session.primary_click(pos) {
            Ok(event) => {
                log::debug!("reveal {:?}: {:?}", pos, event);
                self.on_session_event(ctx, event)
            }
            Err(err) => {
                log::error!("reveal {:?} failed: {}", pos, err);
                false
            }
        }
    }

    fn mark_cell(&mut self, pos: game::Coord2) -> bool {
        match self.session.secondary_click(pos) {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::error!("mark {:?} failed: {}", pos, err);
                false
            }
        }
    }

    fn on_pointer(&mut self, ctx: &Context<Self>, msg: CellMsg) -> bool {
        match msg {
            CellMsg::Leave => self.current_cell_state.take().is_some(),
            CellMsg::Update(cell_state) if cell_state.buttons.is_empty() => {
                match self.current_cell_state.take() {
                    None => false,
                    Some(CellPointerState { pos, buttons }) => match buttons {
                        MouseButtons::LEFT => self.reveal_cell(ctx, pos),
                        MouseButtons::RIGHT => self.mark_cell(pos),
                        _ => false,
                    },
                }
            }
            CellMsg::Update(cell_state) => {
                self.current_cell_state.replace(cell_state);
                false
            }
        }
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let Some(board) = self.session.board() else {
            return html! {};
        };

        let layout = board.layout(GRID_HEIGHT);
        let style = format!("--cell-size: {}px", layout.cell_side * CELL_UNIT_PX);
        let playable = self.session.phase().is_playing();

        html! {
            <table {style} class={playable.then_some("playable")}>
                {
                    for board.rows().map(|row| html! {
                        <tr>
                            {
                                for row.map(|view| {
                                    let pos = view.coords();
                                    let appearance = view.appearance();
                                    let callback = ctx.link().callback(Msg::CellEvent);
                                    html! {
                                        <CellView {pos} {appearance} {callback}/>
                                    }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = GameView::initial_config(ctx.props());
        Self {
            session: game::Session::new(config),
            fields: GameView::fields_for(config),
            forced_seed: ctx.props().seed,
            current_cell_state: None,
            defeat_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CellEvent(cell_msg) => self.on_pointer(ctx, cell_msg),
            FieldInput(field, text) => self.update_field(field, text),
            StartGame => {
                self.start_game();
                true
            }
            ShowResult(generation) => {
                self.defeat_timer = None;
                self.session.show_result(generation)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let mines_left = format_for_counter(self.session.mines_left());
        let on_input = ctx.link().callback(|(field, text): (Field, String)| Msg::FieldInput(field, text));
        let on_start = ctx.link().callback(|_: ()| Msg::StartGame);

        html! {
            <div class="sweeper" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside>{mines_left}</aside>
                </nav>
                {self.view_board(ctx)}
                <SetupView
                    open={self.session.phase().shows_panel()}
                    result={self.session.result_text()}
                    fields={self.fields.clone()}
                    {on_input}
                    {on_start}
                />
            </div>
        }
    }
}
