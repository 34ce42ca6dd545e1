use sweeper_core::*;

fn layout(size: Coord2, mines: &[Coord2]) -> FixedLayoutGenerator {
    FixedLayoutGenerator(MineLayout::from_mine_coords(size, mines).unwrap())
}

#[test]
fn flag_then_clear_the_board() {
    // . . . . .
    // . . . * .
    // * . . . .
    let mines = [(1, 3), (2, 0)];
    let mut session = Session::new(GameConfig::new((3, 5), 2));
    session.start_with(layout((3, 5), &mines));

    assert_eq!(session.secondary_click((1, 3)).unwrap(), MarkOutcome::Flagged);
    assert_eq!(session.secondary_click((1, 0)).unwrap(), MarkOutcome::Flagged);
    assert_eq!(session.mines_left(), 0);

    // (0, 0) is a zero cell, the cascade opens (1, 0) and drops its flag
    assert_eq!(session.primary_click((0, 0)).unwrap(), SessionEvent::Updated);
    assert_eq!(session.mines_left(), 1);
    let board = session.board().unwrap();
    assert!(!board.cell((1, 0)).unwrap().is_flagged());
    assert_eq!(board.cell((1, 0)).unwrap().appearance().number, Some(1));

    // the flagged mine still renders its flag
    assert_eq!(
        board.cell((1, 3)).unwrap().appearance().icon,
        Some(Icon::Flag)
    );

    let remaining: Vec<_> = session
        .grid()
        .unwrap()
        .iter()
        .filter(|(_, cell)| cell.is_pending_safe())
        .map(|(coords, _)| coords)
        .collect();
    let (last, rest) = remaining.split_last().unwrap();
    for &coords in rest {
        assert_eq!(session.primary_click(coords).unwrap(), SessionEvent::Updated);
    }
    assert_eq!(session.primary_click(*last).unwrap(), SessionEvent::Won);
    assert_eq!(session.result_text(), Some("You Win!"));
}

#[test]
fn loss_shows_every_mine_then_result() {
    let mines = [(0, 0), (2, 2), (1, 3)];
    let mut session = Session::new(GameConfig::new((3, 4), 3));
    session.start_with(layout((3, 4), &mines));
    session.secondary_click((2, 2)).unwrap();

    let event = session.primary_click((1, 3)).unwrap();
    let SessionEvent::Detonated { generation, delay } = event else {
        panic!("expected detonation, got {:?}", event);
    };
    assert_eq!(delay, DEFEAT_WATCH_BOARD_TIME);

    let board = session.board().unwrap();
    let mine_views: Vec<_> = board
        .iter()
        .filter(|view| view.appearance().icon == Some(Icon::Mine))
        .map(CellView::coords)
        .collect();
    assert_eq!(mine_views, [(0, 0), (1, 3), (2, 2)]);
    let detonated: Vec<_> = board
        .iter()
        .filter(|view| view.appearance().background == Background::Detonated)
        .map(CellView::coords)
        .collect();
    assert_eq!(detonated, [(1, 3)]);

    // no more moves while the board is on display
    assert_eq!(session.primary_click((0, 2)).unwrap(), SessionEvent::Ignored);
    assert_eq!(session.result_text(), None);

    assert!(session.show_result(generation));
    assert_eq!(session.result_text(), Some("You Lose :("));

    // a second delivery is harmless
    assert!(!session.show_result(generation));
}

#[test]
fn replaying_a_session_from_the_same_seed_matches() {
    let config = GameConfig::new((9, 9), 10);
    let mut a = Session::new(config);
    let mut b = Session::new(config);
    a.start(1234);
    b.start(1234);

    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.grid(), Some(&start_game(9, 9, 10, 1234)));
}
