use blockfall::core::GameState;
use blockfall::term::{GameView, Viewport, PANEL_WIDTH};
use blockfall::types::{GameAction, PieceKind};

/// Exactly board frame + gap + panel, so the frame sits at (0, 0).
fn snug() -> Viewport {
    Viewport::new(22 + 2 + PANEL_WIDTH, 22)
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(1).snapshot();
    let fb = GameView::default().render(&snap, snug());

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(21, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 21).unwrap().ch, '└');
    assert_eq!(fb.get(21, 21).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_locked_cell_as_two_chars_wide() {
    let mut snap = GameState::new(1).snapshot();
    snap.board[19][0] = PieceKind::I.code();
    snap.current = None;
    snap.ghost_y = None;

    let fb = GameView::default().render(&snap, snug());

    assert_eq!(fb.get(1, 20).unwrap().ch, '█');
    assert_eq!(fb.get(2, 20).unwrap().ch, '█');
    assert_ne!(fb.get(3, 20).unwrap().ch, '█');
}

#[test]
fn term_view_panel_tracks_score() {
    let mut snap = GameState::new(1).snapshot();
    snap.score = 1234;
    snap.level = 2;
    snap.lines_cleared = 10;

    let fb = GameView::default().render(&snap, snug());
    let rows: Vec<String> = (0..fb.height()).map(|y| fb.row_text(y)).collect();

    let score_row = rows.iter().position(|r| r.ends_with("SCORE")).unwrap();
    assert!(rows[score_row + 1].ends_with("1234"));
    let lines_row = rows.iter().position(|r| r.ends_with("LINES")).unwrap();
    assert!(rows[lines_row + 1].ends_with("10"));
}

#[test]
fn term_view_survives_a_whole_game() {
    let view = GameView::default();
    let mut fb = view.render(&GameState::new(5).snapshot(), snug());

    let mut state = GameState::new(5);
    let moves = [GameAction::Left, GameAction::Rotate, GameAction::Right];
    let mut i = 0;
    while !state.game_over() {
        state = state.apply(moves[i % moves.len()]).apply(GameAction::HardDrop).tick();
        view.render_into(&state.snapshot(), snug(), &mut fb);
        i += 1;
        assert!(i < 1000, "game never ended");
    }

    let text: String = (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect();
    assert!(text.contains("GAME OVER"));
}
