use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use stackfall_engine::{
    Action, Field, PieceId, Position, Session, SessionConfig, SessionOverError, Shape,
};

fn assert_field_invariant(session: &Session) {
    let field = session.field();
    let mut seen = 0;
    for (y, row) in (0..).zip(field.rows()) {
        for (x, cell) in (0..).zip(row) {
            if let Some(cell) = cell {
                assert_eq!(cell.position(), Position::new(x, y), "misplaced {cell:?}");
                seen += 1;
            }
        }
    }
    assert_eq!(seen, field.occupied_count());

    if let Some(piece) = session.falling_piece() {
        assert!(piece.is_falling());
        for cell in piece.cells() {
            assert_eq!(field.get(cell.position()), Some(cell));
        }
    }
    // A hold whose replacement cannot spawn leaves the piece in both places.
    if session.is_running()
        && let Some(held) = session.held_piece()
    {
        assert!(field.occupied_cells().all(|cell| cell.piece() != held.id()));
    }
}

fn cells_of(session: &Session, id: PieceId) -> usize {
    session
        .field()
        .occupied_cells()
        .filter(|cell| cell.piece() == id)
        .count()
}

#[test]
fn test_drop_into_gap_clears_one_line() {
    let mut rows = "..........\n".repeat(19);
    rows.push_str("xxxxx.xxxx\n");
    let field = Field::from_ascii(&rows);
    let mut session = Session::with_field(SessionConfig::default(), field).unwrap();

    // Straight piece: lower it one row, stand it up on column 5, drop it.
    assert!(session.tick(Action::SoftDrop).unwrap().applied);
    assert!(session.tick(Action::RotateCw).unwrap().applied);
    assert!(
        session
            .falling_piece()
            .unwrap()
            .positions()
            .all(|p| p.x == 5)
    );

    let report = session.tick(Action::HardDrop).unwrap();
    assert!(report.landed);
    assert_eq!(report.cleared_lines, 1);
    assert_eq!(session.score(), 1);
    assert_eq!(session.stats().line_cleared_counter()[1], 1);

    // The three cells above the cleared row moved down into it and above.
    assert_eq!(session.field().occupied_count(), 3);
    for y in 17..20 {
        assert!(session.field().is_occupied(Position::new(5, y)));
    }
    assert!(!session.field().is_row_solid(19));
    assert_field_invariant(&session);
}

#[test]
fn test_hold_removes_piece_until_swapped_back() {
    let mut session = Session::new(SessionConfig::default()).unwrap();
    session.tick(Action::None).unwrap();
    let straight = session.falling_piece().unwrap().id();
    assert_eq!(cells_of(&session, straight), 4);

    session.tick(Action::Hold).unwrap();
    assert_eq!(cells_of(&session, straight), 0);
    assert_eq!(session.held_piece().map(|p| p.shape()), Some(Shape::I));
    assert_field_invariant(&session);

    session.tick(Action::HardDrop).unwrap();
    session.tick(Action::MoveLeft).unwrap();
    assert_eq!(cells_of(&session, straight), 0);

    let report = session.tick(Action::Hold).unwrap();
    assert!(report.applied);
    assert_eq!(cells_of(&session, straight), 4);
    assert_eq!(session.falling_piece().map(|p| p.id()), Some(straight));
    assert_eq!(session.held_piece().map(|p| p.shape()), Some(Shape::L));
    assert_field_invariant(&session);
}

#[test]
fn test_session_ends_when_stack_reaches_spawn() {
    let mut session = Session::new(SessionConfig::new(10, 8)).unwrap();

    let mut ticks = 0;
    loop {
        let report = session.tick(Action::HardDrop).unwrap();
        assert_field_invariant(&session);
        ticks += 1;
        if report.game_over {
            break;
        }
        assert!(ticks < 100, "session never ended");
    }

    assert!(!session.is_running());
    assert!(session.falling_piece().is_none());
    assert_eq!(session.tick(Action::None), Err(SessionOverError));
    assert_eq!(session.tick(Action::HardDrop), Err(SessionOverError));
}

#[test]
fn test_random_soak_keeps_field_consistent() {
    for seed in 0..8 {
        let mut rng = Pcg32::seed_from_u64(seed);
        let config = SessionConfig::new(8, 12);
        let mut session = Session::new(config).unwrap();

        for _ in 0..2000 {
            let action = Action::ALL[rng.random_range(0..Action::ALL.len())];
            let report = session.tick(action).unwrap();
            assert_field_invariant(&session);

            if report.game_over {
                break;
            }

            // Nothing leaves the field except through cleared rows.
            let falling = usize::from(session.falling_piece().is_some());
            let stats = session.stats();
            assert_eq!(
                session.field().occupied_count() + stats.score() * config.width,
                (stats.landed_pieces() + falling) * 4,
                "seed {seed}"
            );
        }
    }
}
