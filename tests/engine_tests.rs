//! End-to-end state machine tests: committed games, trials, and rollback.

use chimera::config::GameConfig;
use chimera::{Engine, Faction, Move, Pos};

fn loaded() -> Engine {
    let mut engine = Engine::new();
    engine.load(&GameConfig::orthodox()).unwrap();
    engine
}

fn relocate(engine: &mut Engine, from: Pos, to: Pos) {
    let id = engine.board().piece_at(from).unwrap().id;
    engine
        .make_move(&[Move::relocation(id, from, to)])
        .unwrap();
}

#[test]
fn apply_then_undo_restores_the_exact_board() {
    let mut engine = loaded();
    let before = engine.board().clone();

    relocate(&mut engine, Pos::new(4, 1), Pos::new(4, 3));
    assert_ne!(before, *engine.board());

    engine.undo_half_turn();
    assert_eq!(before, *engine.board());
    assert_eq!(Faction(0), engine.turn());
}

#[test]
fn committed_capture_removes_the_victim() {
    let mut engine = loaded();
    relocate(&mut engine, Pos::new(4, 1), Pos::new(4, 3));
    relocate(&mut engine, Pos::new(3, 6), Pos::new(3, 4));

    let pawn = engine.board().piece_at(Pos::new(4, 3)).unwrap().id;
    let victim = engine.board().piece_at(Pos::new(3, 4)).unwrap().id;
    let capture =
        Move::relocation(pawn, Pos::new(4, 3), Pos::new(3, 4)).with_capture(Pos::new(3, 4));
    engine.make_move(&[capture]).unwrap();

    assert_eq!(31, engine.pieces().count());
    assert!(engine.board().piece(victim).is_none());
    assert_eq!(Pos::new(3, 4), engine.board().piece(pawn).unwrap().pos);
}

#[test]
fn turn_alternates_per_committed_half_turn() {
    let mut engine = loaded();
    assert_eq!(Faction(0), engine.turn());
    relocate(&mut engine, Pos::new(4, 1), Pos::new(4, 2));
    assert_eq!(Faction(1), engine.turn());
    relocate(&mut engine, Pos::new(4, 6), Pos::new(4, 5));
    assert_eq!(Faction(0), engine.turn());
}

#[test]
fn trial_of_a_multi_leg_half_turn_balances_the_stack() {
    let mut config = GameConfig::orthodox();
    config.board[0] = "r...k..r".to_string();
    let mut engine = Engine::new();
    engine.load(&config).unwrap();

    let king = engine.board().piece_at(Pos::new(4, 0)).unwrap().id;
    let castles: Vec<_> = engine
        .moves_for(king)
        .into_iter()
        .filter(|leg| leg.len() == 2)
        .collect();
    assert_eq!(2, castles.len());

    let before = engine.board().clone();
    let depth = engine.stack_len();
    for castle in &castles {
        assert!(engine.is_legal(castle));
        assert_eq!(depth, engine.stack_len());
        assert_eq!(before, *engine.board());
    }
}

#[test]
fn generated_moves_replay_a_short_game() {
    let mut engine = loaded();

    // 1. e4 d5 2. exd5: pick each move out of the generator's candidates.
    let steps = [
        (Pos::new(4, 1), Pos::new(4, 3)),
        (Pos::new(3, 6), Pos::new(3, 4)),
        (Pos::new(4, 3), Pos::new(3, 4)),
    ];
    for &(from, to) in &steps {
        let id = engine.board().piece_at(from).unwrap().id;
        let candidate = engine
            .moves_for(id)
            .into_iter()
            .find(|leg| leg.iter().any(|mv| mv.to == Some(to)))
            .unwrap_or_else(|| panic!("no candidate from {} to {}", from, to));
        engine.make_move(&candidate).unwrap();
    }

    assert_eq!(31, engine.pieces().count());
    let pawn = engine.board().piece_at(Pos::new(3, 4)).unwrap();
    assert_eq!("orthodox:pawn", pawn.kind);
    assert_eq!(Faction(0), pawn.faction);
    assert_eq!(Faction(1), engine.turn());
}

#[test]
fn undo_move_never_pops_the_initial_frame() {
    let mut engine = loaded();
    let depth = engine.stack_len();
    engine.undo_move();
    engine.undo_half_turn();
    assert_eq!(depth, engine.stack_len());
    assert!(engine.is_loaded());
    assert_eq!(32, engine.pieces().count());
}

#[test]
fn empty_half_turn_is_the_identity() {
    let mut engine = loaded();
    let depth = engine.stack_len();
    assert!(engine.is_legal(&[]));
    engine.make_move(&[]).unwrap();
    assert_eq!(depth, engine.stack_len());
}

#[test]
fn snapshot_reflects_committed_state() {
    let mut engine = loaded();
    relocate(&mut engine, Pos::new(4, 1), Pos::new(4, 3));

    let snapshot = engine.snapshot();
    assert_eq!(Faction(1), snapshot.turn);
    assert!(snapshot.moves.contains("orthodox:pawn"));
    let moved = snapshot
        .tiles
        .iter()
        .find(|t| t.pos == Pos::new(4, 3))
        .and_then(|t| t.piece.as_ref())
        .expect("pawn on its new tile");
    assert!(moved.has_moved);
}
