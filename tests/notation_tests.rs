//! Notation codec tests at the engine boundary: serialized logs must replay
//! into an equivalent game on a fresh engine.

use chimera::config::GameConfig;
use chimera::{notation, split_legs, Engine, Pos};

fn loaded() -> Engine {
    let mut engine = Engine::new();
    engine.load(&GameConfig::orthodox()).unwrap();
    engine
}

fn make(engine: &mut Engine, from: Pos, to: Pos) {
    let id = engine.board().piece_at(from).unwrap().id;
    let candidate = engine
        .moves_for(id)
        .into_iter()
        .find(|leg| leg.iter().any(|mv| mv.to == Some(to)))
        .unwrap_or_else(|| panic!("no candidate from {} to {}", from, to));
    engine.make_move(&candidate).unwrap();
}

fn replay(config: &GameConfig, text: &str) -> Engine {
    let mut engine = Engine::new();
    engine.load(config).unwrap();
    let moves = notation::parse(engine.registry(), text);
    for leg in split_legs(&moves) {
        engine.make_move(leg).unwrap();
    }
    engine
}

#[test]
fn serialized_log_names_namespaces_and_positions() {
    let mut engine = loaded();
    make(&mut engine, Pos::new(4, 1), Pos::new(4, 3));

    let text = notation::serialize(engine.moves());
    assert_eq!("orthodox:pawn -0001000400030004", text);
}

#[test]
fn a_committed_game_replays_identically() {
    let config = GameConfig::orthodox();
    let mut original = loaded();
    make(&mut original, Pos::new(4, 1), Pos::new(4, 3));
    make(&mut original, Pos::new(3, 6), Pos::new(3, 4));
    make(&mut original, Pos::new(4, 3), Pos::new(3, 4));
    make(&mut original, Pos::new(3, 7), Pos::new(3, 4));

    let text = notation::serialize(original.moves());
    let replayed = replay(&config, &text);

    assert_eq!(*original.board(), *replayed.board());
    assert_eq!(original.turn(), replayed.turn());
    assert_eq!(text, notation::serialize(replayed.moves()));
}

#[test]
fn castling_round_trips_as_one_block() {
    let mut config = GameConfig::orthodox();
    config.board[0] = "r...k..r".to_string();

    let mut original = Engine::new();
    original.load(&config).unwrap();
    let king = original.board().piece_at(Pos::new(4, 0)).unwrap().id;
    let castle = original
        .moves_for(king)
        .into_iter()
        .find(|leg| leg.len() == 2 && leg[0].to == Some(Pos::new(6, 0)))
        .expect("kingside castle");
    original.make_move(&castle).unwrap();

    let text = notation::serialize(original.moves());
    // Two moves, one block: a single newline between them, no blank line.
    assert_eq!(1, text.matches('\n').count());

    let replayed = replay(&config, &text);
    assert_eq!(*original.board(), *replayed.board());
}

#[test]
fn promotion_spawn_props_round_trip() {
    let mut config = GameConfig::orthodox();
    config.board = vec![
        "....".to_string(),
        "....".to_string(),
        "p...".to_string(),
        "^^^^".to_string(),
    ];
    config.key.insert(
        "^".to_string(),
        chimera::config::KeyEntry {
            piece: None,
            tile: config.key.get("r").and_then(|e| e.tile.clone()),
        },
    );

    let mut original = Engine::new();
    original.load(&config).unwrap();
    let pawn = original.board().piece_at(Pos::new(0, 2)).unwrap().id;
    let promotion = original
        .moves_for(pawn)
        .into_iter()
        .find(|leg| leg[0].namespace.as_deref() == Some("orthodox:queen"))
        .expect("queen promotion");
    original.make_move(&promotion).unwrap();

    let text = notation::serialize(original.moves());
    assert!(text.contains("orthodox:queen"));
    assert!(text.contains("Queen (Promoted Pawn)"));

    let replayed = replay(&config, &text);
    let piece = replayed.board().piece_at(Pos::new(0, 3)).unwrap();
    assert_eq!("orthodox:queen", piece.kind);
    assert_eq!("Queen (Promoted Pawn)", piece.name);
    assert!(replayed.board().piece_at(Pos::new(0, 2)).is_none());
}

#[test]
fn dangling_namespace_replays_as_a_no_op_move() {
    let mut engine = loaded();
    let moves = notation::parse(engine.registry(), "lost:ghost -0003000400040004");
    assert_eq!(1, moves.len());
    assert_eq!(Some("lost:ghost".to_string()), moves[0].namespace);

    // Forcing it is tolerated: no piece resolves at the empty source tile
    // and the namespace spawns nothing, so the board is unchanged.
    let before = engine.board().clone();
    engine.force_move(&moves);
    assert_eq!(before, *engine.board());
}

#[test]
fn serialize_of_an_empty_log_is_empty() {
    let engine = loaded();
    assert_eq!("", notation::serialize(engine.moves()));
    let parsed = notation::parse(engine.registry(), "");
    assert!(parsed.is_empty());
}

#[test]
fn parse_is_insensitive_to_hex_case() {
    let engine = loaded();
    let lower = notation::parse(engine.registry(), "orthodox:pawn -000a000400030004");
    let upper = notation::parse(engine.registry(), "orthodox:pawn -000A000400030004");
    assert_eq!(Some(Pos::new(4, 10)), upper[0].from);
    assert_eq!(lower[0].from, upper[0].from);
    assert_eq!(lower[0].to, upper[0].to);
}
