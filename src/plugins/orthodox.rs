//! The orthodox chess pieces. The pawn carries the plugin's only stateful
//! machinery: a first-move double push capped by a post hook, promotion
//! rewriting by the capture atom's post hook, and en-passant eligibility
//! tracked in a piece prop that the half-turn-ended handler maintains (and
//! frame rollback therefore reverts). The king contributes castling as a
//! special two-leg half-turn with any unmoved castle partner on its rank.

use crate::atom::{Atom, DirectionGroup, Modifiers, MoveContext};
use crate::board::Board;
use crate::moves::{HalfTurn, Move};
use crate::piece::{Piece, PieceProps};
use crate::registry::{PieceDef, PieceRegistry};
use crate::types::{PieceId, Pos};

const EN_PASSANT_PROP: &str = "en_passant_target";

pub fn install(registry: &mut PieceRegistry) {
    registry.register(
        PieceDef::new("orthodox:pawn", "Pawn")
            .atom(
                Atom::new(1, 0)
                    .range(2)
                    .directions(&[DirectionGroup::Forward])
                    .modifiers(Modifiers::NON_CAPTURE_ONLY)
                    .post(cap_double_push),
            )
            .atom(
                Atom::new(1, 1)
                    .directions(&[DirectionGroup::Forward])
                    .modifiers(Modifiers::CAPTURE_ONLY)
                    .post(promote),
            )
            .special(en_passant)
            .on_half_turn_end(track_double_push),
    );
    registry.register(
        PieceDef::new("orthodox:rook", "Rook")
            .atom(Atom::new(1, 0).range(0))
            .promotion_target()
            .castle_partner(),
    );
    registry.register(
        PieceDef::new("orthodox:knight", "Knight")
            .atom(Atom::new(2, 1))
            .promotion_target(),
    );
    registry.register(
        PieceDef::new("orthodox:bishop", "Bishop")
            .atom(Atom::new(1, 1).range(0))
            .promotion_target(),
    );
    registry.register(
        PieceDef::new("orthodox:queen", "Queen")
            .atom(Atom::new(1, 1).range(0))
            .atom(Atom::new(1, 0).range(0))
            .promotion_target(),
    );
    registry.register(
        PieceDef::new("orthodox:king", "King")
            .atom(Atom::new(1, 1))
            .atom(Atom::new(1, 0))
            .royal()
            .special(castle),
    );
}

/// Once a pawn has moved, only the single-step advance of its push atom
/// survives.
fn cap_double_push(
    _ctx: &MoveContext,
    piece: &Piece,
    mut fresh: Vec<HalfTurn>,
    mut acc: Vec<HalfTurn>,
) -> Vec<HalfTurn> {
    if piece.has_moved && fresh.len() > 1 {
        fresh.truncate(1);
    }
    acc.append(&mut fresh);
    acc
}

/// Rewrites every candidate whose farthest own relocation lands on a
/// promotion-flagged tile into one variant per registered promotion target:
/// the relocation becomes a remove-and-spawn carrying the pawn's faction and
/// facing.
fn promote(
    ctx: &MoveContext,
    piece: &Piece,
    fresh: Vec<HalfTurn>,
    mut all: Vec<HalfTurn>,
) -> Vec<HalfTurn> {
    all.extend(fresh);
    let plugin = piece.kind.split(':').next().unwrap_or("");
    let targets = ctx.registry.promotion_targets(plugin);
    if targets.is_empty() {
        return all;
    }

    let mut out = Vec::with_capacity(all.len());
    for half_turn in all {
        let mut farthest = None;
        let mut best = 0;
        for (i, mv) in half_turn.iter().enumerate() {
            if mv.piece != Some(piece.id) || !mv.is_relocation() {
                continue;
            }
            let dy = (mv.to.map_or(piece.y(), |to| to.y) - piece.y()).abs();
            if dy > best || farthest.is_none() {
                farthest = Some(i);
                best = dy;
            }
        }
        let idx = match farthest {
            Some(idx) => idx,
            None => {
                out.push(half_turn);
                continue;
            }
        };
        let dest = half_turn[idx].to.unwrap_or(piece.pos);
        if !ctx.board.get(dest).map_or(false, |t| t.flag("promotion")) {
            out.push(half_turn);
            continue;
        }
        for def in &targets {
            let name = if piece.name == "Pawn" {
                format!("{} (Promoted Pawn)", def.name)
            } else {
                piece.name.clone()
            };
            let props = PieceProps {
                name: Some(name),
                faction: Some(piece.faction),
                forwards: Some(piece.forwards),
                has_moved: Some(true),
                ..PieceProps::default()
            };
            let mut variant = half_turn.clone();
            variant[idx] = Move {
                namespace: Some(def.namespace.clone()),
                spawn_at: Some(dest),
                spawn_props: Some(props),
                remove_at: half_turn[idx].from,
                continues: half_turn[idx].continues,
                ..Move::default()
            };
            out.push(variant);
        }
    }
    out
}

/// En-passant candidates: for every capturable piece advertising an
/// en-passant target, a diagonal advance that crosses the line of that
/// piece's last move (strictly before its endpoint) captures it in passing.
fn en_passant(ctx: &MoveContext, piece: &Piece, _log: &[Move]) -> Vec<HalfTurn> {
    let mut moves = Vec::new();
    let targets: Vec<(&Piece, Pos)> = ctx
        .board
        .pieces()
        .filter(|p| p.is_capturable_by(piece))
        .filter_map(|p| {
            let value = p.props.get(EN_PASSANT_PROP)?;
            let origin: Pos = serde_json::from_value(value.clone()).ok()?;
            Some((p, origin))
        })
        .filter(|(_, origin)| origin.is_valid())
        .collect();

    for offset in &[Pos::new(-1, 1), Pos::new(1, 1)] {
        let tile = match piece.relative_tile(ctx.board, *offset) {
            Some(tile) => tile,
            None => continue,
        };
        for &(target, origin) in &targets {
            let m = target.pos - origin;
            // The candidate tile must lie on the target's movement line,
            // strictly between its endpoints. Distances to the perpendicular
            // bisector are compared at twice the scale to stay integral.
            let line = m.x * (tile.pos.y - target.pos.y) - m.y * (tile.pos.x - target.pos.x);
            let dist = |p: Pos| {
                (m.y * (2 * p.y - (origin.y + target.pos.y))
                    - m.x * (2 * p.x - (origin.x + target.pos.x)))
                    .abs()
            };
            if line != 0 || dist(tile.pos) >= dist(target.pos) {
                continue;
            }
            let mut half_turn = Vec::new();
            if let Some(occupant) = &tile.piece {
                if !occupant.is_capturable_by(piece) {
                    continue;
                }
                half_turn.push(Move::capture(piece.id, tile.pos).continuing());
            }
            half_turn
                .push(Move::relocation(piece.id, piece.pos, tile.pos).with_capture(target.pos));
            moves.push(half_turn);
        }
    }
    moves
}

/// Maintains the pawn's en-passant eligibility prop at every half-turn end:
/// an existing mark expires, and a move of more than one tile sets a fresh
/// mark at the move's origin.
fn track_double_push(board: &mut Board, id: PieceId, half_turn: &[Move]) {
    let (pos, has_moved) = match board.piece(id) {
        Some(p) => (p.pos, p.has_moved),
        None => return,
    };
    if !has_moved {
        return;
    }
    let last_origin = half_turn
        .iter()
        .rev()
        .find(|mv| mv.piece == Some(id))
        .and_then(|mv| mv.from);
    let piece = match board.piece_mut(id) {
        Some(p) => p,
        None => return,
    };
    piece.props.remove(EN_PASSANT_PROP);
    let origin = match last_origin {
        Some(origin) if origin.is_valid() => origin,
        _ => return,
    };
    if (pos.x - origin.x).abs() + (pos.y - origin.y).abs() > 1 {
        if let Ok(value) = serde_json::to_value(origin) {
            piece.props.insert(EN_PASSANT_PROP.to_string(), value);
        }
    }
}

/// Castling: probe outward along the king's rank in both directions; the
/// first piece met decides. An unmoved friendly castle partner yields a
/// two-leg half-turn, king two tiles toward it and the partner beside the
/// king's destination.
fn castle(ctx: &MoveContext, piece: &Piece, _log: &[Move]) -> Vec<HalfTurn> {
    let mut moves = Vec::new();
    if piece.has_moved || !piece.pos.is_valid() {
        return moves;
    }
    let mut dirs = vec![-1i32, 1i32];
    let mut n = 1;
    while n < ctx.board.width() && !dirs.is_empty() {
        dirs.retain(|&dx| {
            let tile = match ctx.board.get(Pos::new(piece.x() + n * dx, piece.y())) {
                Some(tile) => tile,
                None => return false,
            };
            let partner = match &tile.piece {
                Some(partner) => partner,
                None => return true,
            };
            let eligible = ctx
                .registry
                .get(&partner.kind)
                .map_or(false, |def| def.castle_partner)
                && !partner.has_moved
                && partner.faction == piece.faction;
            if eligible {
                moves.push(vec![
                    Move::relocation(piece.id, piece.pos, Pos::new(piece.x() + 2 * dx, piece.y()))
                        .continuing(),
                    Move::relocation(partner.id, partner.pos, Pos::new(piece.x() + dx, piece.y())),
                ]);
            }
            false
        });
        n += 1;
    }
    moves
}
