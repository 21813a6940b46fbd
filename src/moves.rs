//! The `moves` module defines the atomic change descriptor and half-turn
//! grouping. A `Move` is a passive record with no behavior: the engine reads
//! its optional fields to decide which side effects to apply. There is no
//! separate half-turn type; the `continues` flag chains a move to the next
//! one, and group boundaries are inferred by scanning until a move with
//! `continues == false`. Castling is simply two relocation moves with the
//! first marked as continuing.

use crate::piece::PieceProps;
use crate::types::{PieceId, Pos};

/// One atomic board change. A move with none of the relocation, removal,
/// capture, spawn, or drop fields set is a no-op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Move {
    /// The acting piece, when already resolved. Filled in during application.
    pub piece: Option<PieceId>,
    /// The acting piece's namespace, for changes where the piece is not yet
    /// resolved (notation, spawns).
    pub namespace: Option<String>,
    /// Relocation source. Meaningful only together with `to`.
    pub from: Option<Pos>,
    pub to: Option<Pos>,
    /// Deletion without being "captured" (e.g. the en-passant victim's tile
    /// cleared by a separate removal).
    pub remove_at: Option<Pos>,
    pub capture_at: Option<Pos>,
    /// Creation (promotion, spawning), with construction properties.
    pub spawn_at: Option<Pos>,
    pub spawn_props: Option<PieceProps>,
    /// Placement from a reserve.
    pub drop_at: Option<Pos>,
    /// Chains this move to the next one in the same half-turn.
    pub continues: bool,
}

impl Move {
    pub fn relocation(piece: PieceId, from: Pos, to: Pos) -> Move {
        Move {
            piece: Some(piece),
            from: Some(from),
            to: Some(to),
            ..Move::default()
        }
    }

    pub fn capture(piece: PieceId, at: Pos) -> Move {
        Move {
            piece: Some(piece),
            capture_at: Some(at),
            ..Move::default()
        }
    }

    pub fn removal(at: Pos) -> Move {
        Move {
            remove_at: Some(at),
            ..Move::default()
        }
    }

    pub fn spawn(namespace: &str, at: Pos, props: PieceProps) -> Move {
        Move {
            namespace: Some(namespace.to_string()),
            spawn_at: Some(at),
            spawn_props: Some(props),
            ..Move::default()
        }
    }

    pub fn drop(namespace: &str, at: Pos) -> Move {
        Move {
            namespace: Some(namespace.to_string()),
            drop_at: Some(at),
            ..Move::default()
        }
    }

    pub fn with_capture(mut self, at: Pos) -> Move {
        self.capture_at = Some(at);
        self
    }

    pub fn continuing(mut self) -> Move {
        self.continues = true;
        self
    }

    pub fn is_relocation(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }
}

/// One player's complete turn: one or more chained moves, applied as a unit.
pub type HalfTurn = Vec<Move>;

/// Splits a move sequence into half-turn leg groups. A group ends at the
/// first move whose `continues` flag is unset, or at the end of the input.
pub fn split_legs(moves: &[Move]) -> Vec<&[Move]> {
    let mut legs = Vec::new();
    let mut start = 0;
    for (i, mv) in moves.iter().enumerate() {
        if !mv.continues || i == moves.len() - 1 {
            legs.push(&moves[start..=i]);
            start = i + 1;
        }
    }
    legs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_continues() {
        let id = PieceId(1);
        let moves = vec![
            Move::relocation(id, Pos::new(4, 0), Pos::new(6, 0)).continuing(),
            Move::relocation(id, Pos::new(7, 0), Pos::new(5, 0)),
            Move::relocation(id, Pos::new(0, 1), Pos::new(0, 2)),
        ];
        let legs = split_legs(&moves);
        assert_eq!(2, legs.len());
        assert_eq!(2, legs[0].len());
        assert_eq!(1, legs[1].len());
    }

    #[test]
    fn trailing_continuation_forms_a_group() {
        let id = PieceId(1);
        let moves = vec![Move::relocation(id, Pos::new(0, 0), Pos::new(1, 1)).continuing()];
        let legs = split_legs(&moves);
        assert_eq!(1, legs.len());
        assert_eq!(1, legs[0].len());
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(split_legs(&[]).is_empty());
    }
}
