//! The fundamental leaper family: every piece is a single atom with range 1,
//! named by its leap vector in the fairy-chess tradition. Useful on its own
//! for exotic setups and as the building blocks the compound plugin glues
//! together.

use crate::atom::{Atom, MoveContext};
use crate::moves::{HalfTurn, Move};
use crate::piece::Piece;
use crate::registry::{PieceDef, PieceRegistry};

pub fn install(registry: &mut PieceRegistry) {
    registry.register(PieceDef::new("fundamental:zero", "Zero").special(stand_still));
    for &(id, name, x, y) in &[
        ("fundamental:wazir", "Wazir", 1, 0),
        ("fundamental:ferz", "Ferz", 1, 1),
        ("fundamental:dababba", "Dababba", 2, 0),
        ("fundamental:knight", "Knight", 2, 1),
        ("fundamental:alfil", "Alfil", 2, 2),
        ("fundamental:threeleaper", "Threeleaper", 3, 0),
        ("fundamental:camel", "Camel", 3, 1),
        ("fundamental:zebra", "Zebra", 3, 2),
        ("fundamental:tripper", "Tripper", 3, 3),
        ("fundamental:fourleaper", "Fourleaper", 4, 0),
        ("fundamental:giraffe", "Giraffe", 4, 1),
        ("fundamental:stag", "Stag", 4, 2),
        ("fundamental:antelope", "Antelope", 4, 3),
        ("fundamental:commuter", "Commuter", 4, 4),
    ] {
        registry.register(PieceDef::new(id, name).atom(Atom::new(x, y)));
    }
}

/// The Zero's only move is to its own tile.
fn stand_still(_ctx: &MoveContext, piece: &Piece, _log: &[Move]) -> Vec<HalfTurn> {
    vec![vec![Move::relocation(piece.id, piece.pos, piece.pos)]]
}
