//! The shogi piece family. Movesets only: every piece is a plain atom table,
//! including the promoted forms as distinct kinds (a gold general's moveset
//! under their own names). Drops from a captured-piece reserve and the
//! promotion rewrites that map each kind onto its promoted form are not
//! generated yet.
//
// TODO: generate drop moves and promotion rewrites for the shogi pieces.

use crate::atom::{Atom, DirectionGroup};
use crate::registry::{PieceDef, PieceRegistry};

fn gold_moveset(def: PieceDef) -> PieceDef {
    def.atom(Atom::new(1, 1).directions(&[DirectionGroup::Forward]))
        .atom(Atom::new(1, 0))
}

pub fn install(registry: &mut PieceRegistry) {
    registry.register(
        PieceDef::new("shogi:general", "King General")
            .atom(Atom::new(1, 1))
            .atom(Atom::new(1, 0))
            .royal(),
    );
    registry.register(PieceDef::new("shogi:rook", "Rook").atom(Atom::new(1, 0).range(0)));
    registry.register(
        PieceDef::new("shogi:dragon", "Dragon")
            .atom(Atom::new(1, 0).range(0))
            .atom(Atom::new(1, 1)),
    );
    registry.register(PieceDef::new("shogi:bishop", "Bishop").atom(Atom::new(1, 1).range(0)));
    registry.register(
        PieceDef::new("shogi:horse", "Horse")
            .atom(Atom::new(1, 1).range(0))
            .atom(Atom::new(1, 0)),
    );
    registry.register(gold_moveset(PieceDef::new("shogi:goldgeneral", "Gold General")));
    registry.register(
        PieceDef::new("shogi:silvergeneral", "Silver General")
            .atom(Atom::new(1, 0).directions(&[DirectionGroup::Forward]))
            .atom(Atom::new(1, 1)),
    );
    registry.register(gold_moveset(PieceDef::new(
        "shogi:promotedsilver",
        "Promoted Silver",
    )));
    registry.register(
        PieceDef::new("shogi:knight", "Knight")
            .atom(Atom::new(1, 2).directions(&[DirectionGroup::FrontFront])),
    );
    registry.register(gold_moveset(PieceDef::new(
        "shogi:promotedknight",
        "Promoted Knight",
    )));
    registry.register(
        PieceDef::new("shogi:lance", "Lance").atom(
            Atom::new(1, 0)
                .range(0)
                .directions(&[DirectionGroup::Forward]),
        ),
    );
    registry.register(gold_moveset(PieceDef::new(
        "shogi:promotedlance",
        "Promoted Lance",
    )));
    registry.register(
        PieceDef::new("shogi:pawn", "Foot Soldier")
            .atom(Atom::new(1, 0).directions(&[DirectionGroup::Forward])),
    );
    registry.register(gold_moveset(PieceDef::new("shogi:tokin", "Tokin")));
}
