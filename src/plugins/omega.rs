//! The Omega Chess pieces: champion, wizard, fool, and templar knight. All
//! four are declared as pawn-promotion outcomes, matching their upstream
//! role; the fool's moveset is undefined there too, so it registers with no
//! atoms and contributes no candidates.

use crate::atom::{Atom, Modifiers};
use crate::registry::{PieceDef, PieceRegistry};

pub fn install(registry: &mut PieceRegistry) {
    registry.register(
        PieceDef::new("omega:champion", "Champion")
            .atom(Atom::new(2, 2))
            .atom(Atom::new(2, 0))
            .atom(Atom::new(1, 0))
            .promotion_target(),
    );
    registry.register(
        PieceDef::new("omega:wizard", "Wizard")
            .atom(Atom::new(3, 1))
            .atom(Atom::new(1, 1))
            .promotion_target(),
    );
    registry.register(PieceDef::new("omega:fool", "Fool").promotion_target());
    registry.register(
        PieceDef::new("omega:templarknight", "Templar Knight")
            .atom(Atom::new(3, 2).modifiers(Modifiers::NON_CAPTURE_ONLY))
            .atom(Atom::new(2, 1))
            .promotion_target(),
    );
}
