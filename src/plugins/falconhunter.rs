//! The falcon-hunter pair: two asymmetric riders whose forward and backward
//! movesets are mirror images of each other. The falcon slides diagonally
//! forward and straight back, the hunter straight forward and diagonally
//! back.

use crate::atom::{Atom, DirectionGroup};
use crate::registry::{PieceDef, PieceRegistry};

pub fn install(registry: &mut PieceRegistry) {
    registry.register(
        PieceDef::new("falconhunter:falcon", "Falcon")
            .atom(
                Atom::new(1, 1)
                    .range(0)
                    .directions(&[DirectionGroup::Forward]),
            )
            .atom(
                Atom::new(1, 0)
                    .range(0)
                    .directions(&[DirectionGroup::Back]),
            ),
    );
    registry.register(
        PieceDef::new("falconhunter:hunter", "Hunter")
            .atom(
                Atom::new(1, 0)
                    .range(0)
                    .directions(&[DirectionGroup::Forward]),
            )
            .atom(
                Atom::new(1, 1)
                    .range(0)
                    .directions(&[DirectionGroup::Back]),
            ),
    );
}
