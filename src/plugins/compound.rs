//! Compound pieces built purely by stacking atoms: dual, triple, and
//! quadruple combinations of the orthodox sliding and leaping capabilities.
//! The winged pieces additionally carry the no-leap falcon atoms, a pair of
//! long leaps that must have a clear path for their final leg.

use crate::atom::{Atom, Modifiers};
use crate::registry::{PieceDef, PieceRegistry};

fn wazir() -> Atom {
    Atom::new(1, 0)
}

fn ferz() -> Atom {
    Atom::new(1, 1)
}

fn knight() -> Atom {
    Atom::new(2, 1)
}

fn rook() -> Atom {
    Atom::new(1, 0).range(0)
}

fn bishop() -> Atom {
    Atom::new(1, 1).range(0)
}

fn falcon_near() -> Atom {
    Atom::new(3, 1).modifiers(Modifiers::NO_LEAP)
}

fn falcon_far() -> Atom {
    Atom::new(3, 2).modifiers(Modifiers::NO_LEAP)
}

pub fn install(registry: &mut PieceRegistry) {
    // Dual compounds.
    registry.register(
        PieceDef::new("compound:sailor", "Sailor")
            .atom(rook())
            .atom(ferz()),
    );
    registry.register(
        PieceDef::new("compound:missionary", "Missionary")
            .atom(bishop())
            .atom(wazir()),
    );
    registry.register(
        PieceDef::new("compound:centaur", "Centaur")
            .atom(knight())
            .atom(ferz())
            .atom(wazir()),
    );
    registry.register(
        PieceDef::new("compound:aviator", "Aviator")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(ferz())
            .atom(wazir()),
    );
    registry.register(
        PieceDef::new("compound:chancellor", "Chancellor")
            .atom(rook())
            .atom(knight()),
    );
    registry.register(
        PieceDef::new("compound:flyingfortress", "Flying Fortress")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(rook()),
    );
    registry.register(
        PieceDef::new("compound:archbishop", "Archbishop")
            .atom(bishop())
            .atom(knight()),
    );
    registry.register(
        PieceDef::new("compound:angel", "Angel")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(bishop()),
    );
    registry.register(
        PieceDef::new("compound:pegasus", "Pegasus")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(knight()),
    );

    // Triple compounds.
    registry.register(
        PieceDef::new("compound:hippocampus", "Hippocampus")
            .atom(rook())
            .atom(knight())
            .atom(ferz()),
    );
    registry.register(
        PieceDef::new("compound:admiral", "Admiral")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(rook())
            .atom(ferz()),
    );
    registry.register(
        PieceDef::new("compound:crusader", "Crusader")
            .atom(bishop())
            .atom(knight())
            .atom(wazir()),
    );
    registry.register(
        PieceDef::new("compound:inquisitor", "Inquisitor")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(bishop())
            .atom(wazir()),
    );
    registry.register(
        PieceDef::new("compound:pterocentaur", "Pterocentaur")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(knight())
            .atom(ferz())
            .atom(wazir()),
    );
    registry.register(
        PieceDef::new("compound:amazon", "Amazon")
            .atom(bishop())
            .atom(rook())
            .atom(knight()),
    );
    registry.register(
        PieceDef::new("compound:empress", "Empress")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(bishop())
            .atom(rook()),
    );
    registry.register(
        PieceDef::new("compound:hippogriff", "Hippogriff")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(knight())
            .atom(rook()),
    );
    registry.register(
        PieceDef::new("compound:cherub", "Cherub")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(knight())
            .atom(bishop()),
    );

    // Quadruple compounds. Quintuples collapse into these, since the wazir
    // and ferz steps are subsumed by the rook and bishop rays.
    registry.register(
        PieceDef::new("compound:manticore", "Manticore")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(rook())
            .atom(knight())
            .atom(ferz()),
    );
    registry.register(
        PieceDef::new("compound:seraph", "Seraph")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(bishop())
            .atom(knight())
            .atom(wazir()),
    );
    registry.register(
        PieceDef::new("compound:basilisk", "Basilisk")
            .atom(falcon_far())
            .atom(falcon_near())
            .atom(bishop())
            .atom(rook())
            .atom(knight()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::MoveContext;
    use crate::board::{Board, Tile};
    use crate::piece::Piece;
    use crate::types::{Faction, PieceId, Pos};

    fn empty_board() -> Board {
        let rows = (0..8)
            .map(|y| (0..8).map(|x| Tile::new(Pos::new(x, y))).collect())
            .collect();
        Board::from_rows(rows)
    }

    fn registry() -> PieceRegistry {
        let mut registry = PieceRegistry::new();
        install(&mut registry);
        registry
    }

    fn candidates(registry: &PieceRegistry, board: &Board, piece: &Piece) -> usize {
        let ctx = MoveContext {
            board,
            registry,
        };
        registry
            .get(&piece.kind)
            .unwrap()
            .moves(&ctx, piece, &[])
            .len()
    }

    #[test]
    fn centaur_combines_its_three_leaps() {
        let registry = registry();
        let board = empty_board();
        let piece = registry.get("compound:centaur").unwrap().instantiate(
            PieceId(1),
            Pos::new(4, 4),
            Faction(0),
            None,
        );
        // Knight 8, ferz 4, wazir 4.
        assert_eq!(16, candidates(&registry, &board, &piece));
    }

    #[test]
    fn amazon_covers_queen_and_knight_moves() {
        let registry = registry();
        let board = empty_board();
        let piece = registry.get("compound:amazon").unwrap().instantiate(
            PieceId(1),
            Pos::new(3, 3),
            Faction(0),
            None,
        );
        // Rook rays 14, bishop rays 13, knight 8 from (3, 3).
        assert_eq!(35, candidates(&registry, &board, &piece));
    }

    #[test]
    fn falcon_leaps_need_a_clear_final_path() {
        let registry = registry();
        let mut board = empty_board();
        let piece = registry.get("compound:pegasus").unwrap().instantiate(
            PieceId(1),
            Pos::new(0, 0),
            Faction(0),
            None,
        );
        let open = candidates(&registry, &board, &piece);

        // Wall off the rectangle leading to the (1, 3) leap at (1, 3).
        for &(x, y) in &[(0, 3), (1, 2), (0, 2), (1, 1), (0, 1), (1, 0)] {
            let blocker = registry.get("compound:pegasus").unwrap().instantiate(
                PieceId(10 + (x * 8 + y) as u32),
                Pos::new(x, y),
                Faction(0),
                None,
            );
            board.put_piece(Pos::new(x, y), blocker);
        }
        let walled = candidates(&registry, &board, &piece);
        assert!(walled < open);
    }
}
