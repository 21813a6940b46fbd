//! Piece state and the capability hooks move generation relies on. A piece is
//! plain data: its behavior lives in the registry's `PieceDef` side-table,
//! keyed by the `kind` namespace tag, so capability checks never inspect a
//! concrete type.

use serde_json::{Map, Value};

use crate::board::{Board, Tile};
use crate::types::{Cardinal, Faction, PieceId, Pos};

/// A movable or droppable game unit. An invalid `pos` means the piece is off
/// the board (in a reserve).
#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub id: PieceId,
    /// The registered `"plugin:piece"` namespace tag.
    pub kind: String,
    pub pos: Pos,
    pub name: String,
    pub faction: Faction,
    /// The cardinal rotation treated as "forward" for this piece, letting one
    /// movement rule serve every faction.
    pub forwards: Cardinal,
    /// Whether this piece can be checked or check-mated.
    pub royal: bool,
    /// Whether this piece cannot be captured.
    pub iron: bool,
    pub has_moved: bool,
    /// Free-form per-piece state owned by rule plugins (e.g. a pawn's
    /// en-passant target).
    pub props: Map<String, Value>,
}

impl Piece {
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    pub fn y(&self) -> i32 {
        self.pos.y
    }

    /// Whether this piece can be captured by `other`.
    pub fn is_capturable_by(&self, other: &Piece) -> bool {
        !self.iron && self.faction != other.faction
    }

    /// The tile at `offset` in this piece's forward-facing frame (+y is
    /// forward). The offset is rotated into absolute board space by the
    /// piece's facing before the lookup.
    pub fn relative_tile<'a>(&self, board: &'a Board, offset: Pos) -> Option<&'a Tile> {
        let absolute = self.pos + offset.rotate_quarter_turns(self.forwards.quarter_turns());
        board.get(absolute)
    }
}

/// The structured construction-property blob for a piece: embedded in spawn
/// notation, in the configuration key table, and in promotion declarations.
/// Unknown keys are preserved in `extra` and land in the piece's `props`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faction: Option<Faction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwards: Option<Cardinal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub royal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iron: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_moved: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PieceProps {
    /// Overwrites the fields of `piece` that this blob sets.
    pub fn apply_to(&self, piece: &mut Piece) {
        if let Some(name) = &self.name {
            piece.name = name.clone();
        }
        if let Some(faction) = self.faction {
            piece.faction = faction;
        }
        if let Some(forwards) = self.forwards {
            piece.forwards = forwards;
        }
        if let Some(royal) = self.royal {
            piece.royal = royal;
        }
        if let Some(iron) = self.iron {
            piece.iron = iron;
        }
        if let Some(has_moved) = self.has_moved {
            piece.has_moved = has_moved;
        }
        for (key, value) in &self.extra {
            piece.props.insert(key.clone(), value.clone());
        }
    }
}
