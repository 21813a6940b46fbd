//! The `board` module holds the 2D grid of tiles. `Board::get` doubles as the
//! only bounds check in the engine: any position outside the grid (or the
//! off-board sentinel) simply has no tile, so move generation and move
//! application never test coordinates against the board dimensions directly.

use serde_json::{Map, Value};
use std::fmt;

use crate::piece::Piece;
use crate::types::{PieceId, Pos};

/// One board cell. `pos` is fixed at creation; the occupant changes as moves
/// are applied. `props` carries free-form named flags from the configuration,
/// such as `"promotion": true` on promotion-eligible tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub pos: Pos,
    pub piece: Option<Piece>,
    pub props: Map<String, Value>,
}

impl Tile {
    pub fn new(pos: Pos) -> Tile {
        Tile {
            pos,
            piece: None,
            props: Map::new(),
        }
    }

    /// Reads a boolean flag from this tile's free-form properties.
    pub fn flag(&self, name: &str) -> bool {
        self.props.get(name) == Some(&Value::Bool(true))
    }
}

/// A rectangular grid of tiles. Width and height derive from row 0; the
/// loader guarantees all rows have equal length. Cloning deep-copies every
/// tile and piece, which is what makes speculative mutation on a pushed state
/// frame safe: the previous frame's board is never touched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Board {
    rows: Vec<Vec<Tile>>,
}

impl Board {
    pub fn empty() -> Board {
        Board { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Board {
        Board { rows }
    }

    pub fn width(&self) -> i32 {
        self.rows.first().map_or(0, |r| r.len() as i32)
    }

    pub fn height(&self) -> i32 {
        self.rows.len() as i32
    }

    /// The tile at `pos`, or `None` when `pos` lies outside the grid or is
    /// the off-board sentinel. Never panics.
    pub fn get(&self, pos: Pos) -> Option<&Tile> {
        if !pos.is_valid() || pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.rows.get(pos.y as usize)?.get(pos.x as usize)
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut Tile> {
        if !pos.is_valid() || pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.rows.get_mut(pos.y as usize)?.get_mut(pos.x as usize)
    }

    /// All tiles, row by row starting at row 0.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    /// All pieces currently on the board, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter_map(|tile| tile.piece.as_ref())
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces().find(|p| p.id == id)
    }

    pub fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.rows
            .iter_mut()
            .flat_map(|row| row.iter_mut())
            .filter_map(|tile| tile.piece.as_mut())
            .find(|p| p.id == id)
    }

    pub fn piece_at(&self, pos: Pos) -> Option<&Piece> {
        self.get(pos)?.piece.as_ref()
    }

    pub fn take_piece(&mut self, pos: Pos) -> Option<Piece> {
        self.get_mut(pos)?.piece.take()
    }

    /// Places `piece` on the tile at `pos`, updating the piece's recorded
    /// position. A missing tile drops the piece, matching the tolerant
    /// behavior of move application on malformed input.
    pub fn put_piece(&mut self, pos: Pos, mut piece: Piece) {
        piece.pos = pos;
        if let Some(tile) = self.get_mut(pos) {
            tile.piece = Some(piece);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Row 0 is printed last so that "forward" for faction 0 reads upward.
        for row in self.rows.iter().rev() {
            for tile in row {
                let c = match &tile.piece {
                    Some(p) => {
                        let initial = p.name.chars().next().unwrap_or('?');
                        if p.faction.0 == 0 {
                            initial.to_ascii_lowercase()
                        } else {
                            initial.to_ascii_uppercase()
                        }
                    }
                    None => '.',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
