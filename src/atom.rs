//! The `atom` module implements the directional leaper/rider primitive that
//! underlies every declarative movement rule, modeled on Betza notation. One
//! atom describes a leap vector, a repeat range, a set of named
//! direction-symmetry groups, and modifiers; a piece declares an ordered list
//! of atoms and a single interpreter folds over them, so new movement rules
//! are composed from existing groups and modifiers rather than new code.
//!
//! Vectors are canonicalized into the octant `x >= y >= 0`. Expanding the
//! symmetry groups applies the four quarter-turn rotations to `(x, y)` and,
//! when the vector is neither orthogonal (`y == 0`) nor diagonal (`x == y`),
//! to its mirror `(y, x)` as well, yielding up to 8 concrete directions. Each
//! named group is a fixed subset of those 8 slots.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::board::Board;
use crate::moves::{HalfTurn, Move};
use crate::piece::Piece;
use crate::registry::PieceRegistry;
use crate::types::Pos;

bitflags! {
    /// Modifiers restricting what an atom's candidate moves may do.
    pub struct Modifiers: u8 {
        /// Candidates must capture; empty destination tiles are discarded.
        const CAPTURE_ONLY = 0b0001;
        /// Candidates must not capture; occupied tiles block without
        /// producing a move.
        const NON_CAPTURE_ONLY = 0b0010;
        /// Candidates additionally need an unobstructed path for their final
        /// leg, found by the constrained search in `path_exists`.
        const NO_LEAP = 0b0100;
    }
}

/// The fixed catalog of direction-symmetry groups. Slots 0-3 are the four
/// quarter-turn rotations of the canonical vector (0 = forward); slots 4-7
/// are the rotations of its mirror, realizable only for true 8-fold vectors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DirectionGroup {
    Forward,
    Back,
    Left,
    Right,
    ForwardHalf,
    BackHalf,
    LeftHalf,
    RightHalf,
    LeftFront,
    RightFront,
    FrontLeft,
    FrontRight,
    BackLeft,
    LeftBack,
    RightBack,
    BackRight,
    ChiralLeft,
    ChiralRight,
    Vertical,
    Sideways,
    FrontFront,
    FrontSide,
    BackSide,
    BackBack,
    LeftVertical,
    RightVertical,
    LeftLeft,
    RightRight,
}

fn mask(slots: &[u8]) -> u8 {
    slots.iter().fold(0, |m, s| m | (1 << s))
}

impl DirectionGroup {
    /// The subset of the 8 rotation slots this group selects for a canonical
    /// vector `(x, y)`. The 4-fold (`y == 0`) and diagonal (`x == y`)
    /// degeneracies collapse some groups onto single slots.
    pub fn slots(self, x: i32, y: i32) -> u8 {
        use self::DirectionGroup::*;
        match self {
            Forward => {
                if y != 0 {
                    mask(&[0, 1, 4, 5])
                } else {
                    mask(&[0])
                }
            }
            Back => {
                if y != 0 {
                    mask(&[2, 3, 6, 7])
                } else {
                    mask(&[2])
                }
            }
            Left => {
                if y != 0 {
                    mask(&[0, 3, 4, 7])
                } else {
                    mask(&[3])
                }
            }
            Right => {
                if y != 0 {
                    mask(&[1, 2, 5, 6])
                } else {
                    mask(&[1])
                }
            }
            ForwardHalf => mask(&[0, 1, 4, 5]),
            BackHalf => mask(&[2, 3, 6, 7]),
            LeftHalf => mask(&[0, 3, 4, 7]),
            RightHalf => mask(&[1, 2, 5, 6]),
            LeftFront => mask(&[0]),
            RightFront => {
                if x == y {
                    mask(&[1])
                } else {
                    mask(&[5])
                }
            }
            FrontLeft => {
                if x == y {
                    mask(&[0])
                } else {
                    mask(&[4])
                }
            }
            FrontRight => mask(&[1]),
            BackLeft => mask(&[3]),
            LeftBack => {
                if x == y {
                    mask(&[3])
                } else {
                    mask(&[7])
                }
            }
            RightBack => mask(&[2]),
            BackRight => {
                if x == y {
                    mask(&[2])
                } else {
                    mask(&[6])
                }
            }
            ChiralLeft => mask(&[0, 1, 2, 3]),
            ChiralRight => mask(&[4, 5, 6, 7]),
            Vertical => mask(&[0, 2, 5, 7]),
            Sideways => mask(&[1, 3, 4, 6]),
            FrontFront => mask(&[0, 5]),
            FrontSide => mask(&[1, 4]),
            BackSide => mask(&[3, 6]),
            BackBack => mask(&[2, 7]),
            LeftVertical => mask(&[0, 7]),
            RightVertical => mask(&[2, 5]),
            LeftLeft => mask(&[3, 4]),
            RightRight => mask(&[1, 6]),
        }
    }
}

/// Shared read-only context for move generation.
pub struct MoveContext<'a> {
    pub board: &'a Board,
    pub registry: &'a PieceRegistry,
}

/// Post-processing hook applied after an atom generates its candidates.
/// Receives the new candidates and the moves accumulated so far, and returns
/// the combined set. Used for promotion variants and for capping repeated
/// short pushes once a piece has moved.
pub type PostFn = fn(&MoveContext, &Piece, Vec<HalfTurn>, Vec<HalfTurn>) -> Vec<HalfTurn>;

/// One declarative movement capability: a canonical leap vector, a repeat
/// range (0 = until blocked), direction groups, modifiers, and an optional
/// post-filter.
#[derive(Clone)]
pub struct Atom {
    x: i32,
    y: i32,
    range: u32,
    directions: Vec<DirectionGroup>,
    modifiers: Modifiers,
    post: Option<PostFn>,
}

impl Atom {
    /// A single leap of `(x, y)` in all four plane groups, the common case.
    pub fn new(x: i32, y: i32) -> Atom {
        Atom {
            x: x.max(y),
            y: x.min(y),
            range: 1,
            directions: vec![
                DirectionGroup::Forward,
                DirectionGroup::Left,
                DirectionGroup::Back,
                DirectionGroup::Right,
            ],
            modifiers: Modifiers::empty(),
            post: None,
        }
    }

    pub fn range(mut self, range: u32) -> Atom {
        self.range = range;
        self
    }

    pub fn directions(mut self, directions: &[DirectionGroup]) -> Atom {
        self.directions = directions.to_vec();
        self
    }

    pub fn modifiers(mut self, modifiers: Modifiers) -> Atom {
        self.modifiers = modifiers;
        self
    }

    pub fn post(mut self, post: PostFn) -> Atom {
        self.post = Some(post);
        self
    }

    pub fn post_fn(&self) -> Option<PostFn> {
        self.post
    }

    /// Generates every candidate half-turn this atom can produce for `piece`
    /// on the current board. Each candidate is a single relocation (possibly
    /// capturing) move. A degenerate zero vector yields no candidates.
    pub fn generate(&self, ctx: &MoveContext, piece: &Piece) -> Vec<HalfTurn> {
        let mut out = Vec::new();
        if (self.x == 0 && self.y == 0) || !piece.pos.is_valid() {
            return out;
        }

        let (x, y) = (self.x, self.y);
        let selected = self
            .directions
            .iter()
            .fold(0u8, |m, d| m | d.slots(x, y));
        let eight_fold = y != 0 && x != y;
        let base = [
            Pos::new(-y, x),
            Pos::new(x, y),
            Pos::new(y, -x),
            Pos::new(-x, -y),
            Pos::new(-x, y),
            Pos::new(y, x),
            Pos::new(x, -y),
            Pos::new(-y, -x),
        ];
        let mut vectors: Vec<Pos> = (0..8)
            .filter(|&i| selected & (1 << i) != 0 && (i < 4 || eight_fold))
            .map(|i| base[i as usize])
            .collect();

        // A range of 0 walks until blocked; the board area bounds the walk.
        let limit = if self.range == 0 {
            (ctx.board.width() * ctx.board.height() - 1).max(0) as u32
        } else {
            self.range
        };

        let turns = piece.forwards.quarter_turns();
        let mut step: u32 = 1;
        while step <= limit && !vectors.is_empty() {
            for j in (0..vectors.len()).rev() {
                let vector = vectors[j];
                let offset = vector.scale(step as i32, step as i32);
                let tile = match piece.relative_tile(ctx.board, offset) {
                    Some(tile) => tile,
                    None => continue,
                };

                let mut mv = Move::relocation(piece.id, piece.pos, tile.pos);
                if let Some(occupant) = &tile.piece {
                    // Riders cannot pass through pieces; a capture ends the
                    // ray either way.
                    vectors.remove(j);
                    if self.modifiers.contains(Modifiers::NON_CAPTURE_ONLY)
                        || !occupant.is_capturable_by(piece)
                    {
                        continue;
                    }
                    mv.capture_at = Some(tile.pos);
                } else if self.modifiers.contains(Modifiers::CAPTURE_ONLY) {
                    continue;
                }

                if self.modifiers.contains(Modifiers::NO_LEAP) {
                    let short = piece.pos
                        + vector
                            .scale(step as i32 - 1, step as i32 - 1)
                            .rotate_quarter_turns(turns);
                    if !path_exists(ctx.board, short, tile.pos) {
                        continue;
                    }
                }

                out.push(vec![mv]);
            }
            step += 1;
        }
        out
    }
}

/// Whether a path exists from `start` to `goal`, searching only inside the
/// axis-aligned rectangle they span. Steps cost 1 in any of the 8 neighbor
/// directions and the Chebyshev distance guides the search; every occupied
/// tile other than the goal is impassable.
///
/// The search is not re-anchored against the tile that actually blocks the
/// direct line, so it can route around an obstacle inside the rectangle.
/// That permissive behavior is intentional and covered by tests; see
/// DESIGN.md before changing it.
pub fn path_exists(board: &Board, start: Pos, goal: Pos) -> bool {
    if !start.is_valid() || !goal.is_valid() {
        return false;
    }
    if start == goal {
        return true;
    }
    if board.get(goal).is_none() {
        return false;
    }

    let min_x = start.x.min(goal.x);
    let max_x = start.x.max(goal.x);
    let min_y = start.y.min(goal.y);
    let max_y = start.y.max(goal.y);
    let chebyshev = |p: Pos| (p.x - goal.x).abs().max((p.y - goal.y).abs());

    let mut best: HashMap<(i32, i32), i32> = HashMap::new();
    let mut open: BinaryHeap<Reverse<(i32, i32, i32)>> = BinaryHeap::new();
    best.insert((start.x, start.y), 0);
    open.push(Reverse((chebyshev(start), start.x, start.y)));

    while let Some(Reverse((_, x, y))) = open.pop() {
        let here = Pos::new(x, y);
        if here == goal {
            return true;
        }
        let cost = best[&(x, y)];
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let next = Pos::new(x + dx, y + dy);
                if next.x < min_x || next.x > max_x || next.y < min_y || next.y > max_y {
                    continue;
                }
                let tile = match board.get(next) {
                    Some(tile) => tile,
                    None => continue,
                };
                if next != goal && tile.piece.is_some() {
                    continue;
                }
                let next_cost = cost + 1;
                if best
                    .get(&(next.x, next.y))
                    .map_or(true, |&seen| next_cost < seen)
                {
                    best.insert((next.x, next.y), next_cost);
                    open.push(Reverse((next_cost + chebyshev(next), next.x, next.y)));
                }
            }
        }
    }
    false
}
