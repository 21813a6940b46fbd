use num_traits::{FromPrimitive, ToPrimitive};
use std::fmt;
use std::ops;

/// Sentinel for a coordinate that is not set. A `Pos` with unset coordinates
/// represents "not on the board": a reserve piece, or a parse failure.
const UNSET: i32 = i32::MIN;

/// A 2D board coordinate. Equality is component-wise; arithmetic propagates
/// invalidity so that an off-board position never aliases a real tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Pos {
        Pos { x, y }
    }

    /// The off-board sentinel. Check with `is_valid`, never by comparing
    /// coordinates.
    pub const fn invalid() -> Pos {
        Pos { x: UNSET, y: UNSET }
    }

    pub fn is_valid(&self) -> bool {
        self.x != UNSET && self.y != UNSET
    }

    pub fn scale(self, sx: i32, sy: i32) -> Pos {
        if !self.is_valid() {
            return Pos::invalid();
        }
        Pos::new(self.x * sx, self.y * sy)
    }

    /// Rotates this position by `n` quarter turns about the origin. `n` is
    /// taken mod 4, so negative counts work. One quarter turn maps forward
    /// (+y) onto +x, which is the `East` facing.
    pub fn rotate_quarter_turns(self, n: i32) -> Pos {
        if !self.is_valid() {
            return Pos::invalid();
        }
        match n.rem_euclid(4) {
            1 => Pos::new(self.y, -self.x),
            2 => Pos::new(-self.x, -self.y),
            3 => Pos::new(-self.y, self.x),
            _ => self,
        }
    }

    /// Encodes this position as 8 hex digits: 4 for y, then 4 for x.
    pub fn to_hex(self) -> String {
        format!("{:04x}{:04x}", self.y, self.x)
    }

    /// Decodes an 8-hex-digit position (y then x, case-insensitive). Returns
    /// the invalid sentinel on any malformed input.
    pub fn from_hex(hex: &str) -> Pos {
        if hex.len() != 8 {
            return Pos::invalid();
        }
        let y = u16::from_str_radix(&hex[..4], 16);
        let x = u16::from_str_radix(&hex[4..], 16);
        match (x, y) {
            (Ok(x), Ok(y)) => Pos::new(i32::from(x), i32::from(y)),
            _ => Pos::invalid(),
        }
    }
}

impl ops::Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        if !self.is_valid() || !rhs.is_valid() {
            return Pos::invalid();
        }
        Pos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl ops::Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        if !self.is_valid() || !rhs.is_valid() {
            return Pos::invalid();
        }
        Pos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_valid() {
            write!(f, "({}, {})", self.x, self.y)
        } else {
            write!(f, "(off-board)")
        }
    }
}

/// The four cardinal facings a piece can have. Movement rules are written in
/// a forward-facing frame (+y is forward); the facing supplies the rotation
/// that maps rule offsets into absolute board space, so one rule definition
/// serves every faction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    pub fn quarter_turns(self) -> i32 {
        self.to_i32().unwrap()
    }

    pub fn from_quarter_turns(n: i32) -> Cardinal {
        FromPrimitive::from_i32(n.rem_euclid(4)).unwrap()
    }
}

impl Default for Cardinal {
    fn default() -> Cardinal {
        Cardinal::North
    }
}

/// A faction (player) identifier. Turn order alternates between faction 0 and
/// faction 1; pieces may carry other ids on exotic boards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Faction(pub u8);

impl Faction {
    pub fn opponent(self) -> Faction {
        Faction(self.0 ^ 1)
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "faction {}", self.0)
    }
}

/// Stable identity of a piece. Survives board cloning, which is what lets the
/// move log and the event bus refer to pieces across state frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_maps_forward_onto_each_facing() {
        let forward = Pos::new(0, 1);
        assert_eq!(
            Pos::new(0, 1),
            forward.rotate_quarter_turns(Cardinal::North.quarter_turns())
        );
        assert_eq!(
            Pos::new(1, 0),
            forward.rotate_quarter_turns(Cardinal::East.quarter_turns())
        );
        assert_eq!(
            Pos::new(0, -1),
            forward.rotate_quarter_turns(Cardinal::South.quarter_turns())
        );
        assert_eq!(
            Pos::new(-1, 0),
            forward.rotate_quarter_turns(Cardinal::West.quarter_turns())
        );
    }

    #[test]
    fn rotation_is_total_over_negative_counts() {
        let p = Pos::new(2, 1);
        assert_eq!(p.rotate_quarter_turns(1), p.rotate_quarter_turns(-3));
        assert_eq!(p, p.rotate_quarter_turns(-4));
    }

    #[test]
    fn invalidity_propagates_through_arithmetic() {
        let p = Pos::invalid() + Pos::new(1, 1);
        assert!(!p.is_valid());
        assert!(!Pos::invalid().scale(3, 3).is_valid());
        assert!(!Pos::invalid().rotate_quarter_turns(2).is_valid());
    }

    #[test]
    fn hex_round_trip() {
        let p = Pos::new(3, 4);
        assert_eq!("00040003", p.to_hex());
        assert_eq!(p, Pos::from_hex("00040003"));
        assert_eq!(p, Pos::from_hex("00040003".to_uppercase().as_str()));
        assert!(!Pos::from_hex("zzzzzzzz").is_valid());
        assert!(!Pos::from_hex("0004").is_valid());
    }

    #[test]
    fn facing_from_quarter_turns_wraps() {
        assert_eq!(Cardinal::South, Cardinal::from_quarter_turns(2));
        assert_eq!(Cardinal::West, Cardinal::from_quarter_turns(-1));
    }
}
