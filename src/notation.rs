//! The YCIN text codec for move logs. One block per half-turn, moves within
//! a block separated by a line break, blocks separated by a blank line. Per
//! move: an optional `<namespace> ` prefix, then `-<from><to>` for a
//! relocation, `.<pos>` for a removal, `x<pos>` for a capture, `+<pos>{json}`
//! for a spawn, and `*<pos>` for a drop, concatenated in that order.
//! Positions are 8 hex digits, 4 for y then 4 for x.
//!
//! Parsing is tolerant by contract: a namespace that is not registered is
//! only warned about, and a spawn with malformed embedded JSON keeps its
//! position and loses its properties.

use regex::Regex;

use crate::moves::Move;
use crate::piece::PieceProps;
use crate::registry::PieceRegistry;
use crate::types::Pos;

lazy_static! {
    static ref NAMESPACE_RE: Regex = Regex::new(r"^(\S+) ").unwrap();
    static ref FROM_TO_RE: Regex = Regex::new(r"-([0-9a-fA-F]{16})").unwrap();
    static ref REMOVE_RE: Regex = Regex::new(r"\.([0-9a-fA-F]{8})").unwrap();
    static ref CAPTURE_RE: Regex = Regex::new(r"x([0-9a-fA-F]{8})").unwrap();
    static ref SPAWN_RE: Regex = Regex::new(r"\+([0-9a-fA-F]{8})(\{.*\})?").unwrap();
    static ref DROP_RE: Regex = Regex::new(r"\*([0-9a-fA-F]{8})").unwrap();
}

fn serialize_move(mv: &Move) -> String {
    let mut out = String::new();
    if let Some(ns) = &mv.namespace {
        out.push_str(ns);
        out.push(' ');
    }
    if let (Some(from), Some(to)) = (mv.from, mv.to) {
        out.push('-');
        out.push_str(&from.to_hex());
        out.push_str(&to.to_hex());
    }
    if let Some(at) = mv.remove_at {
        out.push('.');
        out.push_str(&at.to_hex());
    }
    if let Some(at) = mv.capture_at {
        out.push('x');
        out.push_str(&at.to_hex());
    }
    if let Some(at) = mv.spawn_at {
        out.push('+');
        out.push_str(&at.to_hex());
        if let Some(props) = &mv.spawn_props {
            if let Ok(json) = serde_json::to_string(props) {
                out.push_str(&json);
            }
        }
    }
    if let Some(at) = mv.drop_at {
        out.push('*');
        out.push_str(&at.to_hex());
    }
    out
}

/// Serializes a move log. Half-turn boundaries follow the `continues` flags:
/// a move that does not continue closes its block.
pub fn serialize(moves: &[Move]) -> String {
    let mut out = String::new();
    for (i, mv) in moves.iter().enumerate() {
        out.push_str(&serialize_move(mv));
        if i < moves.len() - 1 {
            out.push('\n');
            if !mv.continues {
                out.push('\n');
            }
        }
    }
    out
}

/// Parses notation text into a move sequence. Within each block every move
/// but the last is marked as continuing. The registry is consulted only to
/// warn about unknown namespaces; parsing always proceeds.
pub fn parse(registry: &PieceRegistry, text: &str) -> Vec<Move> {
    let mut moves = Vec::new();
    if text.trim().is_empty() {
        return moves;
    }
    let normalized = text.replace("\r\n", "\n");
    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block.lines().filter(|l| !l.trim().is_empty()).collect();
        for (j, line) in lines.iter().enumerate() {
            let mut mv = Move::default();
            mv.continues = j < lines.len() - 1;

            let namespace = NAMESPACE_RE.captures(line).map(|c| c[1].to_string());
            if let Some(ns) = &namespace {
                if !registry.contains(ns) {
                    warn!("no such piece exists: {}", ns);
                }
            }

            if let Some(at) = REMOVE_RE.captures(line).map(|c| Pos::from_hex(&c[1])) {
                if at.is_valid() {
                    mv.remove_at = Some(at);
                }
            }
            if namespace.is_some() {
                if let Some(c) = FROM_TO_RE.captures(line) {
                    let from = Pos::from_hex(&c[1][..8]);
                    let to = Pos::from_hex(&c[1][8..]);
                    if from.is_valid() && to.is_valid() {
                        mv.from = Some(from);
                        mv.to = Some(to);
                    }
                }
                if let Some(at) = CAPTURE_RE.captures(line).map(|c| Pos::from_hex(&c[1])) {
                    if at.is_valid() {
                        mv.capture_at = Some(at);
                    }
                }
                if let Some(c) = SPAWN_RE.captures(line) {
                    let at = Pos::from_hex(&c[1]);
                    if at.is_valid() {
                        mv.spawn_at = Some(at);
                        if let Some(blob) = c.get(2) {
                            match serde_json::from_str::<PieceProps>(blob.as_str()) {
                                Ok(props) => mv.spawn_props = Some(props),
                                Err(err) => {
                                    warn!("invalid spawn properties {}: {}", blob.as_str(), err)
                                }
                            }
                        }
                    }
                }
                if let Some(at) = DROP_RE.captures(line).map(|c| Pos::from_hex(&c[1])) {
                    if at.is_valid() {
                        mv.drop_at = Some(at);
                    }
                }
            }

            mv.namespace = namespace;
            moves.push(mv);
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceId;

    #[test]
    fn parses_relocation_with_capture() {
        let registry = PieceRegistry::new();
        let moves = parse(&registry, "orthodox:pawn -0004000300040002x00040003");
        assert_eq!(1, moves.len());
        let mv = &moves[0];
        assert_eq!(Some("orthodox:pawn".to_string()), mv.namespace);
        assert_eq!(Some(Pos::new(3, 4)), mv.from);
        assert_eq!(Some(Pos::new(2, 4)), mv.to);
        assert_eq!(Some(Pos::new(3, 4)), mv.capture_at);
        assert!(!mv.continues);
    }

    #[test]
    fn blocks_set_continuation_flags() {
        let registry = PieceRegistry::new();
        let text = "orthodox:king -0000000400000006\northodox:rook -0000000700000005\n\northodox:pawn -0006000400040004";
        let moves = parse(&registry, text);
        assert_eq!(3, moves.len());
        assert!(moves[0].continues);
        assert!(!moves[1].continues);
        assert!(!moves[2].continues);
    }

    #[test]
    fn tolerates_crlf() {
        let registry = PieceRegistry::new();
        let text = "a:b -0000000000000001\r\n\r\na:b -0001000000000000";
        let moves = parse(&registry, text);
        assert_eq!(2, moves.len());
        assert!(!moves[0].continues);
    }

    #[test]
    fn malformed_spawn_props_keep_the_position() {
        let registry = PieceRegistry::new();
        let moves = parse(&registry, "orthodox:queen +00070004{not json}");
        assert_eq!(1, moves.len());
        assert_eq!(Some(Pos::new(4, 7)), moves[0].spawn_at);
        assert!(moves[0].spawn_props.is_none());
    }

    #[test]
    fn spawn_props_survive_parsing() {
        let registry = PieceRegistry::new();
        let moves = parse(
            &registry,
            r#"orthodox:queen .00060004+00070004{"name":"Queen (Promoted Pawn)","has_moved":true}"#,
        );
        assert_eq!(Some(Pos::new(4, 6)), moves[0].remove_at);
        assert_eq!(Some(Pos::new(4, 7)), moves[0].spawn_at);
        let props = moves[0].spawn_props.as_ref().unwrap();
        assert_eq!(Some("Queen (Promoted Pawn)".to_string()), props.name);
        assert_eq!(Some(true), props.has_moved);
    }

    #[test]
    fn round_trip_preserves_positions_and_flags() {
        let registry = PieceRegistry::new();
        let id = PieceId(1);
        let original = vec![
            Move {
                namespace: Some("orthodox:king".to_string()),
                ..Move::relocation(id, Pos::new(4, 0), Pos::new(6, 0)).continuing()
            },
            Move {
                namespace: Some("orthodox:rook".to_string()),
                ..Move::relocation(id, Pos::new(7, 0), Pos::new(5, 0))
            },
            Move {
                namespace: Some("orthodox:pawn".to_string()),
                ..Move::relocation(id, Pos::new(4, 6), Pos::new(4, 4))
            },
            Move {
                namespace: Some("orthodox:knight".to_string()),
                ..Move::drop("orthodox:knight", Pos::new(3, 3))
            },
        ];
        let text = serialize(&original);
        let parsed = parse(&registry, &text);
        assert_eq!(original.len(), parsed.len());
        for (a, b) in original.iter().zip(&parsed) {
            assert_eq!(a.namespace, b.namespace);
            assert_eq!(a.from, b.from);
            assert_eq!(a.to, b.to);
            assert_eq!(a.remove_at, b.remove_at);
            assert_eq!(a.capture_at, b.capture_at);
            assert_eq!(a.spawn_at, b.spawn_at);
            assert_eq!(a.drop_at, b.drop_at);
            assert_eq!(a.continues, b.continues);
        }
    }

    #[test]
    fn unknown_namespace_is_kept() {
        let registry = PieceRegistry::new();
        let moves = parse(&registry, "lost:ghost -0000000000000001");
        assert_eq!(Some("lost:ghost".to_string()), moves[0].namespace);
        assert!(moves[0].is_relocation());
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        let registry = PieceRegistry::new();
        assert!(parse(&registry, "").is_empty());
        assert!(parse(&registry, "  \n \n").is_empty());
    }
}
