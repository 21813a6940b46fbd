//! Declarative game configuration: a picture of the board as rows of
//! single-character keys, a key table mapping each character to a piece
//! descriptor and optional tile properties, and the list of rule plugins to
//! activate. Consumed once by `Engine::load`.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::piece::PieceProps;
use crate::types::Faction;

/// One key-table entry. Both fields are optional: an entry with no piece
/// describes an empty tile (possibly with tile properties).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct KeyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece: Option<PieceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile: Option<Map<String, Value>>,
}

/// A piece descriptor in the key table: the namespace id plus construction
/// property overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PieceSpec {
    pub id: String,
    #[serde(flatten)]
    pub props: PieceProps,
}

/// A complete game setup. `board[0]` is row y = 0 (the bottom row in the
/// board display, faction 0's home side in the built-in setups).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameConfig {
    pub board: Vec<String>,
    pub key: HashMap<String, KeyEntry>,
    pub plugins: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_half_turns: Option<u32>,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<GameConfig, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Resolves the key-table entry for a board character. When only one
    /// casing of the character is defined, the entry serves both casings and
    /// the board character's own case picks the faction: lowercase is faction
    /// 0, uppercase faction 1. When both casings are defined the entries are
    /// independent and carry their own factions.
    pub fn entry(&self, ch: char) -> Option<(&KeyEntry, Option<Faction>)> {
        let lower = ch.to_ascii_lowercase().to_string();
        let upper = ch.to_ascii_uppercase().to_string();
        let both = self.key.contains_key(&lower) && self.key.contains_key(&upper) && lower != upper;
        if both {
            return self.key.get(&ch.to_string()).map(|e| (e, None));
        }
        let faction = if ch.is_ascii_uppercase() {
            Faction(1)
        } else {
            Faction(0)
        };
        self.key
            .get(&lower)
            .or_else(|| self.key.get(&upper))
            .map(|e| (e, Some(faction)))
    }

    /// The standard orthodox 8x8 setup. Faction 0 (lowercase) occupies rows 0
    /// and 1; both back ranks are flagged as promotion tiles.
    pub fn orthodox() -> GameConfig {
        let mut key = HashMap::new();
        let mut promotion_tile = Map::new();
        promotion_tile.insert("promotion".to_string(), Value::Bool(true));

        let back_rank = [
            ("r", "orthodox:rook"),
            ("n", "orthodox:knight"),
            ("b", "orthodox:bishop"),
            ("q", "orthodox:queen"),
            ("k", "orthodox:king"),
        ];
        for &(ch, id) in &back_rank {
            key.insert(
                ch.to_string(),
                KeyEntry {
                    piece: Some(PieceSpec {
                        id: id.to_string(),
                        props: PieceProps::default(),
                    }),
                    tile: Some(promotion_tile.clone()),
                },
            );
        }
        key.insert(
            "p".to_string(),
            KeyEntry {
                piece: Some(PieceSpec {
                    id: "orthodox:pawn".to_string(),
                    props: PieceProps::default(),
                }),
                tile: None,
            },
        );
        key.insert(".".to_string(), KeyEntry::default());

        GameConfig {
            board: vec![
                "rnbqkbnr".to_string(),
                "pppppppp".to_string(),
                "........".to_string(),
                "........".to_string(),
                "........".to_string(),
                "........".to_string(),
                "PPPPPPPP".to_string(),
                "RNBQKBNR".to_string(),
            ],
            key,
            plugins: vec!["orthodox".to_string()],
            max_half_turns: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cased_keys_serve_both_factions() {
        let config = GameConfig::orthodox();
        let (lower, faction) = config.entry('p').unwrap();
        assert_eq!("orthodox:pawn", lower.piece.as_ref().unwrap().id);
        assert_eq!(Some(Faction(0)), faction);

        let (upper, faction) = config.entry('P').unwrap();
        assert_eq!("orthodox:pawn", upper.piece.as_ref().unwrap().id);
        assert_eq!(Some(Faction(1)), faction);

        assert!(config.entry('z').is_none());
    }

    #[test]
    fn doubly_cased_keys_carry_their_own_faction() {
        let mut config = GameConfig::orthodox();
        config.key.insert(
            "w".to_string(),
            KeyEntry {
                piece: Some(PieceSpec {
                    id: "orthodox:rook".to_string(),
                    props: PieceProps {
                        faction: Some(Faction(1)),
                        ..PieceProps::default()
                    },
                }),
                tile: None,
            },
        );
        config.key.insert("W".to_string(), KeyEntry::default());

        let (entry, faction) = config.entry('w').unwrap();
        assert!(faction.is_none());
        assert_eq!(
            Some(Faction(1)),
            entry.piece.as_ref().unwrap().props.faction
        );
        let (entry, _) = config.entry('W').unwrap();
        assert!(entry.piece.is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let config = GameConfig::orthodox();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = GameConfig::from_json(&json).unwrap();
        assert_eq!(config.board, parsed.board);
        assert_eq!(config.plugins, parsed.plugins);
        assert!(parsed.key.get("r").unwrap().tile.is_some());
    }

    #[test]
    fn promotion_flags_on_back_rank_keys_only() {
        let config = GameConfig::orthodox();
        assert!(config.key.get("q").unwrap().tile.is_some());
        assert!(config.key.get("p").unwrap().tile.is_none());
        assert!(config.key.get(".").unwrap().tile.is_none());
    }
}
