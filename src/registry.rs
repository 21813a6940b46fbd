//! The `registry` module maps namespace tags (`"plugin:piece"`) to piece
//! definitions. A definition bundles everything behavioral about a piece
//! kind: its atoms, its special-move generator, and its event handlers.
//! Pieces on the board carry only the tag, so two engines with different
//! plugin sets can disagree about what a tag means without interfering;
//! every engine instance owns its registry.

use std::collections::HashMap;

use crate::atom::{Atom, MoveContext};
use crate::board::Board;
use crate::moves::{HalfTurn, Move};
use crate::piece::{Piece, PieceProps};
use crate::types::{Cardinal, Faction, PieceId, Pos};

/// Generator for moves that cannot be expressed as atoms (castling,
/// en-passant). Receives the cumulative move log of the current state.
pub type SpecialFn = fn(&MoveContext, &Piece, &[Move]) -> Vec<HalfTurn>;

/// An event callback wired to a specific piece. Handlers mutate board state
/// directly (typically the subscribed piece's props).
pub type HandlerFn = fn(&mut Board, PieceId, &[Move]);

/// The behavioral definition of one piece kind.
#[derive(Clone)]
pub struct PieceDef {
    pub namespace: String,
    pub name: String,
    pub royal: bool,
    pub iron: bool,
    /// Whether promotion may produce this kind.
    pub promotion_target: bool,
    /// Whether a royal piece may castle with this kind.
    pub castle_partner: bool,
    atoms: Vec<Atom>,
    special: Option<SpecialFn>,
    pub on_load_end: Option<HandlerFn>,
    pub on_half_turn_start: Option<HandlerFn>,
    pub on_half_turn_end: Option<HandlerFn>,
}

impl PieceDef {
    pub fn new(namespace: &str, name: &str) -> PieceDef {
        PieceDef {
            namespace: namespace.to_string(),
            name: name.to_string(),
            royal: false,
            iron: false,
            promotion_target: false,
            castle_partner: false,
            atoms: Vec::new(),
            special: None,
            on_load_end: None,
            on_half_turn_start: None,
            on_half_turn_end: None,
        }
    }

    pub fn atom(mut self, atom: Atom) -> PieceDef {
        self.atoms.push(atom);
        self
    }

    pub fn royal(mut self) -> PieceDef {
        self.royal = true;
        self
    }

    pub fn iron(mut self) -> PieceDef {
        self.iron = true;
        self
    }

    pub fn promotion_target(mut self) -> PieceDef {
        self.promotion_target = true;
        self
    }

    pub fn castle_partner(mut self) -> PieceDef {
        self.castle_partner = true;
        self
    }

    pub fn special(mut self, special: SpecialFn) -> PieceDef {
        self.special = Some(special);
        self
    }

    pub fn on_load_end(mut self, handler: HandlerFn) -> PieceDef {
        self.on_load_end = Some(handler);
        self
    }

    pub fn on_half_turn_start(mut self, handler: HandlerFn) -> PieceDef {
        self.on_half_turn_start = Some(handler);
        self
    }

    pub fn on_half_turn_end(mut self, handler: HandlerFn) -> PieceDef {
        self.on_half_turn_end = Some(handler);
        self
    }

    /// The plugin prefix of this definition's namespace tag.
    pub fn plugin(&self) -> &str {
        self.namespace.split(':').next().unwrap_or("")
    }

    /// All candidate half-turns for `piece`: special moves first, then a fold
    /// over the atom list. An atom with a post hook sees both its own fresh
    /// candidates and everything accumulated so far, and returns the combined
    /// set; this is how promotion rewrites plain advances into spawn chains
    /// and how the initial double push is capped after the pawn moves.
    pub fn moves(&self, ctx: &MoveContext, piece: &Piece, log: &[Move]) -> Vec<HalfTurn> {
        let mut acc = match self.special {
            Some(special) => special(ctx, piece, log),
            None => Vec::new(),
        };
        for atom in &self.atoms {
            let fresh = atom.generate(ctx, piece);
            match atom.post_fn() {
                Some(post) => acc = post(ctx, piece, fresh, acc),
                None => acc.extend(fresh),
            }
        }
        acc
    }

    /// Constructs a piece of this kind. `faction` decides the default facing
    /// (faction 0 faces north, faction 1 south); `props` may override any
    /// field afterwards.
    pub fn instantiate(
        &self,
        id: PieceId,
        pos: Pos,
        faction: Faction,
        props: Option<&PieceProps>,
    ) -> Piece {
        let mut piece = Piece {
            id,
            kind: self.namespace.clone(),
            pos,
            name: self.name.clone(),
            faction,
            forwards: Cardinal::from_quarter_turns(i32::from(faction.0) * 2),
            royal: self.royal,
            iron: self.iron,
            has_moved: false,
            props: serde_json::Map::new(),
        };
        if let Some(props) = props {
            props.apply_to(&mut piece);
        }
        piece
    }
}

/// A per-engine table of piece definitions, keyed by namespace tag.
/// Registration order is preserved so that lookups like promotion targets
/// are deterministic.
#[derive(Clone, Default)]
pub struct PieceRegistry {
    defs: HashMap<String, PieceDef>,
    order: Vec<String>,
    plugins: Vec<String>,
}

impl PieceRegistry {
    pub fn new() -> PieceRegistry {
        PieceRegistry::default()
    }

    /// Registers a definition under its namespace tag. Re-registering a tag
    /// replaces the previous definition.
    pub fn register(&mut self, def: PieceDef) {
        if self.defs.insert(def.namespace.clone(), def.clone()).is_none() {
            self.order.push(def.namespace);
        } else {
            warn!("piece {} registered twice, replacing", def.namespace);
        }
    }

    pub fn get(&self, namespace: &str) -> Option<&PieceDef> {
        self.defs.get(namespace)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.defs.contains_key(namespace)
    }

    /// Definitions in registration order.
    pub fn defs(&self) -> impl Iterator<Item = &PieceDef> {
        self.order.iter().filter_map(move |ns| self.defs.get(ns))
    }

    /// The promotion-eligible definitions contributed by `plugin`, in
    /// registration order.
    pub fn promotion_targets(&self, plugin: &str) -> Vec<&PieceDef> {
        self.defs()
            .filter(|def| def.promotion_target && def.plugin() == plugin)
            .collect()
    }

    pub fn mark_plugin_installed(&mut self, name: &str) {
        self.plugins.push(name.to_string());
    }

    pub fn plugin_installed(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p == name)
    }
}
