//! The `engine` module owns the state stack and the apply/trial/undo cycle.
//!
//! Game history is a stack of frames; every committed or trial half-turn
//! pushes a frame whose board is a deep clone of its predecessor's, so a
//! frame's board is always independently mutable and undo is a plain pop.
//! Legality checking works by actually applying the candidate to the stack
//! and unwinding it afterwards, which is why the engine is not reentrant:
//! callers must serialize access per instance.
//!
//! Event subscriptions live on individual frames. They are wired when a
//! frame's board comes into existence (load, clone on push, spawn), so
//! popping a frame also discards whatever wiring only existed there. That is
//! what makes prop bookkeeping such as en-passant eligibility roll back
//! correctly under trial moves.

use std::error::Error;
use std::fmt;

use serde_json::{Map, Value};

use crate::atom::MoveContext;
use crate::board::{Board, Tile};
use crate::config::GameConfig;
use crate::moves::{split_legs, HalfTurn, Move};
use crate::notation;
use crate::piece::Piece;
use crate::plugins;
use crate::registry::{PieceDef, PieceRegistry};
use crate::types::{Cardinal, Faction, PieceId, Pos};

#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    AlreadyLoaded,
    UnknownPlugin(String),
    UnknownNamespace(String),
    RaggedBoard { row: usize },
    IllegalMove,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::AlreadyLoaded => {
                write!(f, "this engine instance has already been loaded")
            }
            EngineError::UnknownPlugin(name) => write!(f, "no such plugin: \"{}\"", name),
            EngineError::UnknownNamespace(ns) => write!(f, "no such piece exists: \"{}\"", ns),
            EngineError::RaggedBoard { row } => {
                write!(f, "board row {} differs in length from row 0", row)
            }
            EngineError::IllegalMove => {
                write!(f, "move would result in an illegal board state")
            }
        }
    }
}

impl Error for EngineError {}

/// The fixed set of engine events pieces can subscribe to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    LoadEnd,
    HalfTurnStart,
    HalfTurnEnd,
}

/// One event wire: when `event` fires on the owning frame, the registered
/// handler of `piece`'s kind runs against that frame's board.
#[derive(Clone, Debug, PartialEq)]
pub struct Subscription {
    pub event: Event,
    pub piece: PieceId,
}

/// One committed (or trial) point in game history.
#[derive(Clone)]
pub struct Frame {
    pub board: Board,
    /// Cumulative move log up to and including this frame.
    pub moves: Vec<Move>,
    pub turn: Faction,
    /// Change-detection counters: `version` is unique per frame, and
    /// `prev_version` names the frame this one was pushed from.
    pub prev_version: u64,
    pub version: u64,
    pub subscribers: Vec<Subscription>,
}

impl Frame {
    fn initial() -> Frame {
        Frame {
            board: Board::empty(),
            moves: Vec::new(),
            turn: Faction(0),
            prev_version: 0,
            version: 0,
            subscribers: Vec::new(),
        }
    }
}

/// A packaged view of the current state, safe to hand to a presentation
/// layer: plain values only, no registry or frame references.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    pub turn: Faction,
    pub plugins: Vec<String>,
    /// The cumulative move log in notation text.
    pub moves: String,
    pub tiles: Vec<TileSnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TileSnapshot {
    pub pos: Pos,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub piece: Option<PieceSnapshot>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PieceSnapshot {
    pub kind: String,
    pub name: String,
    pub faction: Faction,
    pub forwards: Cardinal,
    pub royal: bool,
    pub iron: bool,
    pub has_moved: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
}

/// A single game instance: a piece registry populated at load time plus the
/// frame stack. The initial frame (empty board, faction 0 to move) is never
/// popped.
pub struct Engine {
    stack: Vec<Frame>,
    registry: PieceRegistry,
    plugins: Vec<String>,
    loaded: bool,
    next_piece_id: u32,
    next_version: u64,
}

impl Engine {
    pub fn new() -> Engine {
        Engine {
            stack: vec![Frame::initial()],
            registry: PieceRegistry::new(),
            plugins: Vec::new(),
            loaded: false,
            next_piece_id: 1,
            next_version: 0,
        }
    }

    fn frame(&self) -> &Frame {
        self.stack.last().expect("frame stack is never empty")
    }

    pub fn board(&self) -> &Board {
        &self.frame().board
    }

    pub fn turn(&self) -> Faction {
        self.frame().turn
    }

    /// The cumulative move log of the current frame.
    pub fn moves(&self) -> &[Move] {
        &self.frame().moves
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn registry(&self) -> &PieceRegistry {
        &self.registry
    }

    pub fn plugins(&self) -> &[String] {
        &self.plugins
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn version(&self) -> u64 {
        self.frame().version
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.board().pieces()
    }

    fn alloc_piece_id(&mut self) -> PieceId {
        let id = PieceId(self.next_piece_id);
        self.next_piece_id += 1;
        id
    }

    /// Builds the initial position from `config`. Plugins are activated
    /// first so that every namespace the board references is already
    /// registered. Fails without touching state if this instance was
    /// already loaded; board construction failures leave the engine
    /// unloaded but may leave plugins registered.
    pub fn load(&mut self, config: &GameConfig) -> Result<(), EngineError> {
        if self.loaded {
            return Err(EngineError::AlreadyLoaded);
        }

        for name in &config.plugins {
            if !plugins::install(name, &mut self.registry) {
                return Err(EngineError::UnknownPlugin(name.clone()));
            }
            self.plugins.push(name.clone());
        }

        let width = config.board.first().map_or(0, |row| row.chars().count());
        let mut rows = Vec::with_capacity(config.board.len());
        for (y, row) in config.board.iter().enumerate() {
            if row.chars().count() != width {
                return Err(EngineError::RaggedBoard { row: y });
            }
            let mut tiles = Vec::with_capacity(width);
            for (x, ch) in row.chars().enumerate() {
                let pos = Pos::new(x as i32, y as i32);
                let mut tile = Tile::new(pos);
                match config.entry(ch) {
                    Some((entry, case_faction)) => {
                        if let Some(props) = &entry.tile {
                            tile.props = props.clone();
                        }
                        if let Some(spec) = &entry.piece {
                            let def = self
                                .registry
                                .get(&spec.id)
                                .ok_or_else(|| EngineError::UnknownNamespace(spec.id.clone()))?;
                            let faction = spec
                                .props
                                .faction
                                .or(case_faction)
                                .unwrap_or_default();
                            let id = PieceId(self.next_piece_id);
                            self.next_piece_id += 1;
                            tile.piece = Some(def.instantiate(id, pos, faction, Some(&spec.props)));
                        }
                    }
                    None => warn!("no key entry for '{}', leaving tile empty", ch),
                }
                tiles.push(tile);
            }
            rows.push(tiles);
        }

        let frame = self.stack.last_mut().expect("frame stack is never empty");
        frame.board = Board::from_rows(rows);
        let subscribers = wire_subscriptions(&frame.board, &self.registry);
        frame.subscribers = subscribers;

        self.loaded = true;
        fire(&self.registry, frame, Event::LoadEnd, &[]);
        Ok(())
    }

    /// The unconditional apply primitive. Pushes a new frame and applies each
    /// move in order, resolving the acting piece by its source tile (falling
    /// back to its recorded id). Completed leg groups are appended to the
    /// frame's move log; a group whose final move does not continue fires the
    /// half-turn-ended event. No legality checking of any kind.
    pub fn force_move(&mut self, moves: &[Move]) {
        if moves.is_empty() {
            return;
        }

        let mover = self.frame().turn;
        self.next_version += 1;
        {
            let top = self.frame();
            let frame = Frame {
                board: Board::empty(),
                moves: top.moves.clone(),
                turn: top.turn.opponent(),
                prev_version: top.version,
                version: self.next_version,
                subscribers: Vec::new(),
            };
            self.stack.push(frame);
        }
        // The board is cloned only after the push so that subscription wiring
        // for the cloned pieces lands on the new frame, not the old one.
        let board = self.stack[self.stack.len() - 2].board.clone();
        let top = self.stack.last_mut().expect("frame stack is never empty");
        top.board = board;
        let subscribers = wire_subscriptions(&top.board, &self.registry);
        top.subscribers = subscribers;

        fire(&self.registry, top, Event::HalfTurnStart, moves);

        let mut leg: Vec<Move> = Vec::new();
        for (i, mv) in moves.iter().enumerate() {
            let mut logged = mv.clone();

            let piece_id = logged
                .from
                .and_then(|from| top.board.piece_at(from).map(|p| p.id))
                .or_else(|| logged.piece.filter(|&id| top.board.piece(id).is_some()));
            logged.piece = piece_id;
            if logged.namespace.is_none() {
                if let Some(id) = piece_id {
                    logged.namespace = top.board.piece(id).map(|p| p.kind.clone());
                }
            }

            if let Some(at) = logged.remove_at {
                if let Some(tile) = top.board.get_mut(at) {
                    tile.piece = None;
                }
            }
            if piece_id.is_some() {
                if let Some(at) = logged.capture_at {
                    top.board.take_piece(at);
                }
            }
            if piece_id.is_none() {
                if let (Some(ns), Some(at)) = (logged.namespace.clone(), logged.spawn_at) {
                    match self.registry.get(&ns) {
                        Some(def) => {
                            let faction = logged
                                .spawn_props
                                .as_ref()
                                .and_then(|p| p.faction)
                                .unwrap_or(mover);
                            let id = PieceId(self.next_piece_id);
                            self.next_piece_id += 1;
                            let spawned =
                                def.instantiate(id, at, faction, logged.spawn_props.as_ref());
                            top.board.put_piece(at, spawned);
                            subscriptions_for(def, id, &mut top.subscribers);
                        }
                        None => warn!("cannot spawn unregistered piece \"{}\"", ns),
                    }
                }
                if let (Some(ns), Some(at)) = (logged.namespace.clone(), logged.drop_at) {
                    match self.registry.get(&ns) {
                        Some(def) => {
                            // A drop materializes a default piece of the
                            // named kind for the moving faction.
                            let id = PieceId(self.next_piece_id);
                            self.next_piece_id += 1;
                            let dropped = def.instantiate(id, at, mover, None);
                            top.board.put_piece(at, dropped);
                            subscriptions_for(def, id, &mut top.subscribers);
                        }
                        None => warn!("cannot drop unregistered piece \"{}\"", ns),
                    }
                }
            }
            if piece_id.is_some() && logged.is_relocation() {
                let (from, to) = (logged.from.unwrap(), logged.to.unwrap());
                if top.board.get(to).is_some() {
                    if let Some(mut piece) = top.board.take_piece(from) {
                        piece.has_moved = true;
                        top.board.put_piece(to, piece);
                    }
                }
            }

            leg.push(logged);
            if mv.continues && i < moves.len() - 1 {
                continue;
            }
            let completed = std::mem::replace(&mut leg, Vec::new());
            top.moves.extend(completed.iter().cloned());
            if !mv.continues {
                fire(&self.registry, top, Event::HalfTurnEnd, &completed);
            }
        }
    }

    /// Structural legality trial: applies every leg group of `moves` to the
    /// stack and unwinds them all before returning. The stack depth is
    /// unchanged once this returns. Royal safety is deliberately not part of
    /// this check.
    pub fn is_legal(&mut self, moves: &[Move]) -> bool {
        if moves.is_empty() {
            return true;
        }
        let legs = split_legs(moves);
        let count = legs.len();
        for leg in legs {
            self.force_move(leg);
        }
        for _ in 0..count {
            self.undo_half_turn();
        }
        true
    }

    /// Commits `moves` if they pass the legality trial. On failure nothing
    /// is mutated.
    pub fn make_move(&mut self, moves: &[Move]) -> Result<(), EngineError> {
        if !self.is_legal(moves) {
            return Err(EngineError::IllegalMove);
        }
        self.force_move(moves);
        Ok(())
    }

    /// Pops one frame. The initial frame is never popped.
    pub fn undo_move(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Pops frames until a full leg group has been undone: keeps popping
    /// while the frame on top ends in a move that continues.
    pub fn undo_half_turn(&mut self) {
        let mut undid = false;
        loop {
            let tail_continues = self
                .frame()
                .moves
                .last()
                .map_or(false, |m| m.continues);
            if (undid && !tail_continues) || self.stack.len() == 1 {
                break;
            }
            self.stack.pop();
            undid = true;
        }
    }

    /// Every candidate half-turn for the piece with id `id`, generated
    /// through its registered definition.
    pub fn moves_for(&self, id: PieceId) -> Vec<HalfTurn> {
        let frame = self.frame();
        let piece = match frame.board.piece(id) {
            Some(piece) => piece,
            None => return Vec::new(),
        };
        let def = match self.registry.get(&piece.kind) {
            Some(def) => def,
            None => {
                warn!("piece {} has unregistered kind \"{}\"", id.0, piece.kind);
                return Vec::new();
            }
        };
        let ctx = MoveContext {
            board: &frame.board,
            registry: &self.registry,
        };
        def.moves(&ctx, piece, &frame.moves)
    }

    pub fn snapshot(&self) -> Snapshot {
        let frame = self.frame();
        let tiles = frame
            .board
            .tiles()
            .map(|tile| TileSnapshot {
                pos: tile.pos,
                piece: tile.piece.as_ref().map(|p| PieceSnapshot {
                    kind: p.kind.clone(),
                    name: p.name.clone(),
                    faction: p.faction,
                    forwards: p.forwards,
                    royal: p.royal,
                    iron: p.iron,
                    has_moved: p.has_moved,
                    props: p.props.clone(),
                }),
                props: tile.props.clone(),
            })
            .collect();
        Snapshot {
            width: frame.board.width(),
            height: frame.board.height(),
            turn: frame.turn,
            plugins: self.plugins.clone(),
            moves: notation::serialize(&frame.moves),
            tiles,
        }
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new()
    }
}

fn subscriptions_for(def: &PieceDef, id: PieceId, subs: &mut Vec<Subscription>) {
    if def.on_load_end.is_some() {
        subs.push(Subscription {
            event: Event::LoadEnd,
            piece: id,
        });
    }
    if def.on_half_turn_start.is_some() {
        subs.push(Subscription {
            event: Event::HalfTurnStart,
            piece: id,
        });
    }
    if def.on_half_turn_end.is_some() {
        subs.push(Subscription {
            event: Event::HalfTurnEnd,
            piece: id,
        });
    }
}

fn wire_subscriptions(board: &Board, registry: &PieceRegistry) -> Vec<Subscription> {
    let mut subs = Vec::new();
    for piece in board.pieces() {
        if let Some(def) = registry.get(&piece.kind) {
            subscriptions_for(def, piece.id, &mut subs);
        }
    }
    subs
}

fn fire(registry: &PieceRegistry, frame: &mut Frame, event: Event, half_turn: &[Move]) {
    let targets: Vec<PieceId> = frame
        .subscribers
        .iter()
        .filter(|s| s.event == event)
        .map(|s| s.piece)
        .collect();
    for id in targets {
        // A subscriber may have been captured earlier in the same half-turn.
        let kind = match frame.board.piece(id) {
            Some(piece) => piece.kind.clone(),
            None => continue,
        };
        let handler = registry.get(&kind).and_then(|def| match event {
            Event::LoadEnd => def.on_load_end,
            Event::HalfTurnStart => def.on_half_turn_start,
            Event::HalfTurnEnd => def.on_half_turn_end,
        });
        if let Some(handler) = handler {
            handler(&mut frame.board, id, half_turn);
        }
    }
}
