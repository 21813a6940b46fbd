#![allow(dead_code)]

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod atom;
mod board;
pub mod config;
mod engine;
mod moves;
pub mod notation;
mod piece;
pub mod plugins;
mod registry;
mod types;

pub use board::{Board, Tile};
pub use engine::{Engine, EngineError, Event, Frame, PieceSnapshot, Snapshot, Subscription, TileSnapshot};
pub use moves::{split_legs, HalfTurn, Move};
pub use piece::{Piece, PieceProps};
pub use registry::{PieceDef, PieceRegistry};
pub use types::{Cardinal, Faction, PieceId, Pos};
