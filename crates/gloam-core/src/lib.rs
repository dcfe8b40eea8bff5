//! gloam-core: turn-based simulation core for the Gloam roguelike
//!
//! This crate contains the scheduling, action, combat, and status logic with
//! no I/O dependencies. It is designed to be pure and testable: the front-end
//! driver feeds one declared player action per cycle and drains the message
//! log and presentation event queue afterwards.

pub mod action;
pub mod agent;
pub mod ai;
pub mod body;
pub mod combat;
pub mod effect;
pub mod equipment;
pub mod item;
pub mod level;
pub mod liquid;
pub mod log;
pub mod map;
pub mod pathfind;
pub mod perception;
pub mod skill;
pub mod world;

mod consts;
mod rng;
mod scheduler;

pub use consts::*;
pub use rng::GameRng;
pub use scheduler::{CycleOutcome, TurnCycle};
