//! Combat resolution.
//!
//! Replays a wave of mobile units against the board tick by tick and
//! summarises what it achieved.

pub mod outcome;
pub mod simulator;

pub use outcome::Outcome;
pub use simulator::{
    simulate, FireModel, SimConfig, Simulator, DEFAULT_MAX_TICKS, SELF_DESTRUCT_GRACE,
};
