//! Lanesim combat predictor.
//!
//! Predicts how a wave of mobile units fares against a fixed set of
//! structures on the lane battlefield, and searches for the deployments
//! and builds that score best under those predictions.

pub mod board;
pub mod eval;
pub mod resolve;
pub mod search;

pub use board::{Action, GameState, Location, Player, UnitType};
pub use resolve::{simulate, Outcome, SimConfig};
pub use search::{Optimizer, SearchConfig, TurnPlan};
