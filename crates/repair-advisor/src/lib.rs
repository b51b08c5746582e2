//! Repair-or-replace advisor: scores repair, buy used, donate and recycle
//! for a broken item under the user's budget, time and priority.

pub mod config;
pub mod decision;
pub mod error;
pub mod telemetry;

pub use decision::{evaluate, DecisionEngine, DecisionInput, DecisionOutput};
