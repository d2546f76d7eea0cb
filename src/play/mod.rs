//! Game driver
//!
//! Runs a game between the engine and an opponent, keeping the true position
//! on the referee side and feeding the engine only its own views.

pub mod session;

pub use session::{Outcome, Session};
