pub mod core;
pub mod engine;
pub mod error;
pub mod play;

pub use engine::search::{SearchLimits, Searcher};
pub use error::{EngineError, Result};
pub use play::Session;
