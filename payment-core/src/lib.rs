pub mod calculations;
pub mod config;
pub mod format;
pub mod models;
pub mod state;

pub use config::{ConfigError, ConfigLoadError, EngineConfig};
pub use models::*;
pub use state::{CalculatorSession, RateEditOutcome, RateEditor, SelectionError};
