/// Agent interface
pub mod agent;

/// Implemented RL algorithms
pub mod algo;

/// Maze configuration files
pub mod config;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Transitions
pub mod exp;

/// Exploration policies
pub mod exploration;

/// Environments
pub mod gym;

/// Injectable randomness
pub mod random;

/// Episodic training loop and metrics
pub mod train;

/// Terminal rendering
#[cfg(feature = "viz")]
pub mod viz;

mod util;

pub use error::{ConfigError, Error, Result};
