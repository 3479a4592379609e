//! Configuration module for the series-sync application.

mod debug; // Can be private now because we have a public re-export. Forces files to use crate::config::DEBUG_FLAGS not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use persistence::{APP_STATE_PATH, PERSISTENCE};
pub use plot::PLOT_CONFIG;
