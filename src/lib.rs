#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod filter;
pub mod series;
pub mod ui;
pub mod utils;

use std::path::PathBuf;

// Re-export commonly used types
pub use data::{SourceDescriptor, Table, fetch_initial_table};
pub use filter::HierarchicalFilter;
pub use series::{SeriesManager, SyncError};
pub use ui::ChartApp;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// CSV table to load at startup (ignored when --url is given)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// URL of a CSV table to load at startup
    #[arg(long)]
    pub url: Option<String>,
}

/// Main application entry point - creates the GUI app
pub fn run_app(
    cc: &eframe::CreationContext,
    initial: Option<(SourceDescriptor, String)>,
) -> Box<dyn eframe::App> {
    Box::new(ui::ChartApp::new(cc, initial))
}
