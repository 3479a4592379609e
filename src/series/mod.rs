//! Series synchronization: registry lookup, pane planning, series creation and
//! the manager that swaps whole instance sets in on every load.

use std::fmt;

use crate::chart::{SurfaceError, VisualKind};
use crate::data::DecodeError;

pub mod factory;
pub mod legend;
pub mod manager;
pub mod markers;
pub mod pane;
pub mod registry;

pub use legend::{LegendBlock, LegendEntry, LegendLayout};
pub use manager::{SeriesInstance, SeriesManager, SyncReport};
pub use registry::{IndicatorGroup, PRICE_SERIES_KEY, SourceEntry};

#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    /// Nothing in the input maps to a series; the previous set stays active
    NoData(String),
    /// One conversion could not find its columns; only that feature is skipped
    MissingColumns(String),
    /// The surface refused the kind declared in the registry
    UnknownVisualKind(VisualKind),
    Surface(SurfaceError),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::NoData(msg) => write!(f, "No data: {}", msg),
            SyncError::MissingColumns(msg) => write!(f, "Missing columns: {}", msg),
            SyncError::UnknownVisualKind(kind) => write!(f, "Unknown visual kind: {}", kind),
            SyncError::Surface(e) => write!(f, "Chart surface error: {}", e),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<SurfaceError> for SyncError {
    fn from(e: SurfaceError) -> Self {
        match e {
            SurfaceError::UnsupportedKind(kind) => SyncError::UnknownVisualKind(kind),
            other => SyncError::Surface(other),
        }
    }
}

impl From<DecodeError> for SyncError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::MissingColumn(name) => SyncError::MissingColumns(name),
            other => SyncError::NoData(other.to_string()),
        }
    }
}
