use std::fmt;
use std::sync::Arc;

use eframe::egui::Color32;
use strum_macros::{Display, EnumIter};

use crate::domain::{SeriesData, UnixTime};

/// The three ways a series can be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum VisualKind {
    Line,
    Histogram,
    PriceBar,
}

/// Opaque id of a series living on a chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesHandle(pub(crate) u64);

impl fmt::Display for SeriesHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Style parameters handed to the surface. A plain value: every instance gets its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Color32,
    pub line_width: f32,
    pub line_style: LineStyle,
    /// Used by price bars and direction-colored histograms
    pub up_color: Color32,
    pub down_color: Color32,
}

impl SeriesStyle {
    pub fn with_color(self, color: Color32) -> Self {
        Self { color, ..self }
    }
}

/// Fractions of the pane height kept free above and below a series' data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

impl ScaleMargins {
    /// Share of the pane height the data itself occupies.
    pub fn data_fraction(&self) -> f64 {
        (1.0 - self.top - self.bottom).max(0.05)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
    Circle,
}

/// A point marker attached to one series.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeMarker {
    pub time: UnixTime,
    pub position: MarkerPosition,
    pub shape: MarkerShape,
    pub color: Color32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The surface cannot draw this kind of series
    UnsupportedKind(VisualKind),
    /// The handle does not name a live series
    UnknownHandle(SeriesHandle),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::UnsupportedKind(kind) => write!(f, "Unsupported series kind: {}", kind),
            SurfaceError::UnknownHandle(handle) => write!(f, "Unknown series handle: {}", handle),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The rendering surface the series manager drives.
///
/// Mutating calls on a stale handle are ignored; only creation can fail.
pub trait ChartSurface {
    fn create_series(&mut self, kind: VisualKind, style: &SeriesStyle) -> Result<SeriesHandle, SurfaceError>;
    fn remove_series(&mut self, handle: SeriesHandle);
    fn set_data(&mut self, handle: SeriesHandle, data: Arc<SeriesData>);
    fn set_visible(&mut self, handle: SeriesHandle, visible: bool);
    fn set_scale_margins(&mut self, handle: SeriesHandle, margins: ScaleMargins);
    /// Moves a series onto pane `pane`, creating panes up to that index.
    fn move_to_pane(&mut self, handle: SeriesHandle, pane: usize);
    fn set_markers(&mut self, handle: SeriesHandle, markers: Vec<TradeMarker>);
    /// Number of panes currently shown; never less than one (the main pane).
    fn pane_count(&self) -> usize;
    /// Asks the surface to fit its visible time range to the data.
    fn fit_content(&mut self);
}
