// Chart surface: the seam between series management and drawing
pub mod plot_surface;
pub mod surface;

#[cfg(test)]
pub mod testing;

pub use plot_surface::{PlotSurface, PlottedSeries};
pub use surface::{
    ChartSurface, LineStyle, MarkerPosition, MarkerShape, ScaleMargins, SeriesHandle, SeriesStyle,
    SurfaceError, TradeMarker, VisualKind,
};
