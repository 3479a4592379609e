//! Test double: a `PlotSurface` that records calls and can refuse kinds.

use std::sync::Arc;

use super::plot_surface::PlotSurface;
use super::surface::{
    ChartSurface, ScaleMargins, SeriesHandle, SeriesStyle, SurfaceError, TradeMarker, VisualKind,
};
use crate::domain::SeriesData;

#[derive(Default)]
pub struct RecordingSurface {
    pub inner: PlotSurface,
    pub rejected_kinds: Vec<VisualKind>,
    pub calls: Vec<String>,
}

impl RecordingSurface {
    pub fn rejecting(kind: VisualKind) -> Self {
        Self {
            rejected_kinds: vec![kind],
            ..Default::default()
        }
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl ChartSurface for RecordingSurface {
    fn create_series(&mut self, kind: VisualKind, style: &SeriesStyle) -> Result<SeriesHandle, SurfaceError> {
        self.calls.push(format!("create {}", kind));
        if self.rejected_kinds.contains(&kind) {
            return Err(SurfaceError::UnsupportedKind(kind));
        }
        self.inner.create_series(kind, style)
    }

    fn remove_series(&mut self, handle: SeriesHandle) {
        self.calls.push(format!("remove {}", handle));
        self.inner.remove_series(handle);
    }

    fn set_data(&mut self, handle: SeriesHandle, data: Arc<SeriesData>) {
        self.calls.push(format!("data {}", handle));
        self.inner.set_data(handle, data);
    }

    fn set_visible(&mut self, handle: SeriesHandle, visible: bool) {
        self.calls.push(format!("visible {} {}", handle, visible));
        self.inner.set_visible(handle, visible);
    }

    fn set_scale_margins(&mut self, handle: SeriesHandle, margins: ScaleMargins) {
        self.calls.push(format!("margins {}", handle));
        self.inner.set_scale_margins(handle, margins);
    }

    fn move_to_pane(&mut self, handle: SeriesHandle, pane: usize) {
        self.calls.push(format!("pane {} {}", handle, pane));
        self.inner.move_to_pane(handle, pane);
    }

    fn set_markers(&mut self, handle: SeriesHandle, markers: Vec<TradeMarker>) {
        self.calls.push(format!("markers {} {}", handle, markers.len()));
        self.inner.set_markers(handle, markers);
    }

    fn pane_count(&self) -> usize {
        self.inner.pane_count()
    }

    fn fit_content(&mut self) {
        self.calls.push("fit".to_string());
        self.inner.fit_content();
    }
}
