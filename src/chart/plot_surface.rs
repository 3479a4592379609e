//! In-memory chart surface drawn by `ui::chart_view`.
//!
//! Holds every series with its pane, style, data and markers, and answers the
//! layout questions (x range, per-pane y range, overlay projection) the view needs.

use std::sync::Arc;

use crate::chart::surface::{
    ChartSurface, ScaleMargins, SeriesHandle, SeriesStyle, SurfaceError, TradeMarker, VisualKind,
};
use crate::config::PLOT_CONFIG;
use crate::domain::SeriesData;
use crate::utils::maths_utils::{get_min_max, union_range};

#[derive(Debug, Clone)]
pub struct PlottedSeries {
    pub handle: SeriesHandle,
    pub kind: VisualKind,
    pub style: SeriesStyle,
    pub data: Arc<SeriesData>,
    pub visible: bool,
    pub margins: ScaleMargins,
    pub pane: usize,
    pub markers: Vec<TradeMarker>,
}

impl PlottedSeries {
    /// Histograms sit on their own overlay scale; everything else shares the pane's price scale.
    pub fn is_overlay(&self) -> bool {
        self.kind == VisualKind::Histogram
    }

    fn value_range(&self) -> Option<(f64, f64)> {
        match self.data.as_ref() {
            SeriesData::Bars(bars) => {
                let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
                let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
                Some((get_min_max(&lows)?.0, get_min_max(&highs)?.1))
            }
            SeriesData::Points(points) => {
                let values: Vec<f64> = points.iter().map(|p| p.value).collect();
                get_min_max(&values)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct PlotSurface {
    next_id: u64,
    /// Insertion order is draw order
    series: Vec<PlottedSeries>,
    fit_requested: bool,
}

impl PlotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self) -> &[PlottedSeries] {
        &self.series
    }

    pub fn get(&self, handle: SeriesHandle) -> Option<&PlottedSeries> {
        self.series.iter().find(|s| s.handle == handle)
    }

    fn get_mut(&mut self, handle: SeriesHandle) -> Option<&mut PlottedSeries> {
        let found = self.series.iter_mut().find(|s| s.handle == handle);
        if found.is_none() {
            log::debug!("Ignoring call on stale series handle {}", handle);
        }
        found
    }

    /// Series of one pane, in draw order.
    pub fn pane_series(&self, pane: usize) -> impl Iterator<Item = &PlottedSeries> {
        self.series.iter().filter(move |s| s.pane == pane)
    }

    /// Returns true once per `fit_content` call.
    pub fn take_fit_request(&mut self) -> bool {
        std::mem::take(&mut self.fit_requested)
    }

    /// Time span covered by all visible series.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.series
            .iter()
            .filter(|s| s.visible)
            .filter_map(|s| s.data.time_range())
            .map(|(a, b)| (a as f64, b as f64))
            .fold(None, |acc, r| union_range(acc, Some(r)))
    }

    /// Y bounds of a pane so that its price-scale series honour their margins.
    /// A pane holding only overlay series uses the unit range.
    pub fn pane_y_bounds(&self, pane: usize) -> (f64, f64) {
        let price_series: Vec<&PlottedSeries> = self
            .pane_series(pane)
            .filter(|s| s.visible && !s.is_overlay())
            .collect();

        let range = price_series
            .iter()
            .filter_map(|s| s.value_range())
            .fold(None, |acc, r| union_range(acc, Some(r)));

        let Some((lo, hi)) = range else {
            return (0.0, 1.0);
        };

        let margins = price_series
            .first()
            .map(|s| s.margins)
            .unwrap_or(PLOT_CONFIG.price_scale_margins);
        let span = if hi > lo { hi - lo } else { lo.abs().max(1.0) * 0.01 };
        let total = span / margins.data_fraction();
        (lo - margins.bottom * total, hi + margins.top * total)
    }

    /// Maps an overlay value into pane coordinates, inside the series' margin band.
    pub fn project_overlay(&self, series: &PlottedSeries, value: f64, pane_bounds: (f64, f64)) -> f64 {
        let (lo, hi) = series
            .value_range()
            .map(|(lo, hi)| (lo.min(0.0), hi.max(0.0)))
            .unwrap_or((0.0, 1.0));
        let fraction = if hi > lo { (value - lo) / (hi - lo) } else { 0.0 };
        let (y_min, y_max) = pane_bounds;
        let m = series.margins;
        y_min + (y_max - y_min) * (m.bottom + fraction * m.data_fraction())
    }
}

impl ChartSurface for PlotSurface {
    fn create_series(&mut self, kind: VisualKind, style: &SeriesStyle) -> Result<SeriesHandle, SurfaceError> {
        self.next_id += 1;
        let handle = SeriesHandle(self.next_id);
        let margins = match kind {
            VisualKind::Histogram => PLOT_CONFIG.volume_scale_margins,
            VisualKind::Line | VisualKind::PriceBar => PLOT_CONFIG.price_scale_margins,
        };
        self.series.push(PlottedSeries {
            handle,
            kind,
            style: *style,
            data: Arc::new(SeriesData::default()),
            visible: true,
            margins,
            pane: 0,
            markers: Vec::new(),
        });
        Ok(handle)
    }

    fn remove_series(&mut self, handle: SeriesHandle) {
        self.series.retain(|s| s.handle != handle);
    }

    fn set_data(&mut self, handle: SeriesHandle, data: Arc<SeriesData>) {
        if let Some(series) = self.get_mut(handle) {
            series.data = data;
        }
    }

    fn set_visible(&mut self, handle: SeriesHandle, visible: bool) {
        if let Some(series) = self.get_mut(handle) {
            series.visible = visible;
        }
    }

    fn set_scale_margins(&mut self, handle: SeriesHandle, margins: ScaleMargins) {
        if let Some(series) = self.get_mut(handle) {
            series.margins = margins;
        }
    }

    fn move_to_pane(&mut self, handle: SeriesHandle, pane: usize) {
        if let Some(series) = self.get_mut(handle) {
            series.pane = pane;
        }
    }

    fn set_markers(&mut self, handle: SeriesHandle, markers: Vec<TradeMarker>) {
        if let Some(series) = self.get_mut(handle) {
            series.markers = markers;
        }
    }

    fn pane_count(&self) -> usize {
        self.series.iter().map(|s| s.pane + 1).max().unwrap_or(1)
    }

    fn fit_content(&mut self) {
        self.fit_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PriceBar, SeriesPoint};
    use eframe::egui::Color32;

    fn style() -> SeriesStyle {
        SeriesStyle {
            color: Color32::WHITE,
            line_width: 1.0,
            line_style: crate::chart::LineStyle::Solid,
            up_color: Color32::GREEN,
            down_color: Color32::RED,
        }
    }

    fn points(values: &[f64]) -> Arc<SeriesData> {
        Arc::new(SeriesData::Points(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| SeriesPoint::new(i as i64 * 60, *v))
                .collect(),
        ))
    }

    #[test]
    fn panes_grow_and_shrink_with_series() {
        let mut surface = PlotSurface::new();
        assert_eq!(surface.pane_count(), 1);

        let a = surface.create_series(VisualKind::Line, &style()).unwrap();
        let b = surface.create_series(VisualKind::Line, &style()).unwrap();
        surface.move_to_pane(b, 2);
        assert_eq!(surface.pane_count(), 3);

        surface.remove_series(b);
        assert_eq!(surface.pane_count(), 1);
        surface.remove_series(a);
        assert_eq!(surface.pane_count(), 1);
    }

    #[test]
    fn kind_sets_default_margins() {
        let mut surface = PlotSurface::new();
        let line = surface.create_series(VisualKind::Line, &style()).unwrap();
        let hist = surface.create_series(VisualKind::Histogram, &style()).unwrap();
        assert_eq!(surface.get(line).unwrap().margins, PLOT_CONFIG.price_scale_margins);
        assert_eq!(surface.get(hist).unwrap().margins, PLOT_CONFIG.volume_scale_margins);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut surface = PlotSurface::new();
        let a = surface.create_series(VisualKind::Line, &style()).unwrap();
        surface.remove_series(a);
        surface.set_visible(a, false);
        surface.set_data(a, points(&[1.0]));
        assert!(surface.series().is_empty());
    }

    #[test]
    fn price_scale_leaves_room_below() {
        let mut surface = PlotSurface::new();
        let bars = surface.create_series(VisualKind::PriceBar, &style()).unwrap();
        surface.set_data(
            bars,
            Arc::new(SeriesData::Bars(vec![
                PriceBar::new(0, 10.0, 20.0, 10.0, 15.0),
                PriceBar::new(60, 15.0, 20.0, 12.0, 18.0),
            ])),
        );
        let (y_min, y_max) = surface.pane_y_bounds(0);
        // data span 10 over half the pane: 20 total, 8 below, 2 above
        assert!((y_min - 2.0).abs() < 1e-9);
        assert!((y_max - 22.0).abs() < 1e-9);
    }

    #[test]
    fn overlay_projects_into_lower_band() {
        let mut surface = PlotSurface::new();
        let hist = surface.create_series(VisualKind::Histogram, &style()).unwrap();
        surface.set_data(hist, points(&[0.0, 50.0, 100.0]));
        let series = surface.get(hist).unwrap().clone();
        let bounds = surface.pane_y_bounds(0);
        assert_eq!(bounds, (0.0, 1.0));
        assert!((surface.project_overlay(&series, 100.0, bounds) - 0.3).abs() < 1e-9);
        assert!((surface.project_overlay(&series, 0.0, bounds) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn fit_request_is_taken_once() {
        let mut surface = PlotSurface::new();
        surface.fit_content();
        assert!(surface.take_fit_request());
        assert!(!surface.take_fit_request());
    }

    #[test]
    fn hidden_series_do_not_widen_x_range() {
        let mut surface = PlotSurface::new();
        let a = surface.create_series(VisualKind::Line, &style()).unwrap();
        surface.set_data(a, points(&[1.0, 2.0, 3.0]));
        assert_eq!(surface.x_range(), Some((0.0, 120.0)));
        surface.set_visible(a, false);
        assert_eq!(surface.x_range(), None);
    }
}
