use eframe::egui::Stroke;
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Line, PlotPoints, PlotUi, Points, VLine};

use crate::chart::{LineStyle, MarkerPosition, MarkerShape, PlotSurface, PlottedSeries, VisualKind};
use crate::config::PLOT_CONFIG;
use crate::domain::{BarDirection, SeriesData, SeriesValue, UnixTime};
use crate::ui::config::UI_CONFIG;

/// Context passed to every layer during rendering.
/// This prevents argument explosion.
pub struct LayerContext<'a> {
    pub surface: &'a PlotSurface,
    pub pane: usize,
    /// Y bounds the pane is drawn with; overlay series are projected into them
    pub y_bounds: (f64, f64),
    /// Typical distance between two bars, in seconds
    pub bar_spacing: f64,
    pub crosshair: Option<UnixTime>,
}

impl<'a> LayerContext<'a> {
    fn visible(&self, kind: VisualKind) -> impl Iterator<Item = &'a PlottedSeries> + '_ {
        self.surface
            .pane_series(self.pane)
            .filter(move |s| s.visible && s.kind == kind)
    }
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. HISTOGRAM LAYER (Volume, MACD histogram)
// ============================================================================
pub struct HistogramLayer;

impl PlotLayer for HistogramLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let width = ctx.bar_spacing * PLOT_CONFIG.candle_body_width_pct;

        for series in ctx.visible(VisualKind::Histogram) {
            let SeriesData::Points(points) = series.data.as_ref() else {
                continue;
            };
            let base = ctx.surface.project_overlay(series, 0.0, ctx.y_bounds);

            let bars: Vec<Bar> = points
                .iter()
                .map(|p| {
                    let top = ctx.surface.project_overlay(series, p.value, ctx.y_bounds);
                    let fill = match p.direction {
                        Some(BarDirection::Bullish) => series.style.up_color,
                        Some(BarDirection::Bearish) => series.style.down_color,
                        None => series.style.color,
                    }
                    .gamma_multiply(PLOT_CONFIG.volume_bar_opacity_pct);
                    Bar::new(p.time as f64, top - base)
                        .base_offset(base)
                        .width(width)
                        .fill(fill)
                        .stroke(Stroke::NONE)
                })
                .collect();

            plot_ui.bar_chart(BarChart::new(format!("hist{}", series.handle), bars));
        }
    }
}

// ============================================================================
// 2. CANDLE LAYER (Price bars)
// ============================================================================
pub struct CandleLayer;

impl PlotLayer for CandleLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let width = ctx.bar_spacing * PLOT_CONFIG.candle_body_width_pct;

        for series in ctx.visible(VisualKind::PriceBar) {
            let SeriesData::Bars(bars) = series.data.as_ref() else {
                continue;
            };

            let boxes: Vec<BoxElem> = bars
                .iter()
                .map(|bar| {
                    let color = match bar.direction() {
                        BarDirection::Bullish => series.style.up_color,
                        BarDirection::Bearish => series.style.down_color,
                    };
                    let (body_lo, body_hi) = bar.body_range();
                    let mid = (body_lo + body_hi) / 2.0;
                    BoxElem::new(bar.time as f64, BoxSpread::new(bar.low, body_lo, mid, body_hi, bar.high))
                        .box_width(width)
                        .whisker_width(0.0)
                        .fill(color)
                        .stroke(Stroke::new(1.0, color))
                })
                .collect();

            plot_ui.box_plot(BoxPlot::new(format!("candles{}", series.handle), boxes));
        }
    }
}

// ============================================================================
// 3. LINE LAYER (Overlays and oscillators)
// ============================================================================
pub struct LineLayer;

impl PlotLayer for LineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for series in ctx.visible(VisualKind::Line) {
            let SeriesData::Points(points) = series.data.as_ref() else {
                continue;
            };
            let plot_points: PlotPoints = points.iter().map(|p| [p.time as f64, p.value]).collect();

            let line = Line::new(format!("line{}", series.handle), plot_points)
                .color(series.style.color)
                .width(series.style.line_width)
                .style(to_plot_line_style(series.style.line_style));
            plot_ui.line(line);
        }
    }
}

// ============================================================================
// 4. MARKER LAYER (Trade events on the price bars)
// ============================================================================
pub struct MarkerLayer;

impl PlotLayer for MarkerLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let offset = (ctx.y_bounds.1 - ctx.y_bounds.0) * 0.02;

        for series in ctx.visible(VisualKind::PriceBar) {
            for marker in &series.markers {
                let Some(SeriesValue::Bar(bar)) = series.data.value_at(marker.time) else {
                    continue;
                };
                let y = match marker.position {
                    MarkerPosition::AboveBar => bar.high + offset,
                    MarkerPosition::BelowBar => bar.low - offset,
                };
                let points = Points::new(marker.text.as_str(), vec![[marker.time as f64, y]])
                    .shape(to_plot_marker_shape(marker.shape))
                    .radius(PLOT_CONFIG.marker_radius)
                    .color(marker.color)
                    .filled(true);
                plot_ui.points(points);
            }
        }
    }
}

// ============================================================================
// 5. CROSSHAIR LAYER (Shared vertical line across panes)
// ============================================================================
pub struct CrosshairLayer;

impl PlotLayer for CrosshairLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if let Some(time) = ctx.crosshair {
            plot_ui.vline(
                VLine::new("crosshair", time as f64)
                    .color(UI_CONFIG.colors.crosshair.gamma_multiply(0.6))
                    .width(1.0),
            );
        }
    }
}

fn to_plot_line_style(style: LineStyle) -> egui_plot::LineStyle {
    match style {
        LineStyle::Solid => egui_plot::LineStyle::Solid,
        LineStyle::Dashed => egui_plot::LineStyle::Dashed { length: 8.0 },
        LineStyle::Dotted => egui_plot::LineStyle::Dotted { spacing: 6.0 },
    }
}

fn to_plot_marker_shape(shape: MarkerShape) -> egui_plot::MarkerShape {
    match shape {
        MarkerShape::ArrowUp => egui_plot::MarkerShape::Up,
        MarkerShape::ArrowDown => egui_plot::MarkerShape::Down,
        MarkerShape::Circle => egui_plot::MarkerShape::Circle,
    }
}

/// Layer stack for one pane, back to front.
pub fn pane_layers() -> Vec<Box<dyn PlotLayer>> {
    vec![
        Box::new(HistogramLayer),
        Box::new(CandleLayer),
        Box::new(LineLayer),
        Box::new(MarkerLayer),
        Box::new(CrosshairLayer),
    ]
}
