use eframe::egui::{self, Id, RichText};
use egui_plot::{AxisHints, HPlacement, Plot};

use crate::chart::{ChartSurface, PlotSurface};
use crate::config::PLOT_CONFIG;
use crate::domain::{SeriesData, UnixTime};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::plot_layers::{LayerContext, pane_layers};
use crate::utils::TimeUtils;
use crate::utils::formatting::format_price;
use crate::utils::maths_utils::median_step;
use crate::utils::time_utils::epoch_sec_to_utc;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartEvent {
    /// Snapped time under the pointer, or `None` once the pointer leaves every pane
    CrosshairMoved(Option<UnixTime>),
}

/// Draws a `PlotSurface`: one plot per pane, x axes and cursor linked.
pub struct ChartView {
    id_salt: String,
    crosshair: Option<UnixTime>,
}

impl ChartView {
    pub fn new(id_salt: impl Into<String>) -> Self {
        Self {
            id_salt: id_salt.into(),
            crosshair: None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, surface: &mut PlotSurface) -> Vec<ChartEvent> {
        let mut events = Vec::new();

        if surface.series().is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(UI_TEXT.empty_chart).color(UI_CONFIG.colors.label));
            });
            if self.crosshair.take().is_some() {
                events.push(ChartEvent::CrosshairMoved(None));
            }
            return events;
        }

        let fit = surface.take_fit_request();
        let x_range = surface.x_range();
        let bar_spacing = bar_spacing(surface);
        let pane_count = surface.pane_count();
        let link_group = Id::new((self.id_salt.as_str(), "x_link"));

        // Leave room for the hover line under the plots
        let total_height = (ui.available_height() - 24.0).max(PLOT_CONFIG.min_pane_height);
        let heights = pane_heights(total_height, pane_count);

        let mut hovered_x: Option<f64> = None;
        let layers = pane_layers();

        for (pane, height) in heights.into_iter().enumerate() {
            let y_bounds = surface.pane_y_bounds(pane);
            let is_last = pane + 1 == pane_count;
            let ctx = LayerContext {
                surface: &*surface,
                pane,
                y_bounds,
                bar_spacing,
                crosshair: self.crosshair,
            };

            let plot = Plot::new((self.id_salt.as_str(), pane))
                .height(height)
                .link_axis(link_group, [true, false])
                .link_cursor(link_group, [true, false])
                .custom_x_axes(vec![create_x_axis()])
                .custom_y_axes(vec![create_y_axis()])
                .show_axes([is_last, true])
                .label_formatter(|_, _| String::new())
                .allow_zoom([true, false])
                .allow_drag([true, false])
                .allow_scroll([true, false])
                .allow_boxed_zoom(false);

            plot.show(ui, |plot_ui| {
                plot_ui.set_plot_bounds_y(y_bounds.0..=y_bounds.1);
                if fit && let Some((x_min, x_max)) = x_range {
                    let pad = bar_spacing;
                    plot_ui.set_plot_bounds_x((x_min - pad)..=(x_max + pad));
                }

                for layer in &layers {
                    layer.render(plot_ui, &ctx);
                }

                if plot_ui.response().hovered() {
                    hovered_x = plot_ui.pointer_coordinate().map(|p| p.x);
                }
            });
        }

        let snapped = hovered_x.and_then(|x| snap_time(surface, x));
        if snapped != self.crosshair {
            self.crosshair = snapped;

            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions && snapped.is_none() {
                log::info!("Crosshair left the chart");
            }

            events.push(ChartEvent::CrosshairMoved(snapped));
        }

        ui.horizontal(|ui| {
            let text = match self.crosshair {
                Some(time) => format!("{}: {}", UI_TEXT.hover_time, epoch_sec_to_utc(time, TimeUtils::FULL_TIME_FORMAT)),
                None => String::new(),
            };
            ui.label(RichText::new(text).small().monospace().color(UI_CONFIG.colors.label));
        });

        events
    }
}

/// Main pane takes its configured share when indicator panes exist; the rest split evenly.
fn pane_heights(total: f32, pane_count: usize) -> Vec<f32> {
    if pane_count <= 1 {
        return vec![total];
    }
    let main = total * PLOT_CONFIG.main_pane_height_pct;
    let others = ((total - main) / (pane_count - 1) as f32).max(PLOT_CONFIG.min_pane_height);
    std::iter::once(main)
        .chain(std::iter::repeat_n(others, pane_count - 1))
        .collect()
}

fn bar_spacing(surface: &PlotSurface) -> f64 {
    surface
        .series()
        .iter()
        .find(|s| s.data.len() > 1)
        .and_then(|s| median_step(&series_times(&s.data)))
        .unwrap_or(PLOT_CONFIG.default_bar_spacing_secs)
}

fn series_times(data: &SeriesData) -> Vec<f64> {
    match data {
        SeriesData::Bars(bars) => bars.iter().map(|b| b.time as f64).collect(),
        SeriesData::Points(points) => points.iter().map(|p| p.time as f64).collect(),
    }
}

/// Latest sample time at or before `x` across every series.
fn snap_time(surface: &PlotSurface, x: f64) -> Option<UnixTime> {
    let time = x.round() as UnixTime;
    surface
        .series()
        .iter()
        .filter_map(|s| s.data.time_at_or_before(time))
        .max()
}

fn create_x_axis() -> AxisHints<'static> {
    AxisHints::new_x()
        .label(UI_TEXT.plot_x_axis)
        .formatter(|grid_mark, range| {
            TimeUtils::format_axis_time(grid_mark.value, range.end() - range.start())
        })
}

fn create_y_axis() -> AxisHints<'static> {
    AxisHints::new_y()
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pane_takes_everything() {
        assert_eq!(pane_heights(500.0, 1), vec![500.0]);
    }

    #[test]
    fn indicator_panes_split_the_remainder() {
        let heights = pane_heights(1000.0, 3);
        assert_eq!(heights.len(), 3);
        assert!((heights[0] - 600.0).abs() < 1e-3);
        assert!((heights[1] - 200.0).abs() < 1e-3);
        assert_eq!(heights[1], heights[2]);
    }

    #[test]
    fn indicator_panes_respect_minimum_height() {
        let heights = pane_heights(300.0, 4);
        assert!(heights[1..].iter().all(|&h| h >= PLOT_CONFIG.min_pane_height));
    }
}
