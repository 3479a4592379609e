//! Plot visualization configuration

use eframe::egui::Color32;

use crate::chart::ScaleMargins;

pub struct MarkerColors {
    pub long_entry: Color32,
    pub short_entry: Color32,
    pub long_exit: Color32,
    pub short_exit: Color32,
}

pub struct PlotConfig {
    /// Price-like series reserve the lower 40% of their scale for overlays
    pub price_scale_margins: ScaleMargins,
    /// Volume-like series reserve the upper 70% of their scale
    pub volume_scale_margins: ScaleMargins,
    pub candle_up_color: Color32,
    pub candle_down_color: Color32,
    /// Volume bars take the candle color at this opacity
    pub volume_bar_opacity_pct: f32,
    pub markers: MarkerColors,
    pub marker_radius: f32,
    /// Share of the chart height given to the main (price) pane when indicator panes exist
    pub main_pane_height_pct: f32,
    /// Indicator panes never shrink below this height (points)
    pub min_pane_height: f32,
    /// Width of bodies for candles, as a fraction of the median bar spacing
    pub candle_body_width_pct: f64,
    /// Fallback bar spacing when a series holds a single point (seconds)
    pub default_bar_spacing_secs: f64,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    price_scale_margins: ScaleMargins {
        top: 0.1,
        bottom: 0.4,
    },
    volume_scale_margins: ScaleMargins {
        top: 0.7,
        bottom: 0.0,
    },
    candle_up_color: Color32::from_rgb(38, 166, 154),   // Teal
    candle_down_color: Color32::from_rgb(239, 83, 80),  // Red
    volume_bar_opacity_pct: 0.5,
    markers: MarkerColors {
        long_entry: Color32::from_rgb(38, 166, 154),  // Teal
        short_entry: Color32::from_rgb(239, 83, 80),  // Red
        long_exit: Color32::from_rgb(255, 215, 0),    // Gold
        short_exit: Color32::from_rgb(255, 165, 0),   // Orange
    },
    marker_radius: 6.0,
    main_pane_height_pct: 0.6,
    min_pane_height: 80.0,
    candle_body_width_pct: 0.7,
    default_bar_spacing_secs: 60.0,
};
