use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub status_ok: Color32,
    pub status_error: Color32,
    pub crosshair: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub side_panel_width: f32,
    pub filter_popup_width: f32,
    pub legend_swatch_size: f32,
    /// Indentation of group members in the filter popup
    pub filter_member_indent: f32,
    /// Space around side panel sections and separators
    pub section_spacing: f32,
    pub heading_spacing: f32,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,     // This sets every label globally to this color
        heading: Color32::YELLOW, // Sets every heading
        subsection_heading: Color32::ORANGE,
        central_panel: Color32::from_rgb(20, 22, 28),
        side_panel: Color32::from_rgb(25, 25, 25),
        status_ok: Color32::from_rgb(130, 200, 140),
        status_error: Color32::from_rgb(255, 100, 100),
        crosshair: Color32::from_rgb(150, 150, 150),
    },
    side_panel_width: 260.0,
    filter_popup_width: 240.0,
    legend_swatch_size: 10.0,
    filter_member_indent: 16.0,
    section_spacing: 10.0,
    heading_spacing: 5.0,
};
