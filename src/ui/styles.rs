use eframe::egui::{Color32, Context, RichText, Sense, Ui, Vec2, Visuals};
use crate::ui::config::UI_CONFIG;

/// Dark theme with the configured panel fills. Cheap enough to re-apply every frame.
pub fn apply_theme(ctx: &Context) {
    let mut visuals = Visuals::dark();
    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
    ] {
        widget.fg_stroke.color = UI_CONFIG.colors.label;
    }
    for widget in [&mut visuals.widgets.hovered, &mut visuals.widgets.active] {
        widget.fg_stroke.color = UI_CONFIG.colors.heading;
    }

    ctx.set_visuals(visuals);
}

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Renders small, gray text (good for labels like "Rows:").
    fn label_subdued(&mut self, text: impl Into<String>);

    /// Renders a "Label: Value" pair with consistent spacing and styling.
    /// The label is subdued, the value is colored.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    /// Renders a sub-section header using the configured global color.
    fn label_subheader(&mut self, text: impl Into<String>);

    /// Renders an error message (Red).
    fn label_error(&mut self, text: impl Into<String>);

    /// A filled square in the series color, followed by its legend text.
    fn legend_row(&mut self, color: Color32, text: &str, dimmed: bool);

    /// Side panel section title: uppercase monospace in the heading color.
    fn section_heading(&mut self, text: impl Into<String>);

    /// Separator between side panel sections.
    fn spaced_separator(&mut self);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::GRAY));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.subsection_heading));
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.status_error));
    }

    fn legend_row(&mut self, color: Color32, text: &str, dimmed: bool) {
        let color = if dimmed { color.gamma_multiply(0.35) } else { color };
        self.horizontal(|ui| {
            let size = Vec2::splat(UI_CONFIG.legend_swatch_size);
            let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
            ui.painter().rect_filled(rect, 2.0, color);
            let text = RichText::new(text).small().monospace();
            ui.label(if dimmed { text.color(Color32::DARK_GRAY) } else { text });
        });
    }

    fn section_heading(&mut self, text: impl Into<String>) {
        let title = RichText::new(format!("{}:", text.into().to_uppercase()))
            .color(UI_CONFIG.colors.heading)
            .monospace();
        self.add_space(UI_CONFIG.section_spacing);
        self.heading(title);
        self.add_space(UI_CONFIG.heading_spacing);
    }

    fn spaced_separator(&mut self) {
        self.add_space(UI_CONFIG.section_spacing);
        self.separator();
        self.add_space(UI_CONFIG.section_spacing);
    }
}
