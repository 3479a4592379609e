use eframe::egui::{Button, RichText, ScrollArea, Sense, TextEdit, Ui};

use crate::series::{LegendBlock, LegendLayout, SeriesInstance, SyncReport};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

/// Panel for choosing and loading a table
pub struct SourcePanel<'a> {
    source_text: &'a mut String,
    is_loading: bool,
}

impl<'a> SourcePanel<'a> {
    pub fn new(source_text: &'a mut String, is_loading: bool) -> Self {
        Self {
            source_text,
            is_loading,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    Load(String),
}

impl<'a> Panel for SourcePanel<'a> {
    type Event = SourceEvent;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        ui.section_heading(UI_TEXT.source_heading);

        let edit = ui.add(
            TextEdit::singleline(self.source_text)
                .hint_text(UI_TEXT.source_hint)
                .desired_width(f32::INFINITY),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(eframe::egui::Key::Enter));

        ui.horizontal(|ui| {
            let clicked = ui
                .add_enabled(!self.is_loading, Button::new(UI_TEXT.load_button))
                .clicked();
            if self.is_loading {
                ui.spinner();
                ui.label_subdued(UI_TEXT.loading);
            }
            if (clicked || submitted) && !self.is_loading && !self.source_text.trim().is_empty() {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_ui_interactions {
                    log::info!("Load requested: {}", self.source_text.trim());
                }
                events.push(SourceEvent::Load(self.source_text.trim().to_string()));
            }
        });

        events
    }
}

/// Panel listing the legend blocks of the active series
pub struct LegendPanel<'a> {
    layout: &'a LegendLayout,
    instances: &'a [SeriesInstance],
    is_visible: &'a dyn Fn(&str) -> bool,
}

impl<'a> LegendPanel<'a> {
    pub fn new(
        layout: &'a LegendLayout,
        instances: &'a [SeriesInstance],
        is_visible: &'a dyn Fn(&str) -> bool,
    ) -> Self {
        Self {
            layout,
            instances,
            is_visible,
        }
    }

    fn render_entry(&self, ui: &mut Ui, key: &str) -> bool {
        let Some(inst) = self.instances.iter().find(|i| i.instance_key == key) else {
            return false;
        };
        let response = ui
            .scope(|ui| ui.legend_row(inst.legend.color, &inst.legend.text, !(self.is_visible)(key)))
            .response
            .interact(Sense::click());
        response.on_hover_text(inst.label()).clicked()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegendEvent {
    /// Clicking a legend row flips that series' visibility
    Toggle(String),
}

impl<'a> Panel for LegendPanel<'a> {
    type Event = LegendEvent;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        ui.section_heading(UI_TEXT.legend_heading);

        ScrollArea::vertical()
            .id_salt("legend_panel")
            .max_height(ui.available_height() * 0.6)
            .show(ui, |ui| {
                for block in &self.layout.blocks {
                    match block {
                        LegendBlock::Individual(key) => {
                            if self.render_entry(ui, key) {
                                events.push(LegendEvent::Toggle(key.clone()));
                            }
                        }
                        LegendBlock::Group { symbol, members, .. } => {
                            ui.label_subheader(*symbol);
                            ui.indent(*symbol, |ui| {
                                for key in members {
                                    if self.render_entry(ui, key) {
                                        events.push(LegendEvent::Toggle(key.clone()));
                                    }
                                }
                            });
                        }
                    }
                }
            });

        events
    }
}

/// What the status panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loaded {
        source: String,
        report: SyncReport,
    },
    LoadFailed(String),
    /// The text arrived but described nothing; the previous chart stays
    SyncFailed(String),
}

pub struct StatusPanel<'a> {
    status: &'a LoadStatus,
}

impl<'a> StatusPanel<'a> {
    pub fn new(status: &'a LoadStatus) -> Self {
        Self { status }
    }
}

impl<'a> Panel for StatusPanel<'a> {
    type Event = ();
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        ui.spaced_separator();
        ui.section_heading(UI_TEXT.status_heading);

        match self.status {
            LoadStatus::Idle => ui.label_subdued(UI_TEXT.status_idle),
            LoadStatus::Loaded { source, report } => {
                ui.metric("Source", source, UI_CONFIG.colors.status_ok);
                ui.metric("Series", &report.instances.to_string(), UI_CONFIG.colors.status_ok);
                ui.metric("Panes", &report.panes.to_string(), UI_CONFIG.colors.status_ok);
                ui.metric("Rows", &report.rows.to_string(), UI_CONFIG.colors.status_ok);
                if report.groups > 0 {
                    ui.metric("Groups", &report.groups.to_string(), UI_CONFIG.colors.status_ok);
                }
                if report.markers > 0 {
                    ui.metric("Markers", &report.markers.to_string(), UI_CONFIG.colors.status_ok);
                }
                if report.dropped_rows > 0 {
                    ui.metric("Dropped rows", &report.dropped_rows.to_string(), UI_CONFIG.colors.subsection_heading);
                }
                if !report.skipped_columns.is_empty() {
                    ui.label_subdued(format!("Skipped: {}", report.skipped_columns.join(", ")));
                }
            }
            LoadStatus::LoadFailed(msg) => {
                ui.label_error(UI_TEXT.status_load_failed);
                ui.label(RichText::new(msg).small());
            }
            LoadStatus::SyncFailed(source) => {
                ui.label_error(UI_TEXT.status_sync_failed);
                ui.label_subdued(source.as_str());
            }
        }

        Vec::new()
    }
}
