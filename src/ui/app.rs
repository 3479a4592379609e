use std::sync::mpsc::{Receiver, channel};
use std::time::Duration;

use eframe::{Frame, egui};
use poll_promise::Promise;
use serde::{Deserialize, Serialize};

use crate::chart::PlotSurface;
use crate::config::PERSISTENCE;
use crate::data::{SourceDescriptor, load_source_blocking};
use crate::filter::{FilterContainer, Selection};
use crate::series::SeriesManager;
use crate::ui::chart_view::{ChartEvent, ChartView};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::filter_view::{FilterEvent, FilterView};
use crate::ui::ui_panels::{LegendEvent, LegendPanel, LoadStatus, Panel, SourceEvent, SourcePanel, StatusPanel};
use crate::ui::styles::{UiStyleExt, apply_theme};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// The only state that survives a restart. Selection is never persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct PersistedState {
    pub source_text: String,
}

/// Result of one background load.
pub struct LoadOutcome {
    pub source: SourceDescriptor,
    pub result: anyhow::Result<String>,
}

pub struct ChartApp {
    state: PersistedState,
    manager: SeriesManager<PlotSurface>,
    chart_view: ChartView,
    load_promise: Option<Promise<LoadOutcome>>,
    /// Selection snapshots reported by the filter callback
    selection_rx: Receiver<Selection>,
    status: LoadStatus,
}

impl ChartApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial: Option<(SourceDescriptor, String)>) -> Self {
        let state = match cc.storage {
            Some(storage) => match eframe::get_value::<PersistedState>(storage, PERSISTENCE.state.app_key) {
                Some(state) => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_state_serde {
                        log::info!("Successfully loaded persisted state: {:?}", state);
                    }
                    state
                }
                None => {
                    #[cfg(debug_assertions)]
                    if DEBUG_FLAGS.print_state_serde {
                        log::info!("No persisted state found. Creating anew.");
                    }
                    PersistedState::default()
                }
            },
            None => PersistedState::default(),
        };

        let mut app = Self::with_state(state);
        if let Some((source, text)) = initial {
            app.state.source_text = source.to_string();
            app.apply_text(&source, &text);
        }
        app
    }

    fn with_state(state: PersistedState) -> Self {
        let (selection_tx, selection_rx) = channel::<Selection>();
        let mut manager = SeriesManager::new(
            PlotSurface::new(),
            FilterContainer::new("series_filter", UI_TEXT.filter_heading),
        );
        manager.set_on_selection_changed(move |selection| {
            // Receiver lives as long as the app; a send error only happens during shutdown.
            let _ = selection_tx.send(selection.clone());
        });

        Self {
            state,
            manager,
            chart_view: ChartView::new("chart"),
            load_promise: None,
            selection_rx,
            status: LoadStatus::Idle,
        }
    }

    /// Hands freshly loaded text to the manager. A failed sync keeps the current chart.
    fn apply_text(&mut self, source: &SourceDescriptor, text: &str) {
        match self.manager.resynchronize_text(text) {
            Ok(report) => {
                log::info!("Loaded {}: {}", source, report);
                self.status = LoadStatus::Loaded {
                    source: source.to_string(),
                    report,
                };
            }
            Err(e) => {
                log::warn!("{} kept previous chart: {}", source, e);
                self.status = LoadStatus::SyncFailed(format!("{}: {}", source, e));
            }
        }
    }

    fn start_load(&mut self, text: &str) {
        if self.load_promise.is_some() {
            return;
        }
        let Some(source) = SourceDescriptor::parse(text) else {
            return;
        };

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::info!("Starting background load of {}", source);
        }

        let promise = Promise::spawn_thread("table_load", move || {
            let result = load_source_blocking(&source);
            LoadOutcome { source, result }
        });
        self.load_promise = Some(promise);
    }

    fn poll_load(&mut self, ctx: &egui::Context) {
        let Some(promise) = self.load_promise.take() else {
            return;
        };
        match promise.try_take() {
            Ok(LoadOutcome { source, result }) => match result {
                Ok(text) => self.apply_text(&source, &text),
                Err(e) => {
                    log::error!("Load of {} failed: {:#}", source, e);
                    self.status = LoadStatus::LoadFailed(format!("{:#}", e));
                }
            },
            Err(pending) => {
                self.load_promise = Some(pending);
                ctx.request_repaint_after(Duration::from_millis(100));
            }
        }
    }

    /// The filter callback's snapshots, mapped 1:1 onto series visibility.
    fn drain_selection_changes(&mut self) {
        if let Some(selection) = self.selection_rx.try_iter().last() {
            self.manager.apply_selection(&selection);
        }
    }

    fn handle_filter_event(&mut self, event: FilterEvent) {
        match event {
            FilterEvent::SetItem(id, selected) => self.manager.set_item_selected(&id, selected),
            FilterEvent::SetGroup(group_id, selected) => self.manager.set_group_selected(&group_id, selected),
            FilterEvent::SelectAll => self.manager.select_all(),
            FilterEvent::SelectNone => self.manager.select_none(),
        }
    }

    fn render_side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("control_panel")
            .default_width(UI_CONFIG.side_panel_width)
            .show(ctx, |ui| {
                let is_loading = self.load_promise.is_some();
                let source_events = SourcePanel::new(&mut self.state.source_text, is_loading).render(ui);
                for SourceEvent::Load(text) in source_events {
                    self.start_load(&text);
                }
                ui.spaced_separator();

                let filter_events = FilterView::new(self.manager.filter()).render(ui);
                for event in filter_events {
                    self.handle_filter_event(event);
                }
                ui.spaced_separator();

                let legend_events = {
                    let filter = self.manager.filter();
                    let is_visible = |key: &str| filter.is_selected(key);
                    LegendPanel::new(
                        self.manager.legend_layout(),
                        self.manager.active().as_slice(),
                        &is_visible,
                    )
                    .render(ui)
                };
                for LegendEvent::Toggle(key) in legend_events {
                    self.manager.toggle_item(&key);
                }

                StatusPanel::new(&self.status).render(ui);
            });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let events = self.chart_view.show(ui, self.manager.surface_mut());
            for ChartEvent::CrosshairMoved(time) in events {
                self.manager.on_crosshair_move(time);
            }
        });
    }
}

impl eframe::App for ChartApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_state_serde {
            log::info!("Saving state: {:?}", self.state);
        }
        eframe::set_value(storage, PERSISTENCE.state.app_key, &self.state);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        apply_theme(ctx);

        self.poll_load(ctx);

        self.render_side_panel(ctx);
        self.render_central_panel(ctx);

        self.drain_selection_changes();
    }
}
