use eframe::egui::{Checkbox, Id, Ui};

use crate::filter::{FilterEntry, HierarchicalFilter, TriState};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::ui_panels::Panel;
use crate::ui::styles::UiStyleExt;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    SetItem(String, bool),
    SetGroup(String, bool),
    SelectAll,
    SelectNone,
}

/// Popup with one checkbox per series; groups get a tri-state checkbox over their members.
/// Every widget id is derived from the filter's injected container.
pub struct FilterView<'a> {
    filter: &'a HierarchicalFilter,
}

impl<'a> FilterView<'a> {
    pub fn new(filter: &'a HierarchicalFilter) -> Self {
        Self { filter }
    }

    fn render_entries(&self, ui: &mut Ui, events: &mut Vec<FilterEvent>) {
        if self.filter.items().is_empty() {
            ui.label(UI_TEXT.filter_empty);
            return;
        }

        ui.horizontal(|ui| {
            if ui.small_button(UI_TEXT.filter_select_all).clicked() {
                events.push(FilterEvent::SelectAll);
            }
            if ui.small_button(UI_TEXT.filter_select_none).clicked() {
                events.push(FilterEvent::SelectNone);
            }
        });
        ui.separator();

        for entry in self.filter.entries() {
            match entry {
                FilterEntry::Item { item, selected } => {
                    let mut checked = selected;
                    if ui.checkbox(&mut checked, item.label.as_str()).changed() {
                        events.push(FilterEvent::SetItem(item.id.clone(), checked));
                    }
                }
                FilterEntry::Group { group, state, members } => {
                    let mut checked = state == TriState::Checked;
                    let response = ui.add(
                        Checkbox::new(&mut checked, group.group_label.as_str())
                            .indeterminate(state == TriState::Indeterminate),
                    );
                    if response.changed() {
                        events.push(FilterEvent::SetGroup(group.group_id.clone(), checked));
                    }

                    ui.horizontal(|ui| {
                        ui.add_space(UI_CONFIG.filter_member_indent);
                        ui.vertical(|ui| {
                            for (member, selected) in members {
                                let mut checked = selected;
                                if ui.checkbox(&mut checked, member.label.as_str()).changed() {
                                    events.push(FilterEvent::SetItem(member.id.clone(), checked));
                                }
                            }
                        });
                    });
                }
            }
        }
    }
}

impl<'a> Panel for FilterView<'a> {
    type Event = FilterEvent;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        let container = self.filter.container();
        ui.section_heading(container.title.as_str());

        ui.push_id(Id::new(&container.id_salt), |ui| {
            ui.menu_button(self.filter.summary(), |ui| {
                ui.set_min_width(UI_CONFIG.filter_popup_width);
                self.render_entries(ui, &mut events);
            });
        });

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions && !events.is_empty() {
            log::info!("Filter events: {:?}", events);
        }

        events
    }
}
