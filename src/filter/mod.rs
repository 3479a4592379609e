//! Hierarchical multi-select filter.
//!
//! Items are either standalone or members of a group. A group's checkbox is
//! never stored: [`HierarchicalFilter::group_state`] derives it from the
//! selection every time it is asked.

use std::collections::BTreeSet;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Ids of the currently selected items.
pub type Selection = BTreeSet<String>;

pub type SelectionCallback = Box<dyn FnMut(&Selection)>;

/// Where the filter is drawn. Every widget id is derived from `id_salt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterContainer {
    pub id_salt: String,
    pub title: String,
}

impl FilterContainer {
    pub fn new(id_salt: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id_salt: id_salt.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTag {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub id: String,
    pub label: String,
    pub group: Option<GroupTag>,
}

impl FilterItem {
    pub fn individual(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group: None,
        }
    }

    pub fn grouped(
        id: impl Into<String>,
        label: impl Into<String>,
        group_id: impl Into<String>,
        group_label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group: Some(GroupTag {
                id: group_id.into(),
                label: group_label.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGroup {
    pub group_id: String,
    pub group_label: String,
    pub member_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Unchecked,
    Checked,
    Indeterminate,
}

/// Rendering view: standalone items and groups in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry<'a> {
    Item {
        item: &'a FilterItem,
        selected: bool,
    },
    Group {
        group: &'a FilterGroup,
        state: TriState,
        members: Vec<(&'a FilterItem, bool)>,
    },
}

pub struct HierarchicalFilter {
    container: FilterContainer,
    items: Vec<FilterItem>,
    groups: Vec<FilterGroup>,
    selected: Selection,
    on_selection_changed: Option<SelectionCallback>,
}

impl std::fmt::Debug for HierarchicalFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchicalFilter")
            .field("container", &self.container)
            .field("items", &self.items.len())
            .field("groups", &self.groups.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl HierarchicalFilter {
    pub fn new(container: FilterContainer) -> Self {
        Self {
            container,
            items: Vec::new(),
            groups: Vec::new(),
            selected: Selection::new(),
            on_selection_changed: None,
        }
    }

    pub fn container(&self) -> &FilterContainer {
        &self.container
    }

    pub fn set_on_selection_changed(&mut self, callback: impl FnMut(&Selection) + 'static) {
        self.on_selection_changed = Some(Box::new(callback));
    }

    /// Drops every item and group and rebuilds from `items`, all selected.
    /// Fires the callback once.
    pub fn replace_items(&mut self, items: impl IntoIterator<Item = FilterItem>) {
        self.items.clear();
        self.groups.clear();
        self.selected.clear();
        for item in items {
            self.insert(item);
        }
        self.notify();
    }

    /// Adds (or re-adds) one item, selected.
    pub fn add_item(&mut self, item: FilterItem) {
        self.detach(&item.id);
        self.insert(item);
        self.notify();
    }

    /// No-op for an unknown id. The last member leaving a group removes the group.
    pub fn remove_item(&mut self, id: &str) {
        if self.detach(id) {
            self.notify();
        }
    }

    pub fn items(&self) -> &[FilterItem] {
        &self.items
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selected
    }

    /// Snapshot copy of the selection.
    pub fn get_selection(&self) -> Selection {
        self.selected.clone()
    }

    pub fn set_item_selected(&mut self, id: &str, selected: bool) {
        if !self.contains(id) {
            return;
        }
        let changed = if selected {
            self.selected.insert(id.to_string())
        } else {
            self.selected.remove(id)
        };
        if changed {
            self.notify();
        }
    }

    pub fn toggle_item(&mut self, id: &str) {
        let selected = self.is_selected(id);
        self.set_item_selected(id, !selected);
    }

    /// Cascades one value to every member of the group.
    pub fn set_group_selected(&mut self, group_id: &str, selected: bool) {
        let Some(group) = self.groups.iter().find(|g| g.group_id == group_id) else {
            return;
        };
        let mut changed = false;
        for id in &group.member_ids {
            changed |= if selected {
                self.selected.insert(id.clone())
            } else {
                self.selected.remove(id)
            };
        }
        if changed {
            self.notify();
        }
    }

    /// `None` for an unknown group.
    pub fn group_state(&self, group_id: &str) -> Option<TriState> {
        self.groups
            .iter()
            .find(|g| g.group_id == group_id)
            .map(|g| self.state_of(g))
    }

    pub fn select_all(&mut self) {
        let before = self.selected.len();
        self.selected = self.items.iter().map(|item| item.id.clone()).collect();
        if self.selected.len() != before {
            self.notify();
        }
    }

    pub fn select_none(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.notify();
        }
    }

    pub fn entries(&self) -> Vec<FilterEntry<'_>> {
        let mut entries = Vec::new();
        let mut seen_groups: Vec<&str> = Vec::new();
        for item in &self.items {
            match &item.group {
                None => entries.push(FilterEntry::Item {
                    item,
                    selected: self.is_selected(&item.id),
                }),
                Some(tag) => {
                    if seen_groups.contains(&tag.id.as_str()) {
                        continue;
                    }
                    seen_groups.push(&tag.id);
                    let Some(group) = self.groups.iter().find(|g| g.group_id == tag.id) else {
                        continue;
                    };
                    let members = group
                        .member_ids
                        .iter()
                        .filter_map(|id| self.items.iter().find(|i| &i.id == id))
                        .map(|member| (member, self.is_selected(&member.id)))
                        .collect();
                    entries.push(FilterEntry::Group {
                        group,
                        state: self.state_of(group),
                        members,
                    });
                }
            }
        }
        entries
    }

    /// Short text for the closed popup button.
    pub fn summary(&self) -> String {
        let total = self.items.len();
        match self.selected.len() {
            n if total > 0 && n == total => "All series".to_string(),
            0 => "None".to_string(),
            n => format!("{} of {}", n, total),
        }
    }

    fn state_of(&self, group: &FilterGroup) -> TriState {
        let selected = group
            .member_ids
            .iter()
            .filter(|id| self.selected.contains(*id))
            .count();
        match selected {
            0 => TriState::Unchecked,
            n if n == group.member_ids.len() => TriState::Checked,
            _ => TriState::Indeterminate,
        }
    }

    fn insert(&mut self, item: FilterItem) {
        if let Some(tag) = &item.group {
            match self.groups.iter_mut().find(|g| g.group_id == tag.id) {
                Some(group) => group.member_ids.push(item.id.clone()),
                None => self.groups.push(FilterGroup {
                    group_id: tag.id.clone(),
                    group_label: tag.label.clone(),
                    member_ids: vec![item.id.clone()],
                }),
            }
        }
        self.selected.insert(item.id.clone());
        self.items.push(item);
    }

    /// Removes an item without notifying. Returns whether it existed.
    fn detach(&mut self, id: &str) -> bool {
        let Some(pos) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        let item = self.items.remove(pos);
        self.selected.remove(id);
        if let Some(tag) = item.group {
            for group in self.groups.iter_mut().filter(|g| g.group_id == tag.id) {
                group.member_ids.retain(|member| member != id);
            }
            self.groups.retain(|g| !g.member_ids.is_empty());
        }
        true
    }

    fn notify(&mut self) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_filter_changes {
            log::info!(
                "[filter:{}] selection {:?}",
                self.container.id_salt,
                self.selected
            );
        }

        if let Some(callback) = self.on_selection_changed.as_mut() {
            let snapshot = self.selected.clone();
            callback(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn filter() -> HierarchicalFilter {
        HierarchicalFilter::new(FilterContainer::new("test_filter", "Series"))
    }

    fn band_items() -> Vec<FilterItem> {
        vec![
            FilterItem::individual("__price__", "Price"),
            FilterItem::grouped("bb_upper_20", "Upper Bollinger Band _20", "bollinger", "BB"),
            FilterItem::grouped("bb_middle_20", "Middle Bollinger Band _20", "bollinger", "BB"),
            FilterItem::grouped("bb_lower_20", "Lower Bollinger Band _20", "bollinger", "BB"),
        ]
    }

    #[test]
    fn replace_selects_everything() {
        let mut f = filter();
        f.replace_items(band_items());
        assert_eq!(f.selection().len(), 4);
        assert_eq!(f.groups().len(), 1);
        assert_eq!(f.group_state("bollinger"), Some(TriState::Checked));
        assert_eq!(f.summary(), "All series");
    }

    #[test]
    fn unchecking_group_deselects_members() {
        let mut f = filter();
        f.replace_items(band_items());
        f.set_group_selected("bollinger", false);

        assert_eq!(f.group_state("bollinger"), Some(TriState::Unchecked));
        assert!(f.is_selected("__price__"));
        assert!(!f.is_selected("bb_middle_20"));
        assert_eq!(f.summary(), "1 of 4");
    }

    #[test]
    fn one_of_three_is_indeterminate() {
        let mut f = filter();
        f.replace_items(band_items());
        f.set_group_selected("bollinger", false);
        f.toggle_item("bb_upper_20");
        assert_eq!(f.group_state("bollinger"), Some(TriState::Indeterminate));

        f.set_group_selected("bollinger", true);
        assert_eq!(f.group_state("bollinger"), Some(TriState::Checked));
    }

    #[test]
    fn smaller_replace_leaves_no_orphan_group() {
        let mut f = filter();
        f.replace_items(vec![
            FilterItem::individual("__price__", "Price"),
            FilterItem::grouped("adx", "ADX", "dmi", "DMI"),
        ]);
        f.replace_items(vec![FilterItem::individual("__price__", "Price")]);
        assert!(f.groups().is_empty());
        assert_eq!(f.group_state("dmi"), None);
    }

    #[test]
    fn removing_last_member_removes_group() {
        let mut f = filter();
        f.replace_items(vec![FilterItem::grouped("adx", "ADX", "dmi", "DMI")]);
        f.remove_item("adx");
        assert!(f.groups().is_empty());
        assert!(f.selection().is_empty());

        // idempotent
        f.remove_item("adx");
        f.remove_item("never_there");
        assert!(f.items().is_empty());
    }

    #[test]
    fn re_added_item_is_selected() {
        let mut f = filter();
        f.replace_items(band_items());
        f.select_none();
        assert_eq!(f.summary(), "None");

        f.add_item(FilterItem::grouped("bb_upper_20", "Upper", "bollinger", "BB"));
        assert!(f.is_selected("bb_upper_20"));
        assert_eq!(f.items().len(), 4);
        assert_eq!(f.group_state("bollinger"), Some(TriState::Indeterminate));
    }

    #[test]
    fn callback_receives_snapshots() {
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut f = filter();
        f.set_on_selection_changed(move |selection| sink.borrow_mut().push(selection.len()));
        f.replace_items(band_items());
        f.set_item_selected("__price__", false);
        // no change, no callback
        f.set_item_selected("__price__", false);
        f.select_all();

        assert_eq!(*seen.borrow(), vec![4, 3, 4]);
    }

    #[test]
    fn entries_keep_first_seen_order() {
        let mut f = filter();
        f.replace_items(vec![
            FilterItem::grouped("adx", "ADX", "dmi", "DMI"),
            FilterItem::individual("volume", "Volume"),
            FilterItem::grouped("plus_di", "+DI", "dmi", "DMI"),
        ]);
        let entries = f.entries();
        assert_eq!(entries.len(), 2);
        match &entries[0] {
            FilterEntry::Group { group, members, state } => {
                assert_eq!(group.group_id, "dmi");
                assert_eq!(members.len(), 2);
                assert_eq!(*state, TriState::Checked);
            }
            other => panic!("expected group, got {:?}", other),
        }
        assert!(matches!(entries[1], FilterEntry::Item { item, selected: true } if item.id == "volume"));
    }
}
