//! Pane assignment for own-pane indicators.
//!
//! Members of one indicator group stack on the same pane; each new group
//! appends a pane. Price overlays, volume and the price bars never come here.

use std::collections::HashMap;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::series::registry::{Placement, SourceEntry};

/// The key two own-pane series must share to stack: the registry group, or the bare source key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneGroup {
    Indicator(&'static str),
    Source(&'static str),
}

impl PaneGroup {
    pub fn of(entry: &SourceEntry) -> Option<Self> {
        match entry.placement {
            Placement::MainPane => None,
            Placement::OwnPane => Some(match entry.group {
                Some(group) => PaneGroup::Indicator(group.id()),
                None => PaneGroup::Source(entry.key),
            }),
        }
    }
}

/// Memo scoped to one resynchronization pass.
#[derive(Debug, Default)]
pub struct PaneAssigner {
    chosen: HashMap<PaneGroup, usize>,
}

impl PaneAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pane for one own-pane series. `pane_count` is the number of panes in the layout
    /// being built at this moment; a group seen for the first time gets that index.
    pub fn pane_index_for(&mut self, entry: &SourceEntry, pane_count: usize) -> usize {
        let Some(group) = PaneGroup::of(entry) else {
            return 0;
        };

        if let Some(&pane) = self.chosen.get(&group) {
            return pane;
        }

        let pane = pane_count.max(1);
        self.chosen.insert(group, pane);

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_pane_assignment {
            log::info!("[pane] {:?} -> pane {}", group, pane);
        }

        pane
    }

    /// Number of panes the layout needs so far: the main pane plus every assigned one.
    pub fn pane_count(&self) -> usize {
        self.chosen.values().max().map(|max| max + 1).unwrap_or(1)
    }
}
