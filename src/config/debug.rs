//! Debugging feature flags.
//!
//! Toggle individual diagnostics here and keep them `false` when committing.
//! Every use sits behind `#[cfg(debug_assertions)]`, so release builds never log them.

pub struct DebugFlags {
    /// Emit one line per discovered column during resynchronization (matched key, suffix, pane).
    pub print_discovery: bool,
    /// Emit pane assignment decisions (group -> pane index).
    pub print_pane_assignment: bool,
    /// Emit filter selection snapshots after every mutation.
    pub print_filter_changes: bool,
    /// Emit UI interaction logs (e.g., load button, filter popup).
    pub print_ui_interactions: bool,
    /// Emit details of the table decoder (dropped rows, detected columns).
    pub print_decoder: bool,
    /// Emit details of UI state serialization/deserialization logs.
    pub print_state_serde: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_discovery: false,
    print_pane_assignment: false,
    print_filter_changes: false,
    print_ui_interactions: false,
    print_decoder: false,
    print_state_serde: false,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_are_off_by_default() {
        let flags = [
            DEBUG_FLAGS.print_discovery,
            DEBUG_FLAGS.print_pane_assignment,
            DEBUG_FLAGS.print_filter_changes,
            DEBUG_FLAGS.print_ui_interactions,
            DEBUG_FLAGS.print_decoder,
            DEBUG_FLAGS.print_state_serde,
        ];
        assert!(flags.iter().all(|on| !on));
    }
}
