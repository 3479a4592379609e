/// Every user-facing string of the desktop shell.
pub struct UiText {
    pub window_title: &'static str,
    pub source_heading: &'static str,
    pub source_hint: &'static str,
    pub load_button: &'static str,
    pub loading: &'static str,
    pub legend_heading: &'static str,
    pub filter_heading: &'static str,
    pub filter_select_all: &'static str,
    pub filter_select_none: &'static str,
    pub filter_empty: &'static str,
    pub status_heading: &'static str,
    pub status_idle: &'static str,
    pub status_load_failed: &'static str,
    pub status_sync_failed: &'static str,
    pub empty_chart: &'static str,
    pub plot_x_axis: &'static str,
    pub hover_time: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    window_title: "Series Sync",
    source_heading: "Data source",
    source_hint: "path/to/table.csv or https://...",
    load_button: "Load",
    loading: "Loading...",
    legend_heading: "Legend",
    filter_heading: "Visible series",
    filter_select_all: "Select all",
    filter_select_none: "Select none",
    filter_empty: "No series loaded",
    status_heading: "Status",
    status_idle: "No data loaded yet",
    status_load_failed: "Load failed",
    status_sync_failed: "No chartable columns; previous chart kept",
    empty_chart: "Load a table with OHLC or indicator columns to begin.",
    plot_x_axis: "Time (UTC)",
    hover_time: "Time",
};
