//! File persistence configuration

/// Settings for the eframe state store
pub struct StateStore {
    /// Path for saving/loading application UI state
    pub path: &'static str,
    /// Key under which the app struct is stored inside eframe's storage
    pub app_key: &'static str,
}

pub struct PersistenceConfig {
    pub state: StateStore,
    /// Maximum accepted size of a loaded table, in bytes
    pub max_table_bytes: usize,
}

pub const PERSISTENCE: PersistenceConfig = PersistenceConfig {
    state: StateStore {
        path: ".series_sync_state.json",
        app_key: eframe::APP_KEY,
    },
    max_table_bytes: 256 * 1024 * 1024,
};

/// Path for saving/loading application UI state
pub const APP_STATE_PATH: &str = PERSISTENCE.state.path;
