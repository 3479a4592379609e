// User interface components
pub mod app;
pub mod chart_view;
pub mod config;
pub mod filter_view;
pub mod plot_layers;
pub mod styles;
pub mod ui_panels;
pub mod ui_text;

// Re-export main app
pub use app::ChartApp;
pub use config::UI_CONFIG;
