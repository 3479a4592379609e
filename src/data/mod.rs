// Data loading and table decoding
pub mod pre_main_async;
pub mod source;
pub mod table;

// Re-export commonly used types
pub use pre_main_async::fetch_initial_table;
pub use source::{SourceDescriptor, load_source, load_source_blocking};
pub use table::{DecodeError, PriceColumns, Table};
