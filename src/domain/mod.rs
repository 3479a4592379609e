// Domain types and value objects
pub mod candle;

// Re-export commonly used types
pub use candle::{BarDirection, PriceBar, SeriesData, SeriesPoint, SeriesValue, TradeEvent, UnixTime};
