//! Comma-delimited table decoding.
//!
//! Turns raw text with a header row into rows keyed by a normalized unix time,
//! and converts named columns into chart-ready points.

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{PriceBar, SeriesPoint, TradeEvent, UnixTime};
use crate::utils::TimeUtils;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

const TIME_COLUMN_NAMES: &[&str] = &["time", "timestamp", "date", "datetime"];
const EVENT_COLUMN_NAMES: &[&str] = &["event", "events", "signal", "signals", "trade"];
const OPEN_NAMES: &[&str] = &["open", "o"];
const HIGH_NAMES: &[&str] = &["high", "h"];
const LOW_NAMES: &[&str] = &["low", "l"];
const CLOSE_NAMES: &[&str] = &["close", "c"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The text could not be read as delimited records at all
    Malformed(String),
    /// Header present but no row carried a usable time
    NoRows,
    /// A conversion needed a column the table does not have
    MissingColumn(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(msg) => write!(f, "Malformed table: {}", msg),
            DecodeError::NoRows => write!(f, "Table has no usable rows"),
            DecodeError::MissingColumn(name) => write!(f, "Missing required column: {}", name),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Positions of the four columns a price bar needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceColumns {
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    time_column: usize,
    times: Vec<UnixTime>,
    rows: Vec<Vec<String>>,
    dropped_rows: usize,
}

impl Table {
    /// Parses the whole text. Rows whose time cell does not parse are dropped and counted;
    /// remaining rows are sorted by time and, for repeated times, the last row wins.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| DecodeError::Malformed(e.to_string()))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(DecodeError::Malformed("empty header row".to_string()));
        }

        let time_column = find_column(&headers, TIME_COLUMN_NAMES).unwrap_or(0);

        // BTreeMap keyed by time: sorted output, and a later row replaces an earlier one.
        let mut by_time: BTreeMap<UnixTime, Vec<String>> = BTreeMap::new();
        let mut dropped_rows = 0usize;
        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Skipping unreadable row: {}", e);
                    dropped_rows += 1;
                    continue;
                }
            };
            let Some(time) = record.get(time_column).and_then(TimeUtils::parse_timestamp) else {
                dropped_rows += 1;
                continue;
            };
            by_time.insert(time, record.iter().map(|cell| cell.to_string()).collect());
        }

        if by_time.is_empty() {
            return Err(DecodeError::NoRows);
        }

        let (times, rows): (Vec<_>, Vec<_>) = by_time.into_iter().unzip();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_decoder {
            log::info!(
                "[decoder] {} columns, {} rows, {} dropped, time column '{}'",
                headers.len(),
                rows.len(),
                dropped_rows,
                headers[time_column]
            );
        }

        Ok(Self {
            headers,
            time_column,
            times,
            rows,
            dropped_rows,
        })
    }

    /// Column names in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn time_column(&self) -> usize {
        self.time_column
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All four price columns, when present.
    pub fn price_columns(&self) -> Option<PriceColumns> {
        Some(PriceColumns {
            open: find_column(&self.headers, OPEN_NAMES)?,
            high: find_column(&self.headers, HIGH_NAMES)?,
            low: find_column(&self.headers, LOW_NAMES)?,
            close: find_column(&self.headers, CLOSE_NAMES)?,
        })
    }

    /// Name of the trade-event column, when present.
    pub fn event_column(&self) -> Option<&str> {
        find_column(&self.headers, EVENT_COLUMN_NAMES).map(|idx| self.headers[idx].as_str())
    }

    /// Bars for every row whose four price cells parse as numbers.
    pub fn rows_as_price_bars(&self) -> Result<Vec<PriceBar>, DecodeError> {
        let cols = self
            .price_columns()
            .ok_or_else(|| DecodeError::MissingColumn("open/high/low/close".to_string()))?;

        Ok(self
            .times
            .iter()
            .zip(&self.rows)
            .filter_map(|(&time, row)| {
                Some(PriceBar::new(
                    time,
                    number(row, cols.open)?,
                    number(row, cols.high)?,
                    number(row, cols.low)?,
                    number(row, cols.close)?,
                ))
            })
            .collect())
    }

    /// Points for one column, matched by its exact name. Non-numeric cells become gaps.
    pub fn rows_as_series(&self, column: &str) -> Result<Vec<SeriesPoint>, DecodeError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DecodeError::MissingColumn(column.to_string()))?;

        Ok(self
            .times
            .iter()
            .zip(&self.rows)
            .filter_map(|(&time, row)| Some(SeriesPoint::new(time, number(row, idx)?)))
            .collect())
    }

    /// Non-empty cells of the event column.
    pub fn rows_as_events(&self, column: &str) -> Result<Vec<TradeEvent>, DecodeError> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| DecodeError::MissingColumn(column.to_string()))?;

        Ok(self
            .times
            .iter()
            .zip(&self.rows)
            .filter_map(|(&time, row)| {
                let label = row.get(idx)?;
                (!label.is_empty()).then(|| TradeEvent {
                    time,
                    label: label.clone(),
                })
            })
            .collect())
    }
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.iter().any(|c| h.eq_ignore_ascii_case(c)))
}

fn number(row: &[String], idx: usize) -> Option<f64> {
    row.get(idx)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OHLCV: &str = "time,open,high,low,close,volume\n\
        1700000120,11,13,10,12,300\n\
        1700000000,10,12,9,11,100\n\
        1700000060,11,12,10,10.5,200\n";

    #[test]
    fn rows_are_sorted_by_time() {
        let table = Table::parse(OHLCV).unwrap();
        let bars = table.rows_as_price_bars().unwrap();
        let times: Vec<_> = bars.iter().map(|b| b.time).collect();
        assert_eq!(times, vec![1_700_000_000, 1_700_000_060, 1_700_000_120]);
        assert_eq!(bars[1].close, 10.5);
    }

    #[test]
    fn duplicate_time_keeps_last_row() {
        let table = Table::parse("time,sma\n100,1\n100,2\n").unwrap();
        let points = table.rows_as_series("sma").unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 2.0);
    }

    #[test]
    fn bad_times_are_dropped_and_counted() {
        let table = Table::parse("time,sma\nnope,1\n100,2\n").unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.dropped_rows(), 1);
    }

    #[test]
    fn no_usable_rows_is_an_error() {
        assert_eq!(Table::parse("time,close\n").unwrap_err(), DecodeError::NoRows);
        assert_eq!(Table::parse("time,close\nx,1\n").unwrap_err(), DecodeError::NoRows);
    }

    #[test]
    fn price_columns_need_all_four() {
        let table = Table::parse("time,close\n100,1\n").unwrap();
        assert!(table.price_columns().is_none());
        assert_eq!(
            table.rows_as_price_bars().unwrap_err(),
            DecodeError::MissingColumn("open/high/low/close".to_string())
        );

        let table = Table::parse("Date,Open,High,Low,Close\n2024-01-02,1,2,0.5,1.5\n").unwrap();
        assert!(table.price_columns().is_some());
        assert_eq!(table.time_column(), 0);
    }

    #[test]
    fn non_numeric_cells_become_gaps() {
        let table = Table::parse("time,rsi\n100,55\n160,\n220,abc\n280,61.5\n").unwrap();
        let points = table.rows_as_series("rsi").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].value, 61.5);
        assert!(matches!(
            table.rows_as_series("adx"),
            Err(DecodeError::MissingColumn(name)) if name == "adx"
        ));
    }

    #[test]
    fn events_skip_empty_cells() {
        let table = Table::parse("time,close,event\n100,1,LongEntry\n160,1,\n220,1,LongExit\n").unwrap();
        assert_eq!(table.event_column(), Some("event"));
        let events = table.rows_as_events("event").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].label, "LongExit");
    }
}
