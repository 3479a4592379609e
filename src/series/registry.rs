//! Source registry: the static table of every series kind the chart knows.
//!
//! Columns are matched against `key` by prefix. Keys are lower case; matching
//! ignores ASCII case and the longest matching key wins, so `macd_signal_9`
//! maps to `macd_signal` even though `macd` is declared first.

use std::collections::HashSet;

use eframe::egui::Color32;
use strum_macros::{Display, EnumIter};

use crate::chart::{LineStyle, SeriesStyle, VisualKind};
use crate::config::PLOT_CONFIG;
use crate::domain::SeriesValue;
use crate::utils::formatting::{format_oscillator, format_price, format_volume};

/// Fixed key of the main price-bar series.
pub const PRICE_SERIES_KEY: &str = "__price__";

/// Indicators that belong together in the legend and, for oscillators, on one pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum IndicatorGroup {
    Bollinger,
    Keltner,
    Dmi,
    Macd,
    Stochastic,
}

impl IndicatorGroup {
    pub fn id(&self) -> &'static str {
        match self {
            IndicatorGroup::Bollinger => "bollinger",
            IndicatorGroup::Keltner => "keltner",
            IndicatorGroup::Dmi => "dmi",
            IndicatorGroup::Macd => "macd",
            IndicatorGroup::Stochastic => "stochastic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndicatorGroup::Bollinger => "Bollinger Bands",
            IndicatorGroup::Keltner => "Keltner Channel",
            IndicatorGroup::Dmi => "Directional Movement",
            IndicatorGroup::Macd => "MACD",
            IndicatorGroup::Stochastic => "Stochastic",
        }
    }

    /// Short legend symbol for the shared group container.
    pub fn symbol(&self) -> &'static str {
        match self {
            IndicatorGroup::Bollinger => "BB",
            IndicatorGroup::Keltner => "KC",
            IndicatorGroup::Dmi => "DMI",
            IndicatorGroup::Macd => "MACD",
            IndicatorGroup::Stochastic => "STOCH",
        }
    }
}

/// Where a source is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Price overlays, volume and the price bars themselves
    MainPane,
    /// Oscillators: stacked per group on a pane of their own
    OwnPane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Price,
    Volume,
    Oscillator,
    Ohlc,
}

impl ValueFormat {
    pub fn format(&self, value: &SeriesValue) -> String {
        match (self, value) {
            (_, SeriesValue::Bar(bar)) => format!(
                "O {} H {} L {} C {}",
                format_price(bar.open),
                format_price(bar.high),
                format_price(bar.low),
                format_price(bar.close)
            ),
            (ValueFormat::Volume, SeriesValue::Scalar(v)) => format_volume(*v),
            (ValueFormat::Oscillator, SeriesValue::Scalar(v)) => format_oscillator(*v),
            (ValueFormat::Price | ValueFormat::Ohlc, SeriesValue::Scalar(v)) => format_price(*v),
        }
    }
}

/// Style as declared in the table. Colors are HTML hex strings.
#[derive(Debug, Clone, Copy)]
pub struct StyleSpec {
    pub color: &'static str,
    /// Non-empty for sources that may repeat within one table
    pub palette: &'static [&'static str],
    pub line_width: f32,
    pub line_style: LineStyle,
}

#[derive(Debug, Clone, Copy)]
pub struct SourceEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: VisualKind,
    pub style: StyleSpec,
    pub group: Option<IndicatorGroup>,
    pub placement: Placement,
    pub value_format: ValueFormat,
    /// Histogram bars take the up/down color of the candle at the same time
    pub color_by_direction: bool,
    /// Turns an already formatted value into legend text
    pub legend: fn(&str) -> String,
}

impl SourceEntry {
    pub fn supports_repeats(&self) -> bool {
        !self.style.palette.is_empty()
    }

    /// Style for the `occurrence`-th column (0-based) matching this source.
    /// Always a fresh value; the table itself is never touched.
    pub fn style_for(&self, occurrence: usize) -> SeriesStyle {
        let base = SeriesStyle {
            color: parse_color(self.style.color),
            line_width: self.style.line_width,
            line_style: self.style.line_style,
            up_color: PLOT_CONFIG.candle_up_color,
            down_color: PLOT_CONFIG.candle_down_color,
        };
        if self.supports_repeats() {
            let palette = self.style.palette;
            base.with_color(parse_color(palette[occurrence % palette.len()]))
        } else {
            base
        }
    }

    /// Full legend text for one value.
    pub fn legend_text(&self, value: &SeriesValue) -> String {
        (self.legend)(&self.value_format.format(value))
    }
}

fn legend_plain(value: &str) -> String {
    value.to_string()
}

fn legend_percent(value: &str) -> String {
    format!("{}%", value)
}

fn legend_signed(value: &str) -> String {
    if value.starts_with('-') {
        value.to_string()
    } else {
        format!("+{}", value)
    }
}

const fn line(color: &'static str) -> StyleSpec {
    StyleSpec {
        color,
        palette: &[],
        line_width: 1.5,
        line_style: LineStyle::Solid,
    }
}

const fn repeating(color: &'static str, palette: &'static [&'static str]) -> StyleSpec {
    StyleSpec {
        color,
        palette,
        line_width: 1.5,
        line_style: LineStyle::Solid,
    }
}

const fn source(
    key: &'static str,
    label: &'static str,
    kind: VisualKind,
    style: StyleSpec,
    group: Option<IndicatorGroup>,
    placement: Placement,
    value_format: ValueFormat,
) -> SourceEntry {
    SourceEntry {
        key,
        label,
        kind,
        style,
        group,
        placement,
        value_format,
        color_by_direction: false,
        legend: legend_plain,
    }
}

const BAND_PALETTE: &[&str] = &["#42a5f5", "#ab47bc"];
const BAND_MIDDLE_PALETTE: &[&str] = &["#ffa726", "#ffee58"];
const MA_PALETTE: &[&str] = &["#2962ff", "#ff6d00", "#26c6da", "#ec407a"];
const EMA_PALETTE: &[&str] = &["#ffca28", "#66bb6a", "#8d6e63", "#7e57c2"];

pub static PRICE_ENTRY: SourceEntry = SourceEntry {
    key: PRICE_SERIES_KEY,
    label: "Price",
    kind: VisualKind::PriceBar,
    style: line("#26a69a"),
    group: None,
    placement: Placement::MainPane,
    value_format: ValueFormat::Ohlc,
    color_by_direction: false,
    legend: legend_plain,
};

use IndicatorGroup::{Bollinger, Dmi, Keltner, Macd, Stochastic};
use Placement::{MainPane, OwnPane};
use ValueFormat::{Oscillator, Price, Volume};
use VisualKind::{Histogram, Line};

/// Declaration order is the order of the legend for ties; matching uses the longest key.
pub static SOURCES: &[SourceEntry] = &[
    SourceEntry {
        color_by_direction: true,
        ..source("volume", "Volume", Histogram, line("#26a69a"), None, MainPane, Volume)
    },
    source("sma", "SMA", Line, repeating("#2962ff", MA_PALETTE), None, MainPane, Price),
    source("ema", "EMA", Line, repeating("#ffca28", EMA_PALETTE), None, MainPane, Price),
    source("wma", "WMA", Line, line("#7e57c2"), None, MainPane, Price),
    source("vwap", "VWAP", Line, line("#f06292"), None, MainPane, Price),
    source("bb_upper", "Upper Bollinger Band", Line, repeating("#42a5f5", BAND_PALETTE), Some(Bollinger), MainPane, Price),
    source(
        "bb_middle",
        "Middle Bollinger Band",
        Line,
        StyleSpec {
            line_style: LineStyle::Dashed,
            ..repeating("#ffa726", BAND_MIDDLE_PALETTE)
        },
        Some(Bollinger),
        MainPane,
        Price,
    ),
    source("bb_lower", "Lower Bollinger Band", Line, repeating("#42a5f5", BAND_PALETTE), Some(Bollinger), MainPane, Price),
    source("kc_upper", "Upper Keltner", Line, line("#26a69a"), Some(Keltner), MainPane, Price),
    source("kc_middle", "Middle Keltner", Line, line("#80cbc4"), Some(Keltner), MainPane, Price),
    source("kc_lower", "Lower Keltner", Line, line("#26a69a"), Some(Keltner), MainPane, Price),
    source(
        "psar",
        "Parabolic SAR",
        Line,
        StyleSpec {
            line_style: LineStyle::Dotted,
            ..line("#e0e0e0")
        },
        None,
        MainPane,
        Price,
    ),
    source("rsi", "RSI", Line, line("#ab47bc"), None, OwnPane, Oscillator),
    source("atr", "ATR", Line, line("#ef5350"), None, OwnPane, Price),
    source("obv", "OBV", Line, line("#26c6da"), None, OwnPane, Volume),
    source("cci", "CCI", Line, line("#8d6e63"), None, OwnPane, Oscillator),
    source("adx", "ADX", Line, line("#ffeb3b"), Some(Dmi), OwnPane, Oscillator),
    source("plus_di", "+DI", Line, line("#66bb6a"), Some(Dmi), OwnPane, Oscillator),
    source("minus_di", "-DI", Line, line("#ef5350"), Some(Dmi), OwnPane, Oscillator),
    source("macd", "MACD", Line, line("#2962ff"), Some(Macd), OwnPane, Price),
    source("macd_signal", "MACD Signal", Line, line("#ff6d00"), Some(Macd), OwnPane, Price),
    SourceEntry {
        legend: legend_signed,
        ..source("macd_hist", "MACD Histogram", Histogram, line("#26a69a"), Some(Macd), OwnPane, Price)
    },
    SourceEntry {
        legend: legend_percent,
        ..source("stoch_k", "%K", Line, line("#2962ff"), Some(Stochastic), OwnPane, Oscillator)
    },
    SourceEntry {
        legend: legend_percent,
        ..source("stoch_d", "%D", Line, line("#ff6d00"), Some(Stochastic), OwnPane, Oscillator)
    },
];

/// Entry for a source key, including the reserved price key.
pub fn lookup(key: &str) -> Option<&'static SourceEntry> {
    if key == PRICE_SERIES_KEY {
        return Some(&PRICE_ENTRY);
    }
    SOURCES.iter().find(|entry| entry.key == key)
}

/// Matches a column name to the longest source key it starts with, ignoring ASCII case.
/// Returns the entry and the remainder of the column name (the suffix).
pub fn match_column(column: &str) -> Option<(&'static SourceEntry, &str)> {
    SOURCES
        .iter()
        .filter(|entry| {
            let len = entry.key.len();
            column.len() >= len
                && column.is_char_boundary(len)
                && column[..len].eq_ignore_ascii_case(entry.key)
        })
        .max_by_key(|entry| entry.key.len())
        .map(|entry| (entry, &column[entry.key.len()..]))
}

/// Checks the table invariants: unique lower-case keys, non-empty labels, decodable colors.
pub fn validate() -> Result<(), String> {
    let mut seen = HashSet::new();
    for entry in SOURCES.iter().chain(std::iter::once(&PRICE_ENTRY)) {
        if !seen.insert(entry.key) {
            return Err(format!("duplicate source key '{}'", entry.key));
        }
        if entry.key != entry.key.to_ascii_lowercase() {
            return Err(format!("source key '{}' is not lower case", entry.key));
        }
        if entry.label.is_empty() {
            return Err(format!("source key '{}' has no label", entry.key));
        }
        for hex in std::iter::once(&entry.style.color).chain(entry.style.palette) {
            if colorgrad::Color::from_html(hex).is_err() {
                return Err(format!("source key '{}' has a bad color '{}'", entry.key, hex));
            }
        }
    }
    Ok(())
}

fn parse_color(hex: &str) -> Color32 {
    match colorgrad::Color::from_html(hex) {
        Ok(color) => {
            let rgba8 = color.to_rgba8();
            Color32::from_rgba_unmultiplied(rgba8[0], rgba8[1], rgba8[2], 255)
        }
        Err(e) => {
            log::error!("Bad registry color '{}': {}", hex, e);
            Color32::GRAY
        }
    }
}
