/// Unix time in seconds. Every series on the chart shares this time axis.
pub type UnixTime = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarDirection {
    Bullish,
    Bearish,
}

/// One OHLC bar, already normalized to unix seconds by the table decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub time: UnixTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PriceBar {
    pub fn new(time: UnixTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        PriceBar {
            time,
            open,
            high,
            low,
            close,
        }
    }

    // A method to determine the type of bar
    pub fn direction(&self) -> BarDirection {
        if self.close >= self.open {
            BarDirection::Bullish
        } else {
            BarDirection::Bearish
        }
    }

    // Returns the low and high of the bar body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.direction() {
            BarDirection::Bullish => (self.open, self.close),
            BarDirection::Bearish => (self.close, self.open),
        }
    }
}

/// One scalar sample of a line or histogram series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: UnixTime,
    pub value: f64,
    /// Per-point direction, used to color volume bars like their candle
    pub direction: Option<BarDirection>,
}

impl SeriesPoint {
    pub fn new(time: UnixTime, value: f64) -> Self {
        Self {
            time,
            value,
            direction: None,
        }
    }
}

/// A raw trade-event cell, e.g. "LongEntry|ShortExit".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeEvent {
    pub time: UnixTime,
    pub label: String,
}

/// The value of a series at one instant, as shown in the legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesValue {
    Bar(PriceBar),
    Scalar(f64),
}

/// The data currently pushed into one chart series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Bars(Vec<PriceBar>),
    Points(Vec<SeriesPoint>),
}

impl Default for SeriesData {
    fn default() -> Self {
        SeriesData::Points(Vec::new())
    }
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Bars(bars) => bars.len(),
            SeriesData::Points(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First and last time covered, if any.
    pub fn time_range(&self) -> Option<(UnixTime, UnixTime)> {
        match self {
            SeriesData::Bars(bars) => Some((bars.first()?.time, bars.last()?.time)),
            SeriesData::Points(points) => Some((points.first()?.time, points.last()?.time)),
        }
    }

    /// Exact-time lookup; data is sorted by time so this is a binary search.
    pub fn value_at(&self, time: UnixTime) -> Option<SeriesValue> {
        match self {
            SeriesData::Bars(bars) => bars
                .binary_search_by(|bar| bar.time.cmp(&time))
                .ok()
                .map(|idx| SeriesValue::Bar(bars[idx])),
            SeriesData::Points(points) => points
                .binary_search_by(|point| point.time.cmp(&time))
                .ok()
                .map(|idx| SeriesValue::Scalar(points[idx].value)),
        }
    }

    /// Closest sample at or before `time`. The crosshair snaps to this.
    pub fn time_at_or_before(&self, time: UnixTime) -> Option<UnixTime> {
        let pick = |search: Result<usize, usize>| match search {
            Ok(idx) => Some(idx),
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        };
        match self {
            SeriesData::Bars(bars) => {
                pick(bars.binary_search_by(|bar| bar.time.cmp(&time))).map(|idx| bars[idx].time)
            }
            SeriesData::Points(points) => {
                pick(points.binary_search_by(|point| point.time.cmp(&time)))
                    .map(|idx| points[idx].time)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars() -> SeriesData {
        SeriesData::Bars(vec![
            PriceBar::new(10, 1.0, 2.0, 0.5, 1.5),
            PriceBar::new(20, 1.5, 2.5, 1.0, 1.2),
            PriceBar::new(30, 1.2, 1.8, 1.1, 1.7),
        ])
    }

    #[test]
    fn direction_follows_close_vs_open() {
        assert_eq!(PriceBar::new(0, 1.0, 2.0, 0.5, 1.5).direction(), BarDirection::Bullish);
        assert_eq!(PriceBar::new(0, 1.5, 2.0, 0.5, 1.0).direction(), BarDirection::Bearish);
        assert_eq!(PriceBar::new(0, 1.5, 2.0, 0.5, 1.0).body_range(), (1.0, 1.5));
    }

    #[test]
    fn value_at_requires_exact_time() {
        let data = bars();
        assert!(matches!(data.value_at(20), Some(SeriesValue::Bar(b)) if b.close == 1.2));
        assert_eq!(data.value_at(25), None);
        assert_eq!(data.time_range(), Some((10, 30)));
    }

    #[test]
    fn time_at_or_before_snaps_backwards() {
        let data = bars();
        assert_eq!(data.time_at_or_before(5), None);
        assert_eq!(data.time_at_or_before(10), Some(10));
        assert_eq!(data.time_at_or_before(29), Some(20));
        assert_eq!(data.time_at_or_before(99), Some(30));
    }
}
