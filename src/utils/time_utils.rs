use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::UnixTime;

pub struct TimeUtils;

impl TimeUtils {
    pub const S_IN_MIN: i64 = 60;
    pub const S_IN_H: i64 = Self::S_IN_MIN * 60;
    pub const S_IN_D: i64 = Self::S_IN_H * 24;
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    pub const INTRADAY_TIME_FORMAT: &str = "%m-%d %H:%M";
    pub const FULL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
    /// Anything above this is a millisecond epoch rather than seconds.
    pub const MS_EPOCH_THRESHOLD: f64 = 1e12;

    const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    /// Normalizes one time cell to unix seconds.
    /// Accepts unix seconds or milliseconds (int or float), RFC 3339, and a few naive UTC layouts.
    pub fn parse_timestamp(raw: &str) -> Option<UnixTime> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(value) = raw.parse::<f64>() {
            if !value.is_finite() {
                return None;
            }
            let seconds = if value.abs() > Self::MS_EPOCH_THRESHOLD {
                value / 1000.0
            } else {
                value
            };
            return Some(seconds.floor() as UnixTime);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.timestamp());
        }

        for format in Self::NAIVE_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt.and_utc().timestamp());
            }
        }

        NaiveDate::parse_from_str(raw, Self::STANDARD_TIME_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
    }

    /// Axis label for a time, picking the layout from the visible span.
    pub fn format_axis_time(epoch_sec: f64, visible_span_sec: f64) -> String {
        let format = if visible_span_sec > (Self::S_IN_D * 90) as f64 {
            Self::STANDARD_TIME_FORMAT
        } else {
            Self::INTRADAY_TIME_FORMAT
        };
        epoch_sec_to_utc(epoch_sec.round() as i64, format)
    }
}

pub fn epoch_sec_to_utc(epoch_sec: i64, format: &str) -> String {
    // Used for display purposes
    match DateTime::from_timestamp(epoch_sec, 0) {
        Some(dt) => dt.format(format).to_string(),
        None => String::new(),
    }
}
