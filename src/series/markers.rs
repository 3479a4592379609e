//! Trade-event overlay: point markers derived from event-label substrings.

use crate::chart::{MarkerPosition, MarkerShape, TradeMarker};
use crate::config::PLOT_CONFIG;
use crate::domain::TradeEvent;

/// Token, where the marker sits, and its shape. Tokens are not mutually exclusive.
const EVENT_RULES: &[(&str, MarkerPosition, MarkerShape)] = &[
    ("LongEntry", MarkerPosition::BelowBar, MarkerShape::ArrowUp),
    ("ShortEntry", MarkerPosition::AboveBar, MarkerShape::ArrowDown),
    ("LongExit", MarkerPosition::BelowBar, MarkerShape::Circle),
    ("ShortExit", MarkerPosition::AboveBar, MarkerShape::Circle),
];

fn color_for(token: &str) -> eframe::egui::Color32 {
    match token {
        "LongEntry" => PLOT_CONFIG.markers.long_entry,
        "ShortEntry" => PLOT_CONFIG.markers.short_entry,
        "LongExit" => PLOT_CONFIG.markers.long_exit,
        _ => PLOT_CONFIG.markers.short_exit,
    }
}

/// One marker per matching token per event, in event order.
pub fn markers_from_events(events: &[TradeEvent]) -> Vec<TradeMarker> {
    events
        .iter()
        .flat_map(|event| {
            EVENT_RULES
                .iter()
                .filter(|(token, _, _)| event.label.contains(token))
                .map(|&(token, position, shape)| TradeMarker {
                    time: event.time,
                    position,
                    shape,
                    color: color_for(token),
                    text: token.to_string(),
                })
        })
        .collect()
}
