//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Source;
use ratatui::prelude::Color;

/// Get a ratatui color for an event based on where it came from
pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::LoginResolver => Color::LightBlue,
        Source::CommentsPanel => Color::Cyan,
        Source::ChartRenderer => Color::Yellow,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    if msg.contains("error sending request") || msg.contains("Connection refused") {
        if let Some((context, _)) = msg.split_once(':') {
            return format!("{}: backend unreachable", context);
        }
        return "Backend unreachable".to_string();
    }
    if msg.contains("operation timed out") {
        if let Some((context, _)) = msg.split_once(':') {
            return format!("{}: request timed out", context);
        }
        return "Request timed out".to_string();
    }
    msg.to_string()
}
