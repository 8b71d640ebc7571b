//! Hover tooltip text
//!
//! The tooltip reads three descriptive properties (`name`, `population`,
//! `updated`) plus the active dimension. A line is left out when its
//! property is missing.

use crate::input::hover::HoverState;
use crate::style::catalog::SelectedDimension;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DATE_FORMAT: &str = "%b %-d %Y";

/// Text lines shown next to the hovered region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub name: Option<String>,
    pub population: Option<String>,
    /// `(dimension label, formatted value)`
    pub value: Option<(String, String)>,
    pub updated: Option<String>,
    /// Pixel anchor
    pub x: i64,
    pub y: i64,
}

impl TooltipContent {
    pub fn new(hover: &HoverState, selected: &SelectedDimension) -> Self {
        let feature = &hover.feature;

        Self {
            name: feature.property("name").and_then(display_text),
            population: feature.property("population").and_then(display_text),
            value: feature
                .property(&selected.key)
                .and_then(display_text)
                .map(|v| (selected.label.clone(), v)),
            updated: feature.property("updated").and_then(format_date),
            x: hover.x.round() as i64,
            y: hover.y.round() as i64,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);
        if let Some(name) = &self.name {
            lines.push(format!("State: {}", name));
        }
        if let Some(population) = &self.population {
            lines.push(format!("Population: {}", population));
        }
        if let Some((label, value)) = &self.value {
            lines.push(format!("{}: {}", label, value));
        }
        if let Some(updated) = &self.updated {
            lines.push(format!("Updated: {}", updated));
        }
        lines
    }
}

fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64().map(group_thousands),
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Epoch milliseconds (or an RFC 3339 string) as `Sep 13 2020`, in UTC
fn format_date(value: &Value) -> Option<String> {
    let date: DateTime<Utc> = match value {
        Value::Number(n) => DateTime::<Utc>::from_timestamp_millis(n.as_f64()? as i64)?,
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok()?.with_timezone(&Utc),
        _ => return None,
    };
    Some(date.format(DATE_FORMAT).to_string())
}

/// `1234567.891` → `1,234,567.891`. At most three fraction digits are kept.
pub(crate) fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = format!("{:.3}", value.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + fraction.len() + 2);
    if value < 0.0 && rounded.chars().any(|c| c != '0' && c != '.') {
        grouped.push('-');
    }
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
