//! Human-readable rendering of readings and the consolidated "Run" report.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;

use crate::models::{MetricReading, MetricValue, Reachability};

/// Short status for a reading, as shown next to its title.
pub fn status(reading: &MetricReading) -> String {
    match &reading.outcome {
        Err(_) => "Error".to_string(),
        Ok(MetricValue::Percentage(p)) => format!("{}%", p),
        Ok(MetricValue::Reachability(r)) => r.status_display().to_string(),
        Ok(MetricValue::Displays(displays)) => format!("{} attached", displays.len()),
        Ok(MetricValue::Brightness(levels)) => format!("{} backlight(s)", levels.len()),
    }
}

/// Full text for one domain: a single line for scalar readings, a heading
/// plus one line per item for display and brightness lists.
pub fn describe(reading: &MetricReading) -> String {
    let domain = reading.domain;
    let value = match &reading.outcome {
        Ok(value) => value,
        Err(reason) => return format!("Error checking {}: {}", domain.subject(), reason),
    };

    match value {
        MetricValue::Percentage(p) => format!("{}: {}%", domain.title(), p),
        MetricValue::Reachability(Reachability::Unexpected(code)) => format!(
            "{}: {}, Status code: {}",
            domain.title(),
            Reachability::Unexpected(*code).status_display(),
            code
        ),
        MetricValue::Reachability(r) => format!("{}: {}", domain.title(), r.status_display()),
        MetricValue::Displays(displays) => {
            let mut text = format!("{}:", domain.title());
            if displays.is_empty() {
                text.push_str(" none detected");
            }
            for display in displays {
                let dpi = display
                    .dpi
                    .map(|d| format!("{:.1}", d))
                    .unwrap_or_else(|| "unknown".to_string());
                text.push_str(&format!(
                    "\nMonitor: {}, Width: {}, Height: {}, DPI: {}",
                    display.name, display.width, display.height, dpi
                ));
            }
            text
        }
        MetricValue::Brightness(levels) => {
            let mut text = format!("{}:", domain.title());
            if levels.is_empty() {
                text.push_str(" none detected");
            }
            for level in levels {
                text.push_str(&format!(
                    "\nMonitor {} brightness level: {}%",
                    level.display_index, level.level_percent
                ));
            }
            text
        }
    }
}

/// Readings of one manual pass, in domain order.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub readings: Vec<MetricReading>,
}

impl Report {
    pub fn new(readings: Vec<MetricReading>) -> Self {
        Self {
            generated_at: Local::now(),
            readings,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections: Vec<String> = self.readings.iter().map(describe).collect();
        write!(f, "{}", sections.join("\n"))
    }
}
