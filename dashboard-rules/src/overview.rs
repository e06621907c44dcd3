//! Vitals dashboard: one card per kind, latest reading only.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use dashboard_core::{StatusTone, VitalKind, VitalReading, VitalStatus};
use serde::{Deserialize, Serialize};

use crate::format_clock;
use crate::vitals::latest_per_kind;

const ALL_NORMAL_MESSAGE: &str = "Your vitals are trending normally this week. \
Tap on any card to see detailed history and charts.";
const NO_VITALS_MESSAGE: &str = "No vitals recorded yet";

/// A vital card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalItem {
    pub id: String,
    pub kind: VitalKind,
    pub label: String,
    pub value: String,
    pub unit: String,
    pub status: VitalStatus,
    pub status_label: String,
    pub tone: StatusTone,
    pub recorded_time: String,
}

impl VitalItem {
    pub fn from_reading<Tz: TimeZone>(reading: &VitalReading, timezone: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        Self {
            id: reading.id.clone(),
            kind: reading.kind,
            label: reading.kind.label().to_string(),
            value: reading.formatted_value(),
            unit: reading.unit().to_string(),
            status: reading.status,
            status_label: reading.status.label().to_string(),
            tone: reading.status.tone(),
            recorded_time: format_clock(&reading.recorded_at.with_timezone(timezone)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalsPanel {
    /// e.g. "Monday, June 10".
    pub date_heading: String,
    pub items: Vec<VitalItem>,
    pub info_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VitalsOverview {
    Loaded(VitalsPanel),
    Empty { message: String },
}

impl VitalsOverview {
    pub fn items(&self) -> &[VitalItem] {
        match self {
            VitalsOverview::Loaded(panel) => &panel.items,
            VitalsOverview::Empty { .. } => &[],
        }
    }

    /// Reading id and kind behind the card at `index`, if any.
    pub fn select(&self, index: usize) -> Option<(&str, VitalKind)> {
        self.items()
            .get(index)
            .map(|item| (item.id.as_str(), item.kind))
    }
}

/// Build the dashboard from every reading on file. Cards follow the
/// canonical kind order.
pub fn vitals_overview<Tz: TimeZone>(readings: &[VitalReading], now: &DateTime<Tz>) -> VitalsOverview
where
    Tz::Offset: Display,
{
    let mut latest = latest_per_kind(readings);
    if latest.is_empty() {
        return VitalsOverview::Empty {
            message: NO_VITALS_MESSAGE.to_string(),
        };
    }
    latest.sort_by_key(|reading| reading.kind);

    let timezone = now.timezone();
    let items = latest
        .iter()
        .map(|reading| VitalItem::from_reading(reading, &timezone))
        .collect();

    VitalsOverview::Loaded(VitalsPanel {
        date_heading: now.format("%A, %B %-d").to_string(),
        items,
        info_message: info_message(&latest),
    })
}

fn info_message(readings: &[VitalReading]) -> String {
    let flagged: Vec<&str> = readings
        .iter()
        .filter(|reading| reading.status != VitalStatus::Normal)
        .map(|reading| reading.kind.label())
        .collect();

    if flagged.is_empty() {
        ALL_NORMAL_MESSAGE.to_string()
    } else {
        format!(
            "Some vitals need attention: {}. Please consult with your doctor.",
            flagged.join(", ")
        )
    }
}
