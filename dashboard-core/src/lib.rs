//! Domain model for the patient dashboard: profile, appointments and vitals.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Settings shared by the data sources and the outer surfaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Patient whose records are requested from the source.
    pub patient_id: String,
    /// Offset (minutes east of UTC) used for calendar-day and week checks.
    pub utc_offset_minutes: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            patient_id: "patient-001".to_string(),
            utc_offset_minutes: 0,
        }
    }
}

impl DashboardConfig {
    /// Apply partial overrides on top of this configuration.
    pub fn merged(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(patient_id) = overrides.patient_id {
            self.patient_id = patient_id;
        }
        if let Some(minutes) = overrides.utc_offset_minutes {
            self.utc_offset_minutes = minutes;
        }
        self
    }

    /// Timezone in which "today" and "this week" are evaluated.
    pub fn timezone(&self) -> Result<FixedOffset, DashboardError> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                DashboardError::InvalidArgument(format!(
                    "UTC offset out of range: {} minutes",
                    self.utc_offset_minutes
                ))
            })
    }
}

/// Optional fields read from a config file or a JS caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces `DashboardConfig::patient_id` when set.
    #[serde(default)]
    pub patient_id: Option<String>,
    /// Replaces `DashboardConfig::utc_offset_minutes` when set.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// Errors raised while loading or looking up dashboard records.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DashboardError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("missing data: {0}")]
    MissingData(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Lowercased alphanumerics only, so "Heart Rate", "heart_rate" and
/// "heartRate" all compare equal.
fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Inclusive interval of values considered normal for a vital kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NormalRange {
    pub low: f64,
    pub high: f64,
}

impl NormalRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Physiological measurement categories shown on the vitals dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    HeartRate,
    BloodPressure,
    Temperature,
    OxygenLevel,
    RespiratoryRate,
}

impl VitalKind {
    /// Canonical display order.
    pub const ALL: [VitalKind; 5] = [
        VitalKind::HeartRate,
        VitalKind::BloodPressure,
        VitalKind::Temperature,
        VitalKind::OxygenLevel,
        VitalKind::RespiratoryRate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VitalKind::HeartRate => "Heart Rate",
            VitalKind::BloodPressure => "Blood Pressure",
            VitalKind::Temperature => "Temperature",
            VitalKind::OxygenLevel => "Oxygen Level",
            VitalKind::RespiratoryRate => "Respiratory Rate",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            VitalKind::HeartRate => "bpm",
            VitalKind::BloodPressure => "mmHg",
            VitalKind::Temperature => "°F",
            VitalKind::OxygenLevel => "%",
            VitalKind::RespiratoryRate => "br/min",
        }
    }

    pub fn normal_range(self) -> NormalRange {
        match self {
            VitalKind::HeartRate => NormalRange::new(60.0, 100.0),
            VitalKind::BloodPressure => NormalRange::new(90.0, 120.0),
            VitalKind::Temperature => NormalRange::new(97.0, 99.0),
            VitalKind::OxygenLevel => NormalRange::new(95.0, 100.0),
            VitalKind::RespiratoryRate => NormalRange::new(12.0, 20.0),
        }
    }

    /// Render a measurement the way the dashboard cards show it.
    pub fn format_value(self, value: f64) -> String {
        match self {
            VitalKind::HeartRate | VitalKind::RespiratoryRate | VitalKind::OxygenLevel => {
                format!("{}", value.trunc() as i64)
            }
            VitalKind::Temperature => format!("{value:.1}"),
            // Shortest decimal form: 120.0 -> "120", 120.5 -> "120.5".
            VitalKind::BloodPressure => format!("{value}"),
        }
    }
}

impl fmt::Display for VitalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VitalKind {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "heartrate" => Ok(VitalKind::HeartRate),
            "bloodpressure" => Ok(VitalKind::BloodPressure),
            "temperature" => Ok(VitalKind::Temperature),
            "oxygenlevel" => Ok(VitalKind::OxygenLevel),
            "respiratoryrate" => Ok(VitalKind::RespiratoryRate),
            _ => Err(DashboardError::InvalidArgument(format!(
                "unknown vital kind: {s:?}"
            ))),
        }
    }
}

/// Qualitative reading status relative to the kind's normal range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VitalStatus {
    Normal,
    Elevated,
    Low,
    Critical,
}

impl VitalStatus {
    /// Classify `value` against the normal range of `kind`.
    ///
    /// The critical margins are multiplicative offsets from the range
    /// bounds: below `low * 0.8` or above `high * 1.2`. Values exactly on a
    /// margin stay `Low`/`Elevated`.
    pub fn classify(value: f64, kind: VitalKind) -> Self {
        let range = kind.normal_range();
        if range.contains(value) {
            return VitalStatus::Normal;
        }
        if value < range.low {
            return if value < range.low * 0.8 {
                VitalStatus::Critical
            } else {
                VitalStatus::Low
            };
        }
        if value > range.high * 1.2 {
            VitalStatus::Critical
        } else {
            VitalStatus::Elevated
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VitalStatus::Normal => "Normal",
            VitalStatus::Elevated => "Elevated",
            VitalStatus::Low => "Low",
            VitalStatus::Critical => "Critical",
        }
    }

    pub fn tone(self) -> StatusTone {
        match self {
            VitalStatus::Normal => StatusTone::Normal,
            VitalStatus::Elevated | VitalStatus::Low => StatusTone::Warning,
            VitalStatus::Critical => StatusTone::Critical,
        }
    }
}

impl FromStr for VitalStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "normal" => Ok(VitalStatus::Normal),
            "elevated" => Ok(VitalStatus::Elevated),
            "low" => Ok(VitalStatus::Low),
            "critical" => Ok(VitalStatus::Critical),
            _ => Err(DashboardError::InvalidArgument(format!(
                "unknown vital status: {s:?}"
            ))),
        }
    }
}

/// Colour family used to badge a reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Normal,
    Warning,
    Critical,
}

/// A single vital-sign measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VitalReading {
    pub id: String,
    pub kind: VitalKind,
    pub value: f64,
    pub recorded_at: DateTime<Utc>,
    pub status: VitalStatus,
}

impl VitalReading {
    /// Build a reading whose status is classified from `value`.
    pub fn new(
        id: impl Into<String>,
        kind: VitalKind,
        value: f64,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            value,
            recorded_at,
            status: VitalStatus::classify(value, kind),
        }
    }

    /// Override the stored status (fixtures supply one up front).
    pub fn with_status(mut self, status: VitalStatus) -> Self {
        self.status = status;
        self
    }

    pub fn unit(&self) -> &'static str {
        self.kind.unit()
    }

    /// Status recomputed from the value, ignoring the stored one.
    pub fn classified_status(&self) -> VitalStatus {
        VitalStatus::classify(self.value, self.kind)
    }

    pub fn formatted_value(&self) -> String {
        self.kind.format_value(self.value)
    }
}

/// How the consultation takes place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Video,
    InPerson,
    Phone,
}

impl AppointmentType {
    pub fn label(self) -> &'static str {
        match self {
            AppointmentType::Video => "Video Consultation",
            AppointmentType::InPerson => "In-Person",
            AppointmentType::Phone => "Phone Call",
        }
    }

    pub fn is_video(self) -> bool {
        self == AppointmentType::Video
    }
}

impl FromStr for AppointmentType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "video" | "videoconsultation" => Ok(AppointmentType::Video),
            "inperson" => Ok(AppointmentType::InPerson),
            "phone" | "phonecall" => Ok(AppointmentType::Phone),
            _ => Err(DashboardError::InvalidArgument(format!(
                "unknown appointment type: {s:?}"
            ))),
        }
    }
}

/// Lifecycle of an appointment. Descriptive only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::InProgress => "In Progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "inprogress" => Ok(AppointmentStatus::InProgress),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            "noshow" => Ok(AppointmentStatus::NoShow),
            _ => Err(DashboardError::InvalidArgument(format!(
                "unknown appointment status: {s:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where the appointment happens. Only mappable in-person locations carry
/// coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentLocation {
    pub name: String,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl AppointmentLocation {
    pub fn display_text(&self) -> String {
        match &self.address {
            Some(address) => format!("{}, {address}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A scheduled consultation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub doctor_name: String,
    pub specialty: String,
    pub scheduled_at: DateTime<Utc>,
    /// Length in seconds. Informational only.
    pub duration_secs: u32,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub location: AppointmentLocation,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl FromStr for BloodType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|blood_type| blood_type.label() == wanted)
            .ok_or_else(|| DashboardError::InvalidArgument(format!("unknown blood type: {s:?}")))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
}

/// Medical history and current treatment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MedicalInfo {
    pub allergies: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub medications: Vec<Medication>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Insurance {
    pub provider: String,
    pub policy_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdministrativeInfo {
    pub insurance: Insurance,
    pub emergency_contact: EmergencyContact,
}

/// The patient whose dashboard is displayed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub blood_type: BloodType,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub is_online: bool,
    pub medical: MedicalInfo,
    pub administrative: AdministrativeInfo,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole years elapsed between birth and `today`; zero for future births.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.date_of_birth).unwrap_or(0)
    }
}
