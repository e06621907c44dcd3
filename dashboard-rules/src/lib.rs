//! Filtering, selection and classification rules for the patient dashboard,
//! plus the display projections built on top of them.
//!
//! Every rule is a pure function of its input and an explicit reference
//! instant. Nothing here reads the wall clock.

pub mod appointments;
pub mod listing;
pub mod overview;
pub mod profile;
pub mod vitals;

pub use appointments::{
    bucket_upcoming_by_week, is_past, is_this_week, is_today, is_upcoming, past, upcoming,
    UpcomingBuckets,
};
pub use listing::{
    appointment_listing, AppointmentDetail, AppointmentItem, AppointmentListing, DetailAction,
    ListingSection, Segment,
};
pub use overview::{vitals_overview, VitalItem, VitalsOverview, VitalsPanel};
pub use profile::ProfileSummary;
pub use vitals::{classify, history_for_kind, latest_per_kind};

use chrono::{DateTime, TimeZone};

/// Clock time as shown on cards, e.g. "2:30 PM".
pub(crate) fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-I:%M %p").to_string()
}
