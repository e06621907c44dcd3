//! Appointment classification against a reference instant, and the
//! upcoming / past selections derived from it.
//!
//! `now` carries the evaluating timezone: calendar-day and week checks are
//! made in `now`'s offset, instant comparisons are timezone independent.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use dashboard_core::Appointment;
use serde::{Deserialize, Serialize};

/// Strictly after `now`.
pub fn is_upcoming<Tz: TimeZone>(appointment: &Appointment, now: &DateTime<Tz>) -> bool {
    appointment.scheduled_at > now.with_timezone(&Utc)
}

/// At or before `now`. Complement of [`is_upcoming`].
pub fn is_past<Tz: TimeZone>(appointment: &Appointment, now: &DateTime<Tz>) -> bool {
    appointment.scheduled_at <= now.with_timezone(&Utc)
}

/// Same calendar day as `now`, in `now`'s timezone.
pub fn is_today<Tz: TimeZone>(appointment: &Appointment, now: &DateTime<Tz>) -> bool {
    let local = appointment.scheduled_at.with_timezone(&now.timezone());
    local.date_naive() == now.date_naive()
}

/// Same ISO week (Monday start) as `now`, in `now`'s timezone.
pub fn is_this_week<Tz: TimeZone>(appointment: &Appointment, now: &DateTime<Tz>) -> bool {
    let local = appointment.scheduled_at.with_timezone(&now.timezone());
    local.date_naive().iso_week() == now.date_naive().iso_week()
}

/// Upcoming appointments, earliest first.
pub fn upcoming<Tz: TimeZone>(
    appointments: &[Appointment],
    now: &DateTime<Tz>,
) -> Vec<Appointment> {
    let mut selected: Vec<Appointment> = appointments
        .iter()
        .filter(|appointment| is_upcoming(appointment, now))
        .cloned()
        .collect();
    selected.sort_by_key(|appointment| appointment.scheduled_at);
    selected
}

/// Past appointments, most recent first.
pub fn past<Tz: TimeZone>(appointments: &[Appointment], now: &DateTime<Tz>) -> Vec<Appointment> {
    let mut selected: Vec<Appointment> = appointments
        .iter()
        .filter(|appointment| is_past(appointment, now))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
    selected
}

/// Upcoming appointments split into today and everything after today.
///
/// The second bucket backs the "Next Week" section of the listing, but it is
/// not limited to next week: it holds every upcoming appointment that is not
/// today, however far out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpcomingBuckets {
    pub today: Vec<Appointment>,
    pub later_this_week_or_beyond: Vec<Appointment>,
}

pub fn bucket_upcoming_by_week<Tz: TimeZone>(
    appointments: &[Appointment],
    now: &DateTime<Tz>,
) -> UpcomingBuckets {
    let (today, later_this_week_or_beyond): (Vec<_>, Vec<_>) = upcoming(appointments, now)
        .into_iter()
        .partition(|appointment| is_today(appointment, now));

    UpcomingBuckets {
        today,
        later_this_week_or_beyond,
    }
}
