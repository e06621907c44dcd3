//! Appointments list and detail projections.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use dashboard_core::{Appointment, Coordinates};
use serde::{Deserialize, Serialize};

use crate::appointments::{bucket_upcoming_by_week, is_today, past};
use crate::format_clock;

/// Which half of the appointments screen is shown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    #[default]
    Upcoming,
    Past,
}

/// A row in the appointments list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentItem {
    pub id: String,
    pub doctor_name: String,
    pub specialty: String,
    /// "2:30 PM" for today, "Thu, 2:30 PM" otherwise.
    pub time: String,
    pub location: String,
    pub is_video: bool,
    pub is_online: bool,
    /// Today's appointments are highlighted.
    pub is_primary: bool,
}

impl AppointmentItem {
    pub fn from_appointment<Tz: TimeZone>(appointment: &Appointment, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        let today = is_today(appointment, now);
        let local = appointment.scheduled_at.with_timezone(&now.timezone());
        let time = if today {
            format_clock(&local)
        } else {
            format!("{}, {}", local.format("%a"), format_clock(&local))
        };
        let is_video = appointment.kind.is_video();

        Self {
            id: appointment.id.clone(),
            doctor_name: appointment.doctor_name.clone(),
            specialty: appointment.specialty.clone(),
            time,
            location: appointment.location.display_text(),
            is_video,
            is_online: is_video,
            is_primary: today,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingSection {
    pub title: String,
    pub items: Vec<AppointmentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AppointmentListing {
    Loaded {
        segment: Segment,
        sections: Vec<ListingSection>,
    },
    Empty {
        segment: Segment,
        message: String,
    },
}

impl AppointmentListing {
    pub fn sections(&self) -> &[ListingSection] {
        match self {
            AppointmentListing::Loaded { sections, .. } => sections,
            AppointmentListing::Empty { .. } => &[],
        }
    }

    /// Appointment id at `section`/`row`, or `None` when out of range.
    pub fn select(&self, section: usize, row: usize) -> Option<&str> {
        self.sections()
            .get(section)?
            .items
            .get(row)
            .map(|item| item.id.as_str())
    }
}

/// Build the list for one segment.
///
/// The upcoming segment has a "Today" section and a "Next Week" section. The
/// latter holds every upcoming appointment that is not today, including ones
/// months away; the title is kept as the screen shows it.
pub fn appointment_listing<Tz: TimeZone>(
    appointments: &[Appointment],
    segment: Segment,
    now: &DateTime<Tz>,
) -> AppointmentListing
where
    Tz::Offset: Display,
{
    let to_items = |selected: Vec<Appointment>| -> Vec<AppointmentItem> {
        selected
            .iter()
            .map(|appointment| AppointmentItem::from_appointment(appointment, now))
            .collect()
    };

    let (sections, empty_message) = match segment {
        Segment::Upcoming => {
            let buckets = bucket_upcoming_by_week(appointments, now);
            let sections = vec![
                ListingSection {
                    title: "Today".to_string(),
                    items: to_items(buckets.today),
                },
                ListingSection {
                    title: "Next Week".to_string(),
                    items: to_items(buckets.later_this_week_or_beyond),
                },
            ];
            (sections, "No upcoming appointments")
        }
        Segment::Past => {
            let sections = vec![ListingSection {
                title: "Past".to_string(),
                items: to_items(past(appointments, now)),
            }];
            (sections, "No past appointments")
        }
    };

    if sections.iter().all(|section| section.items.is_empty()) {
        AppointmentListing::Empty {
            segment,
            message: empty_message.to_string(),
        }
    } else {
        AppointmentListing::Loaded { segment, sections }
    }
}

/// Follow-up a detail screen can trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DetailAction {
    OpenMaps { latitude: f64, longitude: f64 },
    JoinVideoCall { appointment_id: String },
    Reschedule { appointment_id: String },
    Cancel { appointment_id: String },
}

/// Appointment detail screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDetail {
    pub id: String,
    pub doctor_name: String,
    pub specialty: String,
    /// e.g. "Monday, June 10, 2024".
    pub date: String,
    pub time: String,
    pub location_name: String,
    /// Empty when the location has no address.
    pub location_address: String,
    pub is_video: bool,
    pub coordinates: Option<Coordinates>,
    pub status: String,
}

impl AppointmentDetail {
    pub fn from_appointment<Tz: TimeZone>(appointment: &Appointment, timezone: &Tz) -> Self
    where
        Tz::Offset: Display,
    {
        let local = appointment.scheduled_at.with_timezone(timezone);
        Self {
            id: appointment.id.clone(),
            doctor_name: appointment.doctor_name.clone(),
            specialty: appointment.specialty.clone(),
            date: local.format("%A, %B %-d, %Y").to_string(),
            time: format_clock(&local),
            location_name: appointment.location.name.clone(),
            location_address: appointment.location.address.clone().unwrap_or_default(),
            is_video: appointment.kind.is_video(),
            coordinates: appointment.location.coordinates,
            status: appointment.status.label().to_string(),
        }
    }

    /// Only mappable locations offer directions.
    pub fn directions(&self) -> Option<DetailAction> {
        self.coordinates.map(|coordinates| DetailAction::OpenMaps {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        })
    }

    /// Only video consultations can be joined.
    pub fn join_call(&self) -> Option<DetailAction> {
        self.is_video.then(|| DetailAction::JoinVideoCall {
            appointment_id: self.id.clone(),
        })
    }

    pub fn reschedule(&self) -> DetailAction {
        DetailAction::Reschedule {
            appointment_id: self.id.clone(),
        }
    }

    pub fn cancel(&self) -> DetailAction {
        DetailAction::Cancel {
            appointment_id: self.id.clone(),
        }
    }

    /// Every action available for this appointment, in screen order.
    pub fn actions(&self) -> Vec<DetailAction> {
        let mut actions = Vec::new();
        actions.extend(self.directions());
        actions.extend(self.join_call());
        actions.push(self.reschedule());
        actions.push(self.cancel());
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::tests::appointment;
    use chrono::{Duration, Utc};
    use dashboard_core::{AppointmentLocation, AppointmentStatus, AppointmentType};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn video_call(id: &str, scheduled_at: DateTime<Utc>) -> Appointment {
        Appointment {
            kind: AppointmentType::Video,
            location: AppointmentLocation {
                name: "Video Consultation".to_string(),
                address: None,
                coordinates: None,
            },
            ..appointment(id, scheduled_at)
        }
    }

    fn hospital_visit(id: &str, scheduled_at: DateTime<Utc>) -> Appointment {
        Appointment {
            doctor_name: "Dr. Mark Lee".to_string(),
            specialty: "Dermatology".to_string(),
            location: AppointmentLocation {
                name: "City General Hospital".to_string(),
                address: Some("Room 304".to_string()),
                coordinates: Some(Coordinates {
                    latitude: 37.7749,
                    longitude: -122.4194,
                }),
            },
            status: AppointmentStatus::Confirmed,
            ..appointment(id, scheduled_at)
        }
    }

    #[test]
    fn upcoming_segment_has_today_and_next_week_sections() {
        let appointments = vec![
            hospital_visit("afternoon", now() + Duration::minutes(150)),
            video_call("morning", now() - Duration::hours(2)),
            appointment("far", now() + Duration::days(60)),
            appointment("soon", now() + Duration::days(3)),
        ];
        let listing = appointment_listing(&appointments, Segment::Upcoming, &now());
        let sections = listing.sections();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Today");
        assert_eq!(sections[1].title, "Next Week");
        assert_eq!(sections[0].items.len(), 1);

        let today = &sections[0].items[0];
        assert_eq!(today.time, "2:30 PM");
        assert_eq!(today.location, "City General Hospital, Room 304");
        assert!(today.is_primary);
        assert!(!today.is_video);

        let later: Vec<&str> = sections[1].items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(later, vec!["soon", "far"]);
        assert_eq!(sections[1].items[0].time, "Thu, 12:00 PM");
        assert!(!sections[1].items[0].is_primary);

        assert_eq!(listing.select(1, 1), Some("far"));
        assert_eq!(listing.select(1, 2), None);
        assert_eq!(listing.select(2, 0), None);
    }

    #[test]
    fn past_segment_lists_most_recent_first() {
        let appointments = vec![
            appointment("last-month", now() - Duration::days(30)),
            video_call("this-morning", now() - Duration::hours(2)),
            appointment("tomorrow", now() + Duration::days(1)),
        ];
        let listing = appointment_listing(&appointments, Segment::Past, &now());
        let AppointmentListing::Loaded { segment, sections } = &listing else {
            panic!("expected loaded listing");
        };

        assert_eq!(*segment, Segment::Past);
        assert_eq!(sections.len(), 1);
        let ids: Vec<&str> = sections[0].items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["this-morning", "last-month"]);
        assert!(sections[0].items[0].is_online);
        assert_eq!(sections[0].items[0].time, "10:00 AM");
    }

    #[test]
    fn empty_segments_report_a_message() {
        let only_past = vec![appointment("old", now() - Duration::days(2))];
        assert_eq!(
            appointment_listing(&only_past, Segment::Upcoming, &now()),
            AppointmentListing::Empty {
                segment: Segment::Upcoming,
                message: "No upcoming appointments".to_string(),
            }
        );
        assert_eq!(
            appointment_listing(&[], Segment::Past, &now()),
            AppointmentListing::Empty {
                segment: Segment::Past,
                message: "No past appointments".to_string(),
            }
        );
    }

    #[test]
    fn detail_formats_and_offers_directions() {
        let visit = hospital_visit("apt-002", now() + Duration::minutes(150));
        let detail = AppointmentDetail::from_appointment(&visit, &Utc);

        assert_eq!(detail.date, "Monday, June 10, 2024");
        assert_eq!(detail.time, "2:30 PM");
        assert_eq!(detail.location_address, "Room 304");
        assert_eq!(detail.status, "Confirmed");
        assert_eq!(
            detail.directions(),
            Some(DetailAction::OpenMaps {
                latitude: 37.7749,
                longitude: -122.4194
            })
        );
        assert_eq!(detail.join_call(), None);
        assert_eq!(detail.actions().len(), 3);
    }

    #[test]
    fn video_detail_can_join_but_not_navigate() {
        let call = video_call("apt-001", now() - Duration::hours(2));
        let detail = AppointmentDetail::from_appointment(&call, &Utc);

        assert_eq!(detail.location_address, "");
        assert_eq!(detail.directions(), None);
        assert_eq!(
            detail.join_call(),
            Some(DetailAction::JoinVideoCall {
                appointment_id: "apt-001".to_string()
            })
        );
        assert_eq!(
            detail.actions(),
            vec![
                DetailAction::JoinVideoCall {
                    appointment_id: "apt-001".to_string()
                },
                DetailAction::Reschedule {
                    appointment_id: "apt-001".to_string()
                },
                DetailAction::Cancel {
                    appointment_id: "apt-001".to_string()
                },
            ]
        );
    }
}
