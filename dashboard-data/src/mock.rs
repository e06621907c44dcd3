use chrono::{DateTime, Duration, Months, TimeZone, Utc};
use dashboard_core::{
    AdministrativeInfo, Appointment, AppointmentLocation, AppointmentStatus, AppointmentType,
    BloodType, Coordinates, DashboardError, EmergencyContact, Insurance, MedicalInfo, Medication,
    Patient, VitalKind, VitalReading, VitalStatus,
};

use crate::DashboardSource;

/// Built-in demo records, laid out around the calendar day of a reference
/// instant so the screens always have something for "today".
///
/// Patient ids are not checked: every request gets the same demo patient.
#[derive(Debug, Clone)]
pub struct MockSource {
    patient: Patient,
    appointments: Vec<Appointment>,
    vitals: Vec<VitalReading>,
}

impl MockSource {
    pub fn at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            patient: demo_patient(now),
            appointments: demo_appointments(now),
            vitals: demo_vitals(now),
        }
    }
}

impl DashboardSource for MockSource {
    fn patient(&self, _patient_id: &str) -> Result<Patient, DashboardError> {
        Ok(self.patient.clone())
    }

    fn appointments(&self, _patient_id: &str) -> Result<Vec<Appointment>, DashboardError> {
        Ok(self.appointments.clone())
    }

    fn appointment(&self, appointment_id: &str) -> Result<Appointment, DashboardError> {
        self.appointments
            .iter()
            .find(|appointment| appointment.id == appointment_id)
            .cloned()
            .ok_or_else(|| DashboardError::NotFound(format!("appointment {appointment_id}")))
    }

    fn vitals(&self, _patient_id: &str) -> Result<Vec<VitalReading>, DashboardError> {
        Ok(self.vitals.clone())
    }
}

/// `hour:minute` on `now`'s calendar day, falling back to `now` itself when
/// that local time does not exist.
fn on_same_day<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32, minute: u32) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(hour, minute, 0)
        .and_then(|local| now.timezone().from_local_datetime(&local).earliest())
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

fn demo_patient<Tz: TimeZone>(now: &DateTime<Tz>) -> Patient {
    let today = now.date_naive();
    Patient {
        id: "patient-001".to_string(),
        first_name: "Sarah".to_string(),
        last_name: "Johnson".to_string(),
        date_of_birth: today.checked_sub_months(Months::new(35 * 12)).unwrap_or(today),
        blood_type: BloodType::APositive,
        height_cm: 170.0,
        weight_kg: 65.0,
        is_online: true,
        medical: MedicalInfo {
            allergies: vec!["Peanuts".to_string(), "Penicillin".to_string()],
            chronic_conditions: vec!["Hypertension".to_string()],
            medications: vec![Medication {
                name: "Lisinopril".to_string(),
                dosage: "10mg".to_string(),
            }],
        },
        administrative: AdministrativeInfo {
            insurance: Insurance {
                provider: "BlueCross".to_string(),
                policy_number: "8849302".to_string(),
            },
            emergency_contact: EmergencyContact {
                name: "John Doe".to_string(),
                relationship: "Husband".to_string(),
                phone_number: "+1-555-123-4567".to_string(),
            },
        },
    }
}

fn demo_appointments<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<Appointment> {
    vec![
        Appointment {
            id: "apt-001".to_string(),
            doctor_name: "Dr. Sarah Johnson".to_string(),
            specialty: "Cardiology".to_string(),
            scheduled_at: on_same_day(now, 10, 0),
            duration_secs: 30 * 60,
            kind: AppointmentType::Video,
            location: AppointmentLocation {
                name: "Video Consultation".to_string(),
                address: None,
                coordinates: None,
            },
            status: AppointmentStatus::Scheduled,
        },
        Appointment {
            id: "apt-002".to_string(),
            doctor_name: "Dr. Mark Lee".to_string(),
            specialty: "Dermatology".to_string(),
            scheduled_at: on_same_day(now, 14, 30),
            duration_secs: 45 * 60,
            kind: AppointmentType::InPerson,
            location: AppointmentLocation {
                name: "City General Hospital".to_string(),
                address: Some("Room 304".to_string()),
                coordinates: Some(Coordinates {
                    latitude: 37.7749,
                    longitude: -122.4194,
                }),
            },
            status: AppointmentStatus::Confirmed,
        },
        Appointment {
            id: "apt-003".to_string(),
            doctor_name: "Dr. Emily Chen".to_string(),
            specialty: "Orthopedics".to_string(),
            scheduled_at: now.with_timezone(&Utc) + Duration::days(3),
            duration_secs: 60 * 60,
            kind: AppointmentType::InPerson,
            location: AppointmentLocation {
                name: "Sports Medicine Center".to_string(),
                address: Some("Building A".to_string()),
                coordinates: Some(Coordinates {
                    latitude: 37.7849,
                    longitude: -122.4094,
                }),
            },
            status: AppointmentStatus::Scheduled,
        },
    ]
}

fn demo_vitals<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<VitalReading> {
    let recorded = on_same_day(now, 10, 30);
    let morning = on_same_day(now, 8, 15);

    [
        ("vital-001", VitalKind::HeartRate, 72.0, recorded),
        ("vital-002", VitalKind::BloodPressure, 120.0, recorded),
        ("vital-003", VitalKind::Temperature, 98.6, morning),
        ("vital-004", VitalKind::OxygenLevel, 98.0, recorded),
        ("vital-005", VitalKind::RespiratoryRate, 16.0, recorded),
    ]
    .into_iter()
    .map(|(id, kind, value, at)| {
        VitalReading::new(id, kind, value, at).with_status(VitalStatus::Normal)
    })
    .collect()
}
