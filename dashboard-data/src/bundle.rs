//! JSON bundle holding one patient with their appointments and vitals.

use chrono::{DateTime, NaiveDate, Utc};
use dashboard_core::{
    AdministrativeInfo, Appointment, AppointmentLocation, AppointmentStatus, AppointmentType,
    BloodType, DashboardError, MedicalInfo, Patient, VitalKind, VitalReading, VitalStatus,
};
use serde::Deserialize;
use serde_json::Value;

use crate::DashboardSource;

const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Records loaded from a JSON bundle.
#[derive(Debug, Clone)]
pub struct BundleSource {
    patient: Patient,
    appointments: Vec<Appointment>,
    vitals: Vec<VitalReading>,
}

impl BundleSource {
    /// Load a bundle from a JSON string.
    pub fn from_json_str(bundle_json: &str) -> Result<Self, DashboardError> {
        let value: Value = serde_json::from_str(bundle_json)
            .map_err(|err| DashboardError::Parse(err.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Load a bundle from an already parsed `serde_json::Value`.
    pub fn from_json_value(bundle: &Value) -> Result<Self, DashboardError> {
        if bundle.get("patient").map_or(true, Value::is_null) {
            return Err(DashboardError::MissingData("bundle has no patient".to_string()));
        }

        let raw = RawBundle::deserialize(bundle).map_err(|err| DashboardError::Parse(err.to_string()))?;

        let patient = raw.patient.into_patient()?;
        let appointments = raw
            .appointments
            .into_iter()
            .map(RawAppointment::into_appointment)
            .collect::<Result<Vec<_>, _>>()?;
        let vitals = raw
            .vitals
            .into_iter()
            .map(RawVital::into_reading)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            patient_id = %patient.id,
            appointments = appointments.len(),
            vitals = vitals.len(),
            "loaded dashboard bundle"
        );

        Ok(Self {
            patient,
            appointments,
            vitals,
        })
    }

    fn ensure_patient(&self, patient_id: &str) -> Result<(), DashboardError> {
        if self.patient.id == patient_id {
            Ok(())
        } else {
            Err(DashboardError::NotFound(format!("patient {patient_id}")))
        }
    }
}

impl DashboardSource for BundleSource {
    fn patient(&self, patient_id: &str) -> Result<Patient, DashboardError> {
        self.ensure_patient(patient_id)?;
        Ok(self.patient.clone())
    }

    fn appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, DashboardError> {
        self.ensure_patient(patient_id)?;
        Ok(self.appointments.clone())
    }

    fn appointment(&self, appointment_id: &str) -> Result<Appointment, DashboardError> {
        self.appointments
            .iter()
            .find(|appointment| appointment.id == appointment_id)
            .cloned()
            .ok_or_else(|| DashboardError::NotFound(format!("appointment {appointment_id}")))
    }

    fn vitals(&self, patient_id: &str) -> Result<Vec<VitalReading>, DashboardError> {
        self.ensure_patient(patient_id)?;
        Ok(self.vitals.clone())
    }
}

#[derive(Deserialize)]
struct RawBundle {
    patient: RawPatient,
    #[serde(default)]
    appointments: Vec<RawAppointment>,
    #[serde(default)]
    vitals: Vec<RawVital>,
}

#[derive(Deserialize)]
struct RawPatient {
    id: String,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    blood_type: String,
    height_cm: f64,
    weight_kg: f64,
    #[serde(default)]
    is_online: bool,
    #[serde(default)]
    medical: MedicalInfo,
    administrative: AdministrativeInfo,
}

impl RawPatient {
    fn into_patient(self) -> Result<Patient, DashboardError> {
        let blood_type = self.blood_type.parse::<BloodType>().map_err(|err| {
            tracing::warn!(patient_id = %self.id, error = %err, "rejected patient record");
            err
        })?;

        Ok(Patient {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            blood_type,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            is_online: self.is_online,
            medical: self.medical,
            administrative: self.administrative,
        })
    }
}

#[derive(Deserialize)]
struct RawAppointment {
    id: String,
    doctor_name: String,
    specialty: String,
    scheduled_at: DateTime<Utc>,
    #[serde(default)]
    duration_minutes: Option<u32>,
    #[serde(rename = "type")]
    kind: String,
    location: AppointmentLocation,
    #[serde(default)]
    status: Option<String>,
}

impl RawAppointment {
    fn into_appointment(self) -> Result<Appointment, DashboardError> {
        let parsed = self.kind.parse::<AppointmentType>().and_then(|kind| {
            let status = match &self.status {
                Some(raw) => raw.parse::<AppointmentStatus>()?,
                None => AppointmentStatus::Scheduled,
            };
            Ok((kind, status))
        });
        let parsed = parsed.and_then(|(kind, status)| {
            let minutes = self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES);
            let duration_secs = minutes.checked_mul(60).ok_or_else(|| {
                DashboardError::InvalidArgument(format!(
                    "duration out of range: {minutes} minutes"
                ))
            })?;
            Ok((kind, status, duration_secs))
        });
        let (kind, status, duration_secs) = parsed.map_err(|err| {
            tracing::warn!(appointment_id = %self.id, error = %err, "rejected appointment record");
            err
        })?;

        Ok(Appointment {
            id: self.id,
            doctor_name: self.doctor_name,
            specialty: self.specialty,
            scheduled_at: self.scheduled_at,
            duration_secs,
            kind,
            location: self.location,
            status,
        })
    }
}

#[derive(Deserialize)]
struct RawVital {
    id: String,
    #[serde(rename = "type", alias = "kind")]
    kind: String,
    value: f64,
    recorded_at: DateTime<Utc>,
    #[serde(default)]
    status: Option<String>,
}

impl RawVital {
    fn into_reading(self) -> Result<VitalReading, DashboardError> {
        let parsed = self.kind.parse::<VitalKind>().and_then(|kind| {
            let status = self
                .status
                .as_deref()
                .map(str::parse::<VitalStatus>)
                .transpose()?;
            Ok((kind, status))
        });
        let (kind, status) = parsed.map_err(|err| {
            tracing::warn!(vital_id = %self.id, error = %err, "rejected vital record");
            err
        })?;

        let reading = VitalReading::new(self.id, kind, self.value, self.recorded_at);
        Ok(match status {
            Some(status) => reading.with_status(status),
            None => reading,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_bundle() -> Value {
        json!({
            "patient": {
                "id": "p-1",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "date_of_birth": "1990-12-10",
                "blood_type": "O-",
                "height_cm": 165,
                "weight_kg": 58.5,
                "administrative": {
                    "insurance": { "provider": "Acme", "policy_number": "X1" },
                    "emergency_contact": { "name": "B", "relationship": "Sibling", "phone_number": "1" }
                }
            }
        })
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let source = BundleSource::from_json_value(&minimal_bundle()).unwrap();
        assert!(source.appointments("p-1").unwrap().is_empty());
        assert!(source.vitals("p-1").unwrap().is_empty());
        let patient = source.patient("p-1").unwrap();
        assert_eq!(patient.blood_type, BloodType::ONegative);
        assert!(patient.medical.allergies.is_empty());
        assert!(!patient.is_online);
    }

    #[test]
    fn bundle_without_patient_is_missing_data() {
        let err = BundleSource::from_json_value(&json!({ "vitals": [] })).unwrap_err();
        assert!(matches!(err, DashboardError::MissingData(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = BundleSource::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn other_patients_are_not_served() {
        let source = BundleSource::from_json_value(&minimal_bundle()).unwrap();
        assert_eq!(
            source.vitals("p-2"),
            Err(DashboardError::NotFound("patient p-2".to_string()))
        );
    }

    #[test]
    fn unknown_enumerants_are_rejected() {
        let mut bundle = minimal_bundle();
        bundle["vitals"] = json!([
            { "id": "v-1", "type": "Glucose", "value": 90, "recorded_at": "2024-06-10T08:00:00Z" }
        ]);
        assert!(matches!(
            BundleSource::from_json_value(&bundle),
            Err(DashboardError::InvalidArgument(_))
        ));

        let mut bundle = minimal_bundle();
        bundle["appointments"] = json!([{
            "id": "apt-1",
            "doctor_name": "Dr. Who",
            "specialty": "Time",
            "scheduled_at": "2024-06-10T08:00:00Z",
            "type": "Hologram",
            "location": { "name": "TARDIS" }
        }]);
        assert!(matches!(
            BundleSource::from_json_value(&bundle),
            Err(DashboardError::InvalidArgument(_))
        ));

        let mut bundle = minimal_bundle();
        bundle["patient"]["blood_type"] = json!("Z+");
        assert!(matches!(
            BundleSource::from_json_value(&bundle),
            Err(DashboardError::InvalidArgument(_))
        ));
    }

    #[test]
    fn oversized_duration_is_rejected() {
        let appointment = |minutes: u32| {
            json!([{
                "id": "apt-1",
                "doctor_name": "Dr. Long",
                "specialty": "Sleep Medicine",
                "scheduled_at": "2024-06-10T08:00:00Z",
                "duration_minutes": minutes,
                "type": "in_person",
                "location": { "name": "Clinic" }
            }])
        };

        let mut bundle = minimal_bundle();
        bundle["appointments"] = appointment(100_000_000);
        assert!(matches!(
            BundleSource::from_json_value(&bundle),
            Err(DashboardError::InvalidArgument(_))
        ));

        bundle["appointments"] = appointment(45);
        let appointments = BundleSource::from_json_value(&bundle)
            .unwrap()
            .appointments("p-1")
            .unwrap();
        assert_eq!(appointments[0].duration_secs, 45 * 60);
    }

    #[test]
    fn vital_status_is_classified_unless_supplied() {
        let mut bundle = minimal_bundle();
        bundle["vitals"] = json!([
            { "id": "v-1", "type": "heart_rate", "value": 130, "recorded_at": "2024-06-10T08:00:00Z" },
            { "id": "v-2", "kind": "Heart Rate", "value": 130, "recorded_at": "2024-06-10T09:00:00+02:00", "status": "Normal" }
        ]);
        let vitals = BundleSource::from_json_value(&bundle)
            .unwrap()
            .vitals("p-1")
            .unwrap();

        assert_eq!(vitals[0].status, VitalStatus::Critical);
        assert_eq!(vitals[1].status, VitalStatus::Normal);
        assert_eq!(vitals[1].classified_status(), VitalStatus::Critical);
        assert_eq!(vitals[1].recorded_at.to_rfc3339(), "2024-06-10T07:00:00+00:00");
    }
}
