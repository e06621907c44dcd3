use chrono::NaiveDate;
use dashboard_core::Patient;
use serde::{Deserialize, Serialize};

/// Flattened patient profile, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSummary {
    pub full_name: String,
    pub age: u32,
    pub is_online: bool,
    pub blood_type: String,
    pub height: String,
    pub weight: String,
    pub allergies: String,
    pub conditions: String,
    pub medications: String,
    pub insurance_provider: String,
    pub insurance_id: String,
    pub emergency_contact_name: String,
    pub emergency_contact_relation: String,
}

impl ProfileSummary {
    pub fn from_patient(patient: &Patient, today: NaiveDate) -> Self {
        let medical = &patient.medical;
        let insurance = &patient.administrative.insurance;
        let contact = &patient.administrative.emergency_contact;

        Self {
            full_name: patient.full_name(),
            age: patient.age_on(today),
            is_online: patient.is_online,
            blood_type: patient.blood_type.label().to_string(),
            height: format!("{} cm", patient.height_cm),
            weight: format!("{} kg", patient.weight_kg),
            allergies: medical.allergies.join(", "),
            conditions: medical.chronic_conditions.join(", "),
            medications: medical
                .medications
                .iter()
                .map(|medication| format!("{} {}", medication.name, medication.dosage))
                .collect::<Vec<_>>()
                .join(", "),
            insurance_provider: insurance.provider.clone(),
            insurance_id: insurance.policy_number.clone(),
            emergency_contact_name: contact.name.clone(),
            emergency_contact_relation: contact.relationship.clone(),
        }
    }
}
