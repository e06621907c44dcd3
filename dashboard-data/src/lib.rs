//! Data sources for the patient dashboard and the service that applies the
//! dashboard rules on top of them.

mod bundle;
mod mock;

pub use bundle::BundleSource;
pub use mock::MockSource;

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, TimeZone};
use dashboard_core::{
    Appointment, DashboardConfig, DashboardError, Patient, VitalKind, VitalReading,
};
use dashboard_rules::{
    AppointmentDetail, AppointmentListing, ProfileSummary, Segment, VitalsOverview,
};

/// Where patient records come from: built-in fixtures, a JSON bundle, or any
/// other backend.
pub trait DashboardSource {
    fn patient(&self, patient_id: &str) -> Result<Patient, DashboardError>;
    fn appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, DashboardError>;
    fn appointment(&self, appointment_id: &str) -> Result<Appointment, DashboardError>;
    fn vitals(&self, patient_id: &str) -> Result<Vec<VitalReading>, DashboardError>;
}

impl<S: DashboardSource + ?Sized> DashboardSource for &S {
    fn patient(&self, patient_id: &str) -> Result<Patient, DashboardError> {
        (**self).patient(patient_id)
    }

    fn appointments(&self, patient_id: &str) -> Result<Vec<Appointment>, DashboardError> {
        (**self).appointments(patient_id)
    }

    fn appointment(&self, appointment_id: &str) -> Result<Appointment, DashboardError> {
        (**self).appointment(appointment_id)
    }

    fn vitals(&self, patient_id: &str) -> Result<Vec<VitalReading>, DashboardError> {
        (**self).vitals(patient_id)
    }
}

/// The configured patient's dashboard, read through a [`DashboardSource`].
pub struct Dashboard<S> {
    source: S,
    config: DashboardConfig,
}

impl<S: DashboardSource> Dashboard<S> {
    pub fn new(source: S, config: DashboardConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn profile(&self) -> Result<Patient, DashboardError> {
        tracing::debug!(patient_id = %self.config.patient_id, "fetching patient profile");
        self.source.patient(&self.config.patient_id)
    }

    pub fn profile_summary(&self, today: NaiveDate) -> Result<ProfileSummary, DashboardError> {
        let patient = self.profile()?;
        Ok(ProfileSummary::from_patient(&patient, today))
    }

    pub fn appointments(&self) -> Result<Vec<Appointment>, DashboardError> {
        let appointments = self.source.appointments(&self.config.patient_id)?;
        tracing::debug!(count = appointments.len(), "fetched appointments");
        Ok(appointments)
    }

    /// Upcoming appointments, earliest first.
    pub fn upcoming_appointments<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Vec<Appointment>, DashboardError> {
        Ok(dashboard_rules::upcoming(&self.appointments()?, now))
    }

    /// Past appointments, most recent first.
    pub fn past_appointments<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<Vec<Appointment>, DashboardError> {
        Ok(dashboard_rules::past(&self.appointments()?, now))
    }

    pub fn appointment(&self, appointment_id: &str) -> Result<Appointment, DashboardError> {
        self.source.appointment(appointment_id).map_err(|err| {
            tracing::warn!(appointment_id, error = %err, "appointment lookup failed");
            err
        })
    }

    pub fn appointment_detail<Tz: TimeZone>(
        &self,
        appointment_id: &str,
        timezone: &Tz,
    ) -> Result<AppointmentDetail, DashboardError>
    where
        Tz::Offset: Display,
    {
        let appointment = self.appointment(appointment_id)?;
        Ok(AppointmentDetail::from_appointment(&appointment, timezone))
    }

    pub fn appointment_listing<Tz: TimeZone>(
        &self,
        segment: Segment,
        now: &DateTime<Tz>,
    ) -> Result<AppointmentListing, DashboardError>
    where
        Tz::Offset: Display,
    {
        Ok(dashboard_rules::appointment_listing(
            &self.appointments()?,
            segment,
            now,
        ))
    }

    pub fn vitals(&self) -> Result<Vec<VitalReading>, DashboardError> {
        let vitals = self.source.vitals(&self.config.patient_id)?;
        tracing::debug!(count = vitals.len(), "fetched vitals");
        Ok(vitals)
    }

    /// Most recent reading of each kind. Order across kinds is unspecified.
    pub fn latest_vitals(&self) -> Result<Vec<VitalReading>, DashboardError> {
        Ok(dashboard_rules::latest_per_kind(&self.vitals()?))
    }

    /// Readings of one kind, most recent first.
    pub fn vital_history(&self, kind: VitalKind) -> Result<Vec<VitalReading>, DashboardError> {
        Ok(dashboard_rules::history_for_kind(&self.vitals()?, kind))
    }

    pub fn vitals_overview<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<VitalsOverview, DashboardError>
    where
        Tz::Offset: Display,
    {
        Ok(dashboard_rules::vitals_overview(&self.vitals()?, now))
    }
}
