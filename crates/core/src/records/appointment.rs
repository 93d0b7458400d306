use crate::codec::{DelimitedRecord, FieldError};
use crate::constants::APPOINTMENTS_HEADER;
use clinic_ids::IdScheme;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Appointment lifecycle status as written in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [Self::Scheduled, Self::Completed, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = FieldError;

    /// Exact, case-sensitive match on the stored spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| FieldError::new("Status", s))
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_id: String,
    pub clinician_id: String,
    pub date: String,
    pub time: String,
    pub status: AppointmentStatus,
}

impl DelimitedRecord for Appointment {
    const KIND: &'static str = "appointment";
    const HEADER: &'static str = APPOINTMENTS_HEADER;
    const MIN_FIELDS: usize = 6;
    const ID_SCHEME: IdScheme = IdScheme::APPOINTMENT;

    fn id(&self) -> &str {
        &self.appointment_id
    }

    fn set_id(&mut self, id: String) {
        self.appointment_id = id;
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        Ok(Self {
            appointment_id: fields[0].to_owned(),
            patient_id: fields[1].to_owned(),
            clinician_id: fields[2].to_owned(),
            date: fields[3].to_owned(),
            time: fields[4].to_owned(),
            status: fields[5].parse()?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.appointment_id.clone(),
            self.patient_id.clone(),
            self.clinician_id.clone(),
            self.date.clone(),
            self.time.clone(),
            self.status.to_string(),
        ]
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Appointment{{ID='{}', PatientID='{}', ClinicianID='{}', Date='{}', Time='{}', Status='{}'}}",
            self.appointment_id, self.patient_id, self.clinician_id, self.date, self.time, self.status
        )
    }
}
