use crate::codec::{DelimitedRecord, FieldError};
use crate::constants::PRESCRIPTIONS_HEADER;
use clinic_ids::IdScheme;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prescription {
    pub prescription_id: String,
    pub patient_id: String,
    pub clinician_id: String,
    pub medication: String,
    pub dosage: String,
    pub date: String,
}

impl DelimitedRecord for Prescription {
    const KIND: &'static str = "prescription";
    const HEADER: &'static str = PRESCRIPTIONS_HEADER;
    const MIN_FIELDS: usize = 6;
    const ID_SCHEME: IdScheme = IdScheme::PRESCRIPTION;

    fn id(&self) -> &str {
        &self.prescription_id
    }

    fn set_id(&mut self, id: String) {
        self.prescription_id = id;
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        Ok(Self {
            prescription_id: fields[0].to_owned(),
            patient_id: fields[1].to_owned(),
            clinician_id: fields[2].to_owned(),
            medication: fields[3].to_owned(),
            dosage: fields[4].to_owned(),
            date: fields[5].to_owned(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.prescription_id.clone(),
            self.patient_id.clone(),
            self.clinician_id.clone(),
            self.medication.clone(),
            self.dosage.clone(),
            self.date.clone(),
        ]
    }
}

impl fmt::Display for Prescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Prescription{{ID='{}', PatientID='{}', ClinicianID='{}', Medication='{}', Dosage='{}', Date='{}'}}",
            self.prescription_id,
            self.patient_id,
            self.clinician_id,
            self.medication,
            self.dosage,
            self.date
        )
    }
}
