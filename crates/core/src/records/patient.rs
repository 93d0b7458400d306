use crate::codec::{DelimitedRecord, FieldError};
use crate::constants::PATIENTS_HEADER;
use clinic_ids::IdScheme;
use clinic_types::Age;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub contact_number: String,
    pub address: String,
    pub medical_history: String,
}

impl DelimitedRecord for Patient {
    const KIND: &'static str = "patient";
    const HEADER: &'static str = PATIENTS_HEADER;
    const MIN_FIELDS: usize = 7;
    const ID_SCHEME: IdScheme = IdScheme::PATIENT;

    fn id(&self) -> &str {
        &self.patient_id
    }

    fn set_id(&mut self, id: String) {
        self.patient_id = id;
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        let age = fields[2]
            .parse::<Age>()
            .map_err(|_| FieldError::new("Age", fields[2]))?;

        Ok(Self {
            patient_id: fields[0].to_owned(),
            name: fields[1].to_owned(),
            age: age.years(),
            gender: fields[3].to_owned(),
            contact_number: fields[4].to_owned(),
            address: fields[5].to_owned(),
            medical_history: fields[6].to_owned(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.patient_id.clone(),
            self.name.clone(),
            self.age.to_string(),
            self.gender.clone(),
            self.contact_number.clone(),
            self.address.clone(),
            self.medical_history.clone(),
        ]
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Patient{{ID='{}', Name='{}', Age={}, Gender='{}', Contact='{}'}}",
            self.patient_id, self.name, self.age, self.gender, self.contact_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_rejects_negative_age() {
        let fields = ["P001", "Alice", "-1", "Female", "555", "1 Elm St", "none"];
        let err = Patient::from_fields(&fields).expect_err("negative age should fail");
        assert_eq!(err, FieldError::new("Age", "-1"));
    }

    #[test]
    fn test_display_summarises_patient() {
        let fields = ["P001", "Alice", "30", "Female", "555-0100", "1 Elm St", "none"];
        let patient = Patient::from_fields(&fields).expect("should build patient");
        assert_eq!(
            patient.to_string(),
            "Patient{ID='P001', Name='Alice', Age=30, Gender='Female', Contact='555-0100'}"
        );
    }
}
