use crate::codec::{DelimitedRecord, FieldError};
use crate::constants::CLINICIANS_HEADER;
use clinic_ids::IdScheme;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clinician {
    pub clinician_id: String,
    pub name: String,
    pub specialization: String,
    pub contact_number: String,
    pub email: String,
}

impl DelimitedRecord for Clinician {
    const KIND: &'static str = "clinician";
    const HEADER: &'static str = CLINICIANS_HEADER;
    const MIN_FIELDS: usize = 5;
    const ID_SCHEME: IdScheme = IdScheme::CLINICIAN;

    fn id(&self) -> &str {
        &self.clinician_id
    }

    fn set_id(&mut self, id: String) {
        self.clinician_id = id;
    }

    fn from_fields(fields: &[&str]) -> Result<Self, FieldError> {
        Ok(Self {
            clinician_id: fields[0].to_owned(),
            name: fields[1].to_owned(),
            specialization: fields[2].to_owned(),
            contact_number: fields[3].to_owned(),
            email: fields[4].to_owned(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.clinician_id.clone(),
            self.name.clone(),
            self.specialization.clone(),
            self.contact_number.clone(),
            self.email.clone(),
        ]
    }
}

impl fmt::Display for Clinician {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Clinician{{ID='{}', Name='{}', Specialization='{}', Contact='{}'}}",
            self.clinician_id, self.name, self.specialization, self.contact_number
        )
    }
}
