use crate::constants::SUMMARY_TIMESTAMP_FORMAT;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// The caller-supplied part of a referral. The log adds the identifier and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralRequest {
    pub patient_id: String,
    pub patient_name: String,
    pub from_clinician_id: String,
    pub to_clinician_id: String,
    pub reason: String,
}

/// An appended referral. Never modified or removed once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferralRecord {
    pub referral_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub from_clinician_id: String,
    pub to_clinician_id: String,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

impl ReferralRecord {
    pub(crate) fn from_request(
        referral_id: String,
        request: ReferralRequest,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            referral_id,
            patient_id: request.patient_id,
            patient_name: request.patient_name,
            from_clinician_id: request.from_clinician_id,
            to_clinician_id: request.to_clinician_id,
            reason: request.reason,
            created_at,
        }
    }
}

impl fmt::Display for ReferralRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Patient: {} | {} → {} | {}",
            self.referral_id,
            self.patient_name,
            self.from_clinician_id,
            self.to_clinician_id,
            self.created_at.format(SUMMARY_TIMESTAMP_FORMAT)
        )
    }
}
