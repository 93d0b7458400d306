//! Clinic record types.
//!
//! Each record is a flat set of scalar fields mirroring one row of its store file. Identifier
//! fields that point at other kinds (`patient_id` on an appointment, for example) are soft
//! references: nothing checks that the target exists.

mod appointment;
mod clinician;
mod patient;
mod prescription;
mod referral;

pub use appointment::{Appointment, AppointmentStatus};
pub use clinician::Clinician;
pub use patient::Patient;
pub use prescription::Prescription;
pub use referral::{ReferralRecord, ReferralRequest};
