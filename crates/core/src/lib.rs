//! # Clinic Core
//!
//! Persistence and identity layer for the clinic record system.
//!
//! This crate owns everything below the front end:
//! - the delimited-record codec and the four entity kinds stored with it
//! - one [`Repository`] per kind, each backed by a single file under the data directory
//! - identifier allocation (max + 1 for entities, count + 1 for referrals)
//! - the in-memory referral log and its plain-text notifications
//!
//! [`ClinicStore`] composes all of these and is the only type a front end needs to hold.
//!
//! **No presentation concerns**: prompts, tables and argument parsing belong in the binary.

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod notification;
pub mod records;
pub mod repositories;
pub mod store;

pub use codec::DelimitedRecord;
pub use config::ClinicConfig;
pub use error::{ClinicError, ClinicResult};
pub use records::{
    Appointment, AppointmentStatus, Clinician, Patient, Prescription, ReferralRecord,
    ReferralRequest,
};
pub use repositories::entity::{LoadReport, Mutation, Repository};
pub use repositories::referrals::ReferralLog;
pub use store::{ClinicStore, OpenReport, ReferralCreated, StoreLoad};

pub use clinic_ids::{IdError, IdScheme};
pub use clinic_types::{Age, AgeError, NonEmptyText, TextError};
