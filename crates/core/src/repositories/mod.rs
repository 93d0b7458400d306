//! Repository modules.
//!
//! [`entity`] holds the generic file-backed repository used for patients, clinicians,
//! appointments and prescriptions. [`referrals`] holds the append-only referral log, which has a
//! different lifecycle (no update, no delete, no load path).

pub mod entity;
pub(crate) mod helpers;
pub mod referrals;
