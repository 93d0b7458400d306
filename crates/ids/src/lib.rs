//! Record identifier schemes.
//!
//! Every record kind in the clinic store is keyed by a short, human readable identifier made of
//! a fixed alphabetic prefix followed by a zero-padded decimal sequence number:
//!
//! | Kind         | Prefix | Width | Example   |
//! |--------------|--------|-------|-----------|
//! | Patient      | `P`    | 3     | `P001`    |
//! | Clinician    | `C`    | 3     | `C014`    |
//! | Appointment  | `A`    | 3     | `A120`    |
//! | Prescription | `PR`   | 3     | `PR007`   |
//! | Referral     | `REF`  | 4     | `REF0001` |
//!
//! Two allocation strategies exist:
//! - [`IdScheme::next_after`] scans existing identifiers and returns `max + 1`. Nothing is stored
//!   between calls, so allocation recovers from whatever is on disk after a restart. Gaps left by
//!   deletions are never reused.
//! - [`IdScheme::sequential`] formats a caller-supplied count. The referral log uses this with its
//!   current length.
//!
//! Neither strategy is atomic with respect to insertion. Callers must hold exclusive access to
//! the collection between allocating an identifier and inserting the record.

mod scheme;

pub use scheme::IdScheme;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// An existing identifier does not start with the scheme's prefix
    #[error("identifier '{id}' does not start with prefix '{prefix}'")]
    MissingPrefix { id: String, prefix: &'static str },

    /// The part after the prefix is not a decimal number
    #[error("identifier '{id}' has a non-numeric sequence part")]
    InvalidSequence { id: String },

    /// The next sequence number does not fit in `u32`
    #[error("identifier sequence for prefix '{prefix}' is exhausted")]
    Exhausted { prefix: &'static str },
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
