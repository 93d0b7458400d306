//! Prefix-and-sequence identifier formatting and allocation.

use crate::{IdError, IdResult};
use std::fmt;

/// A fixed prefix plus a minimum zero-padded width.
///
/// Sequence numbers wider than `width` are written in full (`P999` is followed by `P1000`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdScheme {
    prefix: &'static str,
    width: usize,
}

impl IdScheme {
    pub const PATIENT: IdScheme = IdScheme::new("P", 3);
    pub const CLINICIAN: IdScheme = IdScheme::new("C", 3);
    pub const APPOINTMENT: IdScheme = IdScheme::new("A", 3);
    pub const PRESCRIPTION: IdScheme = IdScheme::new("PR", 3);
    pub const REFERRAL: IdScheme = IdScheme::new("REF", 4);

    pub const fn new(prefix: &'static str, width: usize) -> Self {
        Self { prefix, width }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Formats `sequence` as an identifier of this scheme.
    pub fn format(&self, sequence: u32) -> String {
        format!("{}{:0width$}", self.prefix, sequence, width = self.width)
    }

    /// Extracts the sequence number from an identifier of this scheme.
    ///
    /// # Errors
    ///
    /// - [`IdError::MissingPrefix`] if `id` does not start with the prefix
    /// - [`IdError::InvalidSequence`] if the remainder is empty or not all ASCII digits
    pub fn parse_sequence(&self, id: &str) -> IdResult<u32> {
        let digits = id
            .strip_prefix(self.prefix)
            .ok_or_else(|| IdError::MissingPrefix {
                id: id.to_owned(),
                prefix: self.prefix,
            })?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidSequence { id: id.to_owned() });
        }

        digits
            .parse::<u32>()
            .map_err(|_| IdError::InvalidSequence { id: id.to_owned() })
    }

    /// Returns the identifier following the highest one in `existing`.
    ///
    /// An empty input yields sequence 1. A single malformed identifier fails the whole call;
    /// it is never skipped.
    ///
    /// # Errors
    ///
    /// Returns any error from [`IdScheme::parse_sequence`], or [`IdError::Exhausted`] if the
    /// highest sequence is `u32::MAX`.
    pub fn next_after<'a, I>(&self, existing: I) -> IdResult<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut max = 0u32;
        for id in existing {
            max = max.max(self.parse_sequence(id)?);
        }

        let next = max
            .checked_add(1)
            .ok_or(IdError::Exhausted { prefix: self.prefix })?;
        Ok(self.format(next))
    }

    /// Returns the identifier for a collection that currently holds `count` entries.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Exhausted`] if `count + 1` does not fit in `u32`.
    pub fn sequential(&self, count: usize) -> IdResult<String> {
        u32::try_from(count)
            .ok()
            .and_then(|c| c.checked_add(1))
            .map(|next| self.format(next))
            .ok_or(IdError::Exhausted { prefix: self.prefix })
    }
}

impl fmt::Display for IdScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, "0".repeat(self.width))
    }
}
