//! Delimited-record codec.
//!
//! Each store file is line oriented:
//!
//! ```text
//! PatientID,Name,Age,Gender,ContactNumber,Address,MedicalHistory   <- header, written but never parsed
//! P001,Alice,30,Female,555-0100,1 Elm St,none
//! P002,Bob,41,Male,555-0101,2 Oak Ave,asthma
//! ```
//!
//! Fields are split on [`DELIMITER`] and trimmed. There is no quoting or escaping, so a
//! delimiter inside a free-text field shifts every later column of that row on the next load,
//! and a line break inside a field cuts the record short at the break. The remainder becomes a
//! line of its own, which is normally too short and is skipped. Front ends must reject both.
//!
//! Fields are written exactly as held and only trimmed on decode, so a value with leading or
//! trailing whitespace comes back without it.
//!
//! Decoding distinguishes two kinds of bad rows:
//! - a row with fewer fields than the record needs is skipped and counted
//! - a row whose typed field (age, status) does not parse fails the whole store with [`RowError`]

use crate::constants::DELIMITER;
use clinic_ids::IdScheme;

/// A record kind that can be stored as one delimited line.
pub trait DelimitedRecord: Clone {
    /// Lower-case kind name used in log lines.
    const KIND: &'static str;
    /// Column header written as the first line of the store.
    const HEADER: &'static str;
    /// Rows with fewer fields than this are skipped on load.
    const MIN_FIELDS: usize;
    /// Identifier scheme for the record's key field.
    const ID_SCHEME: IdScheme;

    fn id(&self) -> &str;

    /// Replaces the record's key field.
    fn set_id(&mut self, id: String);

    /// Builds a record from at least [`Self::MIN_FIELDS`] trimmed fields.
    fn from_fields(fields: &[&str]) -> Result<Self, FieldError>;

    /// Returns the fields in column order.
    fn to_fields(&self) -> Vec<String>;
}

/// A typed field that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub value: String,
}

impl FieldError {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}

/// A typed field failure located in a store, with a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub field: &'static str,
    pub value: String,
}

/// Records decoded from one store plus the count of dropped short rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Decodes one line. `Ok(None)` means the row is too short and should be skipped.
pub fn decode_line<T: DelimitedRecord>(line: &str) -> Result<Option<T>, FieldError> {
    let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if fields.len() < T::MIN_FIELDS {
        return Ok(None);
    }
    T::from_fields(&fields).map(Some)
}

pub fn encode_line<T: DelimitedRecord>(record: &T) -> String {
    record.to_fields().join(&DELIMITER.to_string())
}

/// Decodes a whole store. The first line is always treated as the header.
///
/// Blank lines are ignored without being counted as skipped.
pub fn decode_store<T: DelimitedRecord>(content: &str) -> Result<Decoded<T>, RowError> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, line) in content.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        match decode_line::<T>(line) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {
                skipped += 1;
                tracing::debug!(
                    kind = T::KIND,
                    line = index + 1,
                    "skipping row with fewer than {} fields",
                    T::MIN_FIELDS
                );
            }
            Err(e) => {
                return Err(RowError {
                    line: index + 1,
                    field: e.field,
                    value: e.value,
                })
            }
        }
    }

    Ok(Decoded { records, skipped })
}

/// Encodes a header line followed by one line per record, each newline terminated.
pub fn encode_store<T: DelimitedRecord>(records: &[T]) -> String {
    let mut out = String::with_capacity(T::HEADER.len() + 1 + records.len() * 48);
    out.push_str(T::HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&encode_line(record));
        out.push('\n');
    }
    out
}
