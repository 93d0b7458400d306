//! Validated primitive types shared by the clinic crates.
//!
//! Front ends check free-text and numeric input with these types before anything reaches a
//! repository, so the core only ever sees values that already passed the required-field rules.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when parsing an [`Age`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AgeError {
    #[error("age cannot be empty")]
    Empty,
    #[error("age must be a non-negative whole number, got '{0}'")]
    NotANumber(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, matching the
/// way stored fields are trimmed when a store is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A patient age in whole years.
///
/// Unsigned by construction, so negative ages cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u32);

impl Age {
    pub fn years(self) -> u32 {
        self.0
    }
}

impl FromStr for Age {
    type Err = AgeError;

    /// Parses a trimmed decimal string. Signs, fractions and blanks are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AgeError::Empty);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AgeError::NotANumber(trimmed.to_owned()));
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| AgeError::NotANumber(trimmed.to_owned()))
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Alice  ").expect("should accept padded text");
        assert_eq!(text.as_str(), "Alice");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        let err = NonEmptyText::new(" \t ").expect_err("whitespace should be rejected");
        assert_eq!(err, TextError::Empty);
    }

    #[test]
    fn test_age_parses_plain_digits() {
        let age: Age = " 30 ".parse().expect("should parse age");
        assert_eq!(age.years(), 30);
        assert_eq!(age.to_string(), "30");
    }

    #[test]
    fn test_age_rejects_negative_and_signed_values() {
        assert!(matches!("-5".parse::<Age>(), Err(AgeError::NotANumber(_))));
        assert!(matches!("+5".parse::<Age>(), Err(AgeError::NotANumber(_))));
    }

    #[test]
    fn test_age_rejects_text_and_blank() {
        assert!(matches!("thirty".parse::<Age>(), Err(AgeError::NotANumber(_))));
        assert_eq!("".parse::<Age>(), Err(AgeError::Empty));
    }

    #[test]
    fn test_age_rejects_overflow() {
        assert!(matches!(
            "99999999999".parse::<Age>(),
            Err(AgeError::NotANumber(_))
        ));
    }
}
