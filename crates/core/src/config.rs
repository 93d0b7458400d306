//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into [`ClinicStore`]. Core code
//! never reads environment variables itself; the binary does that and hands the raw values to
//! [`ClinicConfig::from_env_values`].
//!
//! [`ClinicStore`]: crate::ClinicStore

use crate::constants::{
    APPOINTMENTS_FILENAME, CLINICIANS_FILENAME, DEFAULT_DATA_DIR, DEFAULT_OUTPUT_DIR,
    PATIENTS_FILENAME, PRESCRIPTIONS_FILENAME,
};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClinicConfig {
    data_dir: PathBuf,
    output_dir: PathBuf,
}

impl ClinicConfig {
    /// Create a new `ClinicConfig`.
    ///
    /// Neither directory has to exist yet; both are created on first write. A path that exists
    /// but is not a directory is rejected.
    pub fn new(data_dir: PathBuf, output_dir: PathBuf) -> ClinicResult<Self> {
        for (label, dir) in [("data_dir", &data_dir), ("output_dir", &output_dir)] {
            if dir.as_os_str().is_empty() {
                return Err(ClinicError::InvalidInput(format!("{label} cannot be empty")));
            }
            if dir.exists() && !dir.is_dir() {
                return Err(ClinicError::InvalidInput(format!(
                    "{label} is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(Self {
            data_dir,
            output_dir,
        })
    }

    /// Build a config from optional raw values, falling back to the defaults for unset or
    /// blank values.
    pub fn from_env_values(
        data_dir: Option<String>,
        output_dir: Option<String>,
    ) -> ClinicResult<Self> {
        fn or_default(value: Option<String>, default: &str) -> PathBuf {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        }

        Self::new(
            or_default(data_dir, DEFAULT_DATA_DIR),
            or_default(output_dir, DEFAULT_OUTPUT_DIR),
        )
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn patients_file(&self) -> PathBuf {
        self.data_dir.join(PATIENTS_FILENAME)
    }

    pub fn clinicians_file(&self) -> PathBuf {
        self.data_dir.join(CLINICIANS_FILENAME)
    }

    pub fn appointments_file(&self) -> PathBuf {
        self.data_dir.join(APPOINTMENTS_FILENAME)
    }

    pub fn prescriptions_file(&self) -> PathBuf {
        self.data_dir.join(PRESCRIPTIONS_FILENAME)
    }
}
