//! Append-only referral log.
//!
//! The log is a plain owned value: whoever composes the application constructs one and keeps it
//! for the life of the process. Referrals are held in memory only; the notification files are the
//! only thing written to disk.
//!
//! ## Identifiers
//!
//! Referral identifiers are count based: the next one is `REF` + zero-padded `len + 1`. This is
//! deliberately different from the max-scan used by entity repositories. Because nothing is ever
//! removed from the log, count and max coincide within one process.

use crate::notification::{notification_file_name, render_referral_notification};
use crate::records::{ReferralRecord, ReferralRequest};
use crate::{ClinicError, ClinicResult};
use chrono::{Local, NaiveDateTime, Timelike};
use clinic_ids::IdScheme;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ReferralLog {
    output_dir: PathBuf,
    records: Vec<ReferralRecord>,
}

impl ReferralLog {
    /// Creates an empty log that writes notifications under `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            records: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a referral stamped with the current local time, truncated to the second.
    pub fn append(&mut self, request: ReferralRequest) -> ClinicResult<ReferralRecord> {
        let now = Local::now().naive_local();
        self.append_at(request, now.with_nanosecond(0).unwrap_or(now))
    }

    /// Appends a referral with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Id`] only if the sequence is exhausted.
    pub fn append_at(
        &mut self,
        request: ReferralRequest,
        created_at: NaiveDateTime,
    ) -> ClinicResult<ReferralRecord> {
        let referral_id = IdScheme::REFERRAL.sequential(self.records.len())?;
        let record = ReferralRecord::from_request(referral_id, request, created_at);
        self.records.push(record.clone());

        tracing::info!(
            referral_id = %record.referral_id,
            from = %record.from_clinician_id,
            to = %record.to_clinician_id,
            "referral appended"
        );
        Ok(record)
    }

    /// Returns a copy of every referral in append order.
    pub fn list(&self) -> Vec<ReferralRecord> {
        self.records.clone()
    }

    pub fn get(&self, referral_id: &str) -> Option<&ReferralRecord> {
        self.records.iter().find(|r| r.referral_id == referral_id)
    }

    /// Path the notification for `referral_id` is written to.
    pub fn notification_path(&self, referral_id: &str) -> PathBuf {
        self.output_dir.join(notification_file_name(referral_id))
    }

    /// Renders the notification for `record` without writing it.
    pub fn render_notification(&self, record: &ReferralRecord) -> String {
        render_referral_notification(record)
    }

    /// Writes the notification for `record`, overwriting any earlier file of the same name.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError` if:
    /// - the output directory cannot be created ([`ClinicError::NotificationDirCreation`])
    /// - the file cannot be written ([`ClinicError::NotificationWrite`])
    pub fn emit_notification(&self, record: &ReferralRecord) -> ClinicResult<PathBuf> {
        fs::create_dir_all(&self.output_dir).map_err(ClinicError::NotificationDirCreation)?;

        let path = self.notification_path(&record.referral_id);
        fs::write(&path, render_referral_notification(record)).map_err(|source| {
            tracing::error!(path = %path.display(), "failed to write referral notification");
            ClinicError::NotificationWrite {
                path: path.clone(),
                source,
            }
        })?;

        tracing::debug!(path = %path.display(), "referral notification written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn request(patient: &str) -> ReferralRequest {
        ReferralRequest {
            patient_id: "P001".into(),
            patient_name: patient.into(),
            from_clinician_id: "C001".into(),
            to_clinician_id: "C002".into(),
            reason: "Specialist opinion".into(),
        }
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut log = ReferralLog::new(temp_dir.path());

        let ids: Vec<String> = ["Alice", "Bob", "Cara"]
            .into_iter()
            .map(|name| {
                log.append(request(name))
                    .expect("append should succeed")
                    .referral_id
            })
            .collect();

        assert_eq!(ids, ["REF0001", "REF0002", "REF0003"]);
        assert_eq!(log.len(), 3);
        assert!(log.list().iter().all(|r| r.created_at.nanosecond() == 0));
    }

    #[test]
    fn test_list_preserves_append_order_and_is_a_copy() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut log = ReferralLog::new(temp_dir.path());
        log.append(request("Alice")).expect("append should succeed");
        log.append(request("Bob")).expect("append should succeed");

        let mut snapshot = log.list();
        snapshot.clear();

        let names: Vec<_> = log.list().into_iter().map(|r| r.patient_name).collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[test]
    fn test_append_does_not_touch_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = temp_dir.path().join("output");
        let mut log = ReferralLog::new(&out);

        log.append(request("Alice")).expect("append should succeed");

        assert!(!out.exists());
    }

    #[test]
    fn test_emit_notification_writes_named_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let out = temp_dir.path().join("output");
        let mut log = ReferralLog::new(&out);
        let created_at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .and_then(|d| d.and_hms_opt(14, 5, 9))
            .expect("valid timestamp");
        let record = log
            .append_at(request("Alice"), created_at)
            .expect("append should succeed");

        let path = log
            .emit_notification(&record)
            .expect("emit should succeed");

        assert_eq!(path, out.join("referral_email_REF0001.txt"));
        let content = fs::read_to_string(&path).expect("should read notification");
        assert_eq!(content, log.render_notification(&record));
        assert!(content.contains("Date & Time: 2026-10-18 14:05:09"));
        assert!(content.contains("- Patient Name: Alice"));
    }

    #[test]
    fn test_emit_notification_reports_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("output");
        fs::write(&blocker, b"not a directory").expect("Failed to create blocking file");
        let mut log = ReferralLog::new(&blocker);
        let record = log.append(request("Alice")).expect("append should succeed");

        let err = log
            .emit_notification(&record)
            .expect_err("emit into a file path should fail");

        assert!(matches!(err, ClinicError::NotificationDirCreation(_)));
        assert_eq!(log.len(), 1, "the referral itself is kept");
    }

    #[test]
    fn test_get_finds_by_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut log = ReferralLog::new(temp_dir.path());
        log.append(request("Alice")).expect("append should succeed");
        log.append(request("Bob")).expect("append should succeed");

        assert_eq!(
            log.get("REF0002").map(|r| r.patient_name.as_str()),
            Some("Bob")
        );
        assert!(log.get("REF0009").is_none());
    }
}
