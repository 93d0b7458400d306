//! Plain-text referral notifications.
//!
//! Each appended referral is rendered into a fixed banner-and-fields layout and written to its
//! own file, named from the referral identifier. The files are a write-only side channel; nothing
//! in the core reads them back.

use crate::constants::{NOTIFICATION_FILE_PREFIX, NOTIFICATION_TIMESTAMP_FORMAT};
use crate::records::ReferralRecord;

const BANNER: &str = "===============================================";
const TITLE: &str = "         MEDICAL REFERRAL NOTIFICATION";
const CLOSING: &str =
    "Please review this referral and schedule an appointment at your earliest convenience.";

/// File name for the notification of `referral_id`, e.g. `referral_email_REF0001.txt`.
pub fn notification_file_name(referral_id: &str) -> String {
    format!("{NOTIFICATION_FILE_PREFIX}{referral_id}.txt")
}

/// Renders the notification body for `record`.
///
/// Format:
/// ```text
/// ===============================================
///          MEDICAL REFERRAL NOTIFICATION
/// ===============================================
///
/// Referral ID: REF0001
/// Date & Time: 2026-10-18 09:30:00
///
/// TO: Clinician C002
/// FROM: Clinician C001
///
/// PATIENT INFORMATION:
/// - Patient ID: P001
/// - Patient Name: Alice
///
/// REFERRAL REASON:
/// <reason>
///
/// Please review this referral and ...
///
/// ===============================================
/// ```
pub fn render_referral_notification(record: &ReferralRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("{BANNER}\n{TITLE}\n{BANNER}\n\n"));
    out.push_str(&format!("Referral ID: {}\n", record.referral_id));
    out.push_str(&format!(
        "Date & Time: {}\n\n",
        record.created_at.format(NOTIFICATION_TIMESTAMP_FORMAT)
    ));
    out.push_str(&format!("TO: Clinician {}\n", record.to_clinician_id));
    out.push_str(&format!("FROM: Clinician {}\n\n", record.from_clinician_id));
    out.push_str("PATIENT INFORMATION:\n");
    out.push_str(&format!("- Patient ID: {}\n", record.patient_id));
    out.push_str(&format!("- Patient Name: {}\n\n", record.patient_name));
    out.push_str(&format!("REFERRAL REASON:\n{}\n\n", record.reason));
    out.push_str(&format!("{CLOSING}\n\n"));
    out.push_str(BANNER);
    out.push('\n');

    out
}
