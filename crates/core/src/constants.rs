//! Constants used throughout the clinic core crate.
//!
//! Store file names, column headers and rendering formats live here so the codec, the
//! repositories and the referral log agree on them.

/// Default directory for store files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default directory for referral notification files.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Field delimiter for every store file. Fields are never quoted or escaped.
pub const DELIMITER: char = ',';

pub const PATIENTS_FILENAME: &str = "patients.csv";
pub const CLINICIANS_FILENAME: &str = "clinicians.csv";
pub const APPOINTMENTS_FILENAME: &str = "appointments.csv";
pub const PRESCRIPTIONS_FILENAME: &str = "prescriptions.csv";

pub const PATIENTS_HEADER: &str =
    "PatientID,Name,Age,Gender,ContactNumber,Address,MedicalHistory";
pub const CLINICIANS_HEADER: &str = "ClinicianID,Name,Specialization,ContactNumber,Email";
pub const APPOINTMENTS_HEADER: &str = "AppointmentID,PatientID,ClinicianID,Date,Time,Status";
pub const PRESCRIPTIONS_HEADER: &str =
    "PrescriptionID,PatientID,ClinicianID,Medication,Dosage,Date";

/// Notification files are named `<prefix><referral id>.txt`.
pub const NOTIFICATION_FILE_PREFIX: &str = "referral_email_";

/// Timestamp format used inside notification files.
pub const NOTIFICATION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shorter timestamp format used in one-line referral summaries.
pub const SUMMARY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
