//! Access facade over the four entity repositories and the referral log.
//!
//! [`ClinicStore`] is the single entry point for front ends. It owns every repository and the
//! referral log; there is no global state. Mutating calls take `&mut self`, so a store shared
//! between threads has to be wrapped in a lock, which serialises writers per store.

use crate::codec::DelimitedRecord;
use crate::config::ClinicConfig;
use crate::records::{
    Appointment, Clinician, Patient, Prescription, ReferralRecord, ReferralRequest,
};
use crate::repositories::entity::{LoadReport, Mutation, Repository};
use crate::repositories::referrals::ReferralLog;
use crate::{ClinicError, ClinicResult};
use std::path::PathBuf;
use std::sync::Arc;

/// Outcome of loading one store file in [`ClinicStore::open`].
#[derive(Debug)]
pub struct StoreLoad {
    pub kind: &'static str,
    pub path: PathBuf,
    pub report: LoadReport,
    /// Set when the store could not be loaded; the repository is then empty and read-only.
    pub failure: Option<ClinicError>,
}

#[derive(Debug, Default)]
pub struct OpenReport {
    pub stores: Vec<StoreLoad>,
}

impl OpenReport {
    /// Total rows dropped across all stores for having too few fields.
    pub fn skipped(&self) -> usize {
        self.stores.iter().map(|s| s.report.skipped).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &StoreLoad> {
        self.stores.iter().filter(|s| s.failure.is_some())
    }

    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && self.failures().next().is_none()
    }
}

/// Result of [`ClinicStore::create_referral`].
///
/// The referral is appended even if the notification could not be written.
#[derive(Debug)]
pub struct ReferralCreated {
    pub record: ReferralRecord,
    pub notification: ClinicResult<PathBuf>,
}

#[derive(Debug)]
pub struct ClinicStore {
    cfg: Arc<ClinicConfig>,
    patients: Repository<Patient>,
    clinicians: Repository<Clinician>,
    appointments: Repository<Appointment>,
    prescriptions: Repository<Prescription>,
    referrals: ReferralLog,
}

impl ClinicStore {
    /// Loads every store named by `cfg` and starts an empty referral log.
    ///
    /// A store that fails to load does not abort the others. It is reported in the returned
    /// [`OpenReport`] and replaced by an empty read-only repository.
    pub fn open(cfg: Arc<ClinicConfig>) -> (Self, OpenReport) {
        let mut report = OpenReport::default();

        let patients = load(cfg.patients_file(), &mut report);
        let clinicians = load(cfg.clinicians_file(), &mut report);
        let appointments = load(cfg.appointments_file(), &mut report);
        let prescriptions = load(cfg.prescriptions_file(), &mut report);
        let referrals = ReferralLog::new(cfg.output_dir());

        let store = Self {
            cfg,
            patients,
            clinicians,
            appointments,
            prescriptions,
            referrals,
        };
        (store, report)
    }

    pub fn config(&self) -> &ClinicConfig {
        &self.cfg
    }

    pub fn patients(&self) -> &Repository<Patient> {
        &self.patients
    }

    pub fn clinicians(&self) -> &Repository<Clinician> {
        &self.clinicians
    }

    pub fn appointments(&self) -> &Repository<Appointment> {
        &self.appointments
    }

    pub fn prescriptions(&self) -> &Repository<Prescription> {
        &self.prescriptions
    }

    pub fn referrals(&self) -> &ReferralLog {
        &self.referrals
    }

    // ------------------------------------------------------------------
    // Patients
    // ------------------------------------------------------------------

    pub fn list_patients(&self) -> Vec<Patient> {
        self.patients.list()
    }

    pub fn generate_next_patient_id(&self) -> ClinicResult<String> {
        self.patients.next_id()
    }

    pub fn add_patient(&mut self, patient: Patient) -> ClinicResult<()> {
        self.patients.add(patient)
    }

    /// Assigns the next patient identifier and stores the record in one step.
    pub fn create_patient(&mut self, patient: Patient) -> ClinicResult<Patient> {
        self.patients.create(patient)
    }

    pub fn update_patient_at(&mut self, position: usize, patient: Patient) -> ClinicResult<Mutation> {
        self.patients.update_at(position, patient)
    }

    pub fn delete_patient_at(&mut self, position: usize) -> ClinicResult<Mutation> {
        self.patients.delete_at(position)
    }

    pub fn update_patient(&mut self, patient_id: &str, patient: Patient) -> ClinicResult<Mutation> {
        self.patients.update_by_id(patient_id, patient)
    }

    pub fn delete_patient(&mut self, patient_id: &str) -> ClinicResult<Mutation> {
        self.patients.delete_by_id(patient_id)
    }

    // ------------------------------------------------------------------
    // Clinicians
    // ------------------------------------------------------------------

    pub fn list_clinicians(&self) -> Vec<Clinician> {
        self.clinicians.list()
    }

    pub fn generate_next_clinician_id(&self) -> ClinicResult<String> {
        self.clinicians.next_id()
    }

    pub fn add_clinician(&mut self, clinician: Clinician) -> ClinicResult<()> {
        self.clinicians.add(clinician)
    }

    pub fn create_clinician(&mut self, clinician: Clinician) -> ClinicResult<Clinician> {
        self.clinicians.create(clinician)
    }

    pub fn update_clinician_at(
        &mut self,
        position: usize,
        clinician: Clinician,
    ) -> ClinicResult<Mutation> {
        self.clinicians.update_at(position, clinician)
    }

    pub fn delete_clinician_at(&mut self, position: usize) -> ClinicResult<Mutation> {
        self.clinicians.delete_at(position)
    }

    pub fn update_clinician(
        &mut self,
        clinician_id: &str,
        clinician: Clinician,
    ) -> ClinicResult<Mutation> {
        self.clinicians.update_by_id(clinician_id, clinician)
    }

    pub fn delete_clinician(&mut self, clinician_id: &str) -> ClinicResult<Mutation> {
        self.clinicians.delete_by_id(clinician_id)
    }

    // ------------------------------------------------------------------
    // Appointments
    // ------------------------------------------------------------------

    pub fn list_appointments(&self) -> Vec<Appointment> {
        self.appointments.list()
    }

    pub fn generate_next_appointment_id(&self) -> ClinicResult<String> {
        self.appointments.next_id()
    }

    pub fn add_appointment(&mut self, appointment: Appointment) -> ClinicResult<()> {
        self.appointments.add(appointment)
    }

    pub fn create_appointment(&mut self, appointment: Appointment) -> ClinicResult<Appointment> {
        self.appointments.create(appointment)
    }

    pub fn update_appointment_at(
        &mut self,
        position: usize,
        appointment: Appointment,
    ) -> ClinicResult<Mutation> {
        self.appointments.update_at(position, appointment)
    }

    pub fn delete_appointment_at(&mut self, position: usize) -> ClinicResult<Mutation> {
        self.appointments.delete_at(position)
    }

    pub fn update_appointment(
        &mut self,
        appointment_id: &str,
        appointment: Appointment,
    ) -> ClinicResult<Mutation> {
        self.appointments.update_by_id(appointment_id, appointment)
    }

    pub fn delete_appointment(&mut self, appointment_id: &str) -> ClinicResult<Mutation> {
        self.appointments.delete_by_id(appointment_id)
    }

    // ------------------------------------------------------------------
    // Prescriptions
    // ------------------------------------------------------------------

    pub fn list_prescriptions(&self) -> Vec<Prescription> {
        self.prescriptions.list()
    }

    pub fn generate_next_prescription_id(&self) -> ClinicResult<String> {
        self.prescriptions.next_id()
    }

    pub fn add_prescription(&mut self, prescription: Prescription) -> ClinicResult<()> {
        self.prescriptions.add(prescription)
    }

    pub fn create_prescription(
        &mut self,
        prescription: Prescription,
    ) -> ClinicResult<Prescription> {
        self.prescriptions.create(prescription)
    }

    pub fn update_prescription_at(
        &mut self,
        position: usize,
        prescription: Prescription,
    ) -> ClinicResult<Mutation> {
        self.prescriptions.update_at(position, prescription)
    }

    pub fn delete_prescription_at(&mut self, position: usize) -> ClinicResult<Mutation> {
        self.prescriptions.delete_at(position)
    }

    pub fn update_prescription(
        &mut self,
        prescription_id: &str,
        prescription: Prescription,
    ) -> ClinicResult<Mutation> {
        self.prescriptions.update_by_id(prescription_id, prescription)
    }

    pub fn delete_prescription(&mut self, prescription_id: &str) -> ClinicResult<Mutation> {
        self.prescriptions.delete_by_id(prescription_id)
    }

    // ------------------------------------------------------------------
    // Referrals
    // ------------------------------------------------------------------

    /// Appends a referral and writes its notification file.
    ///
    /// Patient and clinician identifiers are not checked against their repositories.
    ///
    /// # Errors
    ///
    /// Only fails if the referral cannot be appended. A notification failure is reported in
    /// [`ReferralCreated::notification`] instead.
    pub fn create_referral(&mut self, request: ReferralRequest) -> ClinicResult<ReferralCreated> {
        let record = self.referrals.append(request)?;
        let notification = self.referrals.emit_notification(&record);
        if let Err(e) = &notification {
            tracing::error!(referral_id = %record.referral_id, "referral notification failed: {e}");
        }
        Ok(ReferralCreated {
            record,
            notification,
        })
    }

    pub fn list_referrals(&self) -> Vec<ReferralRecord> {
        self.referrals.list()
    }

    /// Renders the notification text for an existing referral.
    pub fn referral_notification_preview(&self, referral_id: &str) -> ClinicResult<String> {
        self.referrals
            .get(referral_id)
            .map(|record| self.referrals.render_notification(record))
            .ok_or_else(|| ClinicError::ReferralNotFound(referral_id.to_owned()))
    }
}

fn load<T: DelimitedRecord>(path: PathBuf, report: &mut OpenReport) -> Repository<T> {
    match Repository::<T>::open(&path) {
        Ok((repo, load_report)) => {
            if load_report.skipped > 0 {
                tracing::warn!(
                    kind = T::KIND,
                    skipped = load_report.skipped,
                    "rows with too few fields were dropped"
                );
            }
            report.stores.push(StoreLoad {
                kind: T::KIND,
                path,
                report: load_report,
                failure: None,
            });
            repo
        }
        Err(e) => {
            tracing::error!(kind = T::KIND, path = %path.display(), "failed to load store: {e}");
            report.stores.push(StoreLoad {
                kind: T::KIND,
                path: path.clone(),
                report: LoadReport::default(),
                failure: Some(e),
            });
            Repository::unavailable(path)
        }
    }
}
