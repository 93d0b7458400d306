use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_core::constants::DELIMITER;
use clinic_core::{
    Age, Appointment, AppointmentStatus, ClinicConfig, ClinicStore, Clinician, DelimitedRecord,
    Mutation, NonEmptyText, OpenReport, Patient, Prescription, ReferralRequest, Repository,
};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Clinic records command-line front end")]
struct Cli {
    /// Print listings and created records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage patients
    Patients {
        #[command(subcommand)]
        action: PatientAction,
    },
    /// Manage clinicians
    Clinicians {
        #[command(subcommand)]
        action: ClinicianAction,
    },
    /// Manage appointments
    Appointments {
        #[command(subcommand)]
        action: AppointmentAction,
    },
    /// Manage prescriptions
    Prescriptions {
        #[command(subcommand)]
        action: PrescriptionAction,
    },
    /// Create referrals and their notifications
    Referrals {
        #[command(subcommand)]
        action: ReferralAction,
    },
}

/// Selects an existing record either by listing position or by identifier.
#[derive(Args)]
struct Target {
    /// Zero-based position as shown by `list`
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    position: Option<usize>,
    /// Record identifier, e.g. P001
    #[arg(long)]
    id: Option<String>,
}

enum Slot<'a> {
    Position(usize),
    Id(&'a str),
}

impl Target {
    fn slot(&self) -> Slot<'_> {
        match (&self.id, self.position) {
            (Some(id), _) => Slot::Id(id),
            (None, Some(position)) => Slot::Position(position),
            // clap guarantees one of the two is present.
            (None, None) => Slot::Position(usize::MAX),
        }
    }

    fn current<T: DelimitedRecord>(&self, repo: &Repository<T>) -> Option<T> {
        match self.slot() {
            Slot::Position(position) => repo.get(position).cloned(),
            Slot::Id(id) => repo.find(id).cloned(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot() {
            Slot::Position(position) => write!(f, "position {position}"),
            Slot::Id(id) => write!(f, "id {id}"),
        }
    }
}

#[derive(Subcommand)]
enum PatientAction {
    /// List all patients
    List,
    /// Add a patient with the next free identifier
    Add(PatientFields),
    /// Update fields of an existing patient
    Update {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        fields: PatientFields,
    },
    /// Delete a patient
    Delete(Target),
    /// Show the identifier the next patient would get
    NextId,
}

#[derive(Args)]
struct PatientFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    address: Option<String>,
    /// Free-text medical history (may be left out)
    #[arg(long)]
    history: Option<String>,
}

impl PatientFields {
    fn into_new(self) -> anyhow::Result<Patient> {
        Ok(Patient {
            patient_id: String::new(),
            name: required("name", self.name)?,
            age: parse_age(&self.age.ok_or_else(|| anyhow!("--age is required"))?)?,
            gender: required("gender", self.gender)?,
            contact_number: required("contact", self.contact)?,
            address: required("address", self.address)?,
            medical_history: free_text("history", self.history.unwrap_or_default())?,
        })
    }

    fn apply(self, mut patient: Patient) -> anyhow::Result<Patient> {
        if let Some(v) = self.name {
            patient.name = text("name", v)?;
        }
        if let Some(v) = self.age {
            patient.age = parse_age(&v)?;
        }
        if let Some(v) = self.gender {
            patient.gender = text("gender", v)?;
        }
        if let Some(v) = self.contact {
            patient.contact_number = text("contact", v)?;
        }
        if let Some(v) = self.address {
            patient.address = text("address", v)?;
        }
        if let Some(v) = self.history {
            patient.medical_history = free_text("history", v)?;
        }
        Ok(patient)
    }
}

#[derive(Subcommand)]
enum ClinicianAction {
    /// List all clinicians
    List,
    /// Add a clinician with the next free identifier
    Add(ClinicianFields),
    /// Update fields of an existing clinician
    Update {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        fields: ClinicianFields,
    },
    /// Delete a clinician
    Delete(Target),
    /// Show the identifier the next clinician would get
    NextId,
}

#[derive(Args)]
struct ClinicianFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    specialization: Option<String>,
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl ClinicianFields {
    fn into_new(self) -> anyhow::Result<Clinician> {
        Ok(Clinician {
            clinician_id: String::new(),
            name: required("name", self.name)?,
            specialization: required("specialization", self.specialization)?,
            contact_number: required("contact", self.contact)?,
            email: required("email", self.email)?,
        })
    }

    fn apply(self, mut clinician: Clinician) -> anyhow::Result<Clinician> {
        if let Some(v) = self.name {
            clinician.name = text("name", v)?;
        }
        if let Some(v) = self.specialization {
            clinician.specialization = text("specialization", v)?;
        }
        if let Some(v) = self.contact {
            clinician.contact_number = text("contact", v)?;
        }
        if let Some(v) = self.email {
            clinician.email = text("email", v)?;
        }
        Ok(clinician)
    }
}

#[derive(Subcommand)]
enum AppointmentAction {
    /// List all appointments
    List,
    /// Add an appointment with the next free identifier
    Add(AppointmentFields),
    /// Update fields of an existing appointment
    Update {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        fields: AppointmentFields,
    },
    /// Delete an appointment
    Delete(Target),
    /// Show the identifier the next appointment would get
    NextId,
}

#[derive(Args)]
struct AppointmentFields {
    /// Patient identifier (not checked against the patient store)
    #[arg(long)]
    patient: Option<String>,
    /// Clinician identifier (not checked against the clinician store)
    #[arg(long)]
    clinician: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    time: Option<String>,
    /// Scheduled, Completed or Cancelled (defaults to Scheduled on add)
    #[arg(long)]
    status: Option<String>,
}

impl AppointmentFields {
    fn into_new(self) -> anyhow::Result<Appointment> {
        let status = match self.status {
            Some(v) => parse_status(&v)?,
            None => AppointmentStatus::Scheduled,
        };
        Ok(Appointment {
            appointment_id: String::new(),
            patient_id: required("patient", self.patient)?,
            clinician_id: required("clinician", self.clinician)?,
            date: required("date", self.date)?,
            time: required("time", self.time)?,
            status,
        })
    }

    fn apply(self, mut appointment: Appointment) -> anyhow::Result<Appointment> {
        if let Some(v) = self.patient {
            appointment.patient_id = text("patient", v)?;
        }
        if let Some(v) = self.clinician {
            appointment.clinician_id = text("clinician", v)?;
        }
        if let Some(v) = self.date {
            appointment.date = text("date", v)?;
        }
        if let Some(v) = self.time {
            appointment.time = text("time", v)?;
        }
        if let Some(v) = self.status {
            appointment.status = parse_status(&v)?;
        }
        Ok(appointment)
    }
}

#[derive(Subcommand)]
enum PrescriptionAction {
    /// List all prescriptions
    List,
    /// Add a prescription with the next free identifier
    Add(PrescriptionFields),
    /// Update fields of an existing prescription
    Update {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        fields: PrescriptionFields,
    },
    /// Delete a prescription
    Delete(Target),
    /// Show the identifier the next prescription would get
    NextId,
}

#[derive(Args)]
struct PrescriptionFields {
    #[arg(long)]
    patient: Option<String>,
    #[arg(long)]
    clinician: Option<String>,
    #[arg(long)]
    medication: Option<String>,
    #[arg(long)]
    dosage: Option<String>,
    #[arg(long)]
    date: Option<String>,
}

impl PrescriptionFields {
    fn into_new(self) -> anyhow::Result<Prescription> {
        Ok(Prescription {
            prescription_id: String::new(),
            patient_id: required("patient", self.patient)?,
            clinician_id: required("clinician", self.clinician)?,
            medication: required("medication", self.medication)?,
            dosage: required("dosage", self.dosage)?,
            date: required("date", self.date)?,
        })
    }

    fn apply(self, mut prescription: Prescription) -> anyhow::Result<Prescription> {
        if let Some(v) = self.patient {
            prescription.patient_id = text("patient", v)?;
        }
        if let Some(v) = self.clinician {
            prescription.clinician_id = text("clinician", v)?;
        }
        if let Some(v) = self.medication {
            prescription.medication = text("medication", v)?;
        }
        if let Some(v) = self.dosage {
            prescription.dosage = text("dosage", v)?;
        }
        if let Some(v) = self.date {
            prescription.date = text("date", v)?;
        }
        Ok(prescription)
    }
}

#[derive(Subcommand)]
enum ReferralAction {
    /// Create a referral and write its notification file
    Create {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        patient_name: String,
        /// Referring clinician identifier
        #[arg(long)]
        from: String,
        /// Receiving clinician identifier
        #[arg(long)]
        to: String,
        #[arg(long)]
        reason: String,
        /// Also print the notification text
        #[arg(long)]
        preview: bool,
    },
}

/// Entry point for the clinic records CLI.
///
/// # Environment Variables
/// - `CLINIC_DATA_DIR`: directory holding the four store files (default: "data")
/// - `CLINIC_OUTPUT_DIR`: directory for referral notifications (default: "output")
/// - `RUST_LOG`: log filter, added to the default `clinic=info`
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("clinic=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    let cfg = ClinicConfig::from_env_values(
        std::env::var("CLINIC_DATA_DIR").ok(),
        std::env::var("CLINIC_OUTPUT_DIR").ok(),
    )
    .context("invalid clinic configuration")?;
    let (mut store, report) = ClinicStore::open(Arc::new(cfg));
    report_load_problems(&report);

    match command {
        Commands::Patients { action } => run_patients(&mut store, action, cli.json),
        Commands::Clinicians { action } => run_clinicians(&mut store, action, cli.json),
        Commands::Appointments { action } => run_appointments(&mut store, action, cli.json),
        Commands::Prescriptions { action } => run_prescriptions(&mut store, action, cli.json),
        Commands::Referrals { action } => run_referrals(&mut store, action, cli.json),
    }
}

/// Logs every store that failed to load or dropped rows. Returns how many stores were affected.
fn report_load_problems(report: &OpenReport) -> usize {
    let mut affected = 0;
    for load in &report.stores {
        if let Some(e) = &load.failure {
            affected += 1;
            tracing::error!(
                kind = load.kind,
                path = %load.path.display(),
                "store did not load and is read-only for this run: {e}"
            );
        } else if load.report.skipped > 0 {
            affected += 1;
            tracing::warn!(
                kind = load.kind,
                path = %load.path.display(),
                skipped = load.report.skipped,
                "malformed rows were skipped while loading"
            );
        }
    }
    affected
}

fn run_patients(store: &mut ClinicStore, action: PatientAction, json: bool) -> anyhow::Result<()> {
    const KIND: &str = "patient";
    match action {
        PatientAction::List => print_listing(&store.list_patients(), json),
        PatientAction::Add(fields) => {
            let created = store.create_patient(fields.into_new()?)?;
            print_created(&created, created.id(), json)
        }
        PatientAction::Update { target, fields } => {
            let Some(existing) = target.current(store.patients()) else {
                return stale(KIND, &target);
            };
            let updated = fields.apply(existing)?;
            let outcome = match target.slot() {
                Slot::Position(position) => store.update_patient_at(position, updated)?,
                Slot::Id(id) => store.update_patient(id, updated)?,
            };
            report_mutation(KIND, &target, "updated", outcome)
        }
        PatientAction::Delete(target) => {
            let outcome = match target.slot() {
                Slot::Position(position) => store.delete_patient_at(position)?,
                Slot::Id(id) => store.delete_patient(id)?,
            };
            report_mutation(KIND, &target, "deleted", outcome)
        }
        PatientAction::NextId => {
            println!("{}", store.generate_next_patient_id()?);
            Ok(())
        }
    }
}

fn run_clinicians(
    store: &mut ClinicStore,
    action: ClinicianAction,
    json: bool,
) -> anyhow::Result<()> {
    const KIND: &str = "clinician";
    match action {
        ClinicianAction::List => print_listing(&store.list_clinicians(), json),
        ClinicianAction::Add(fields) => {
            let created = store.create_clinician(fields.into_new()?)?;
            print_created(&created, created.id(), json)
        }
        ClinicianAction::Update { target, fields } => {
            let Some(existing) = target.current(store.clinicians()) else {
                return stale(KIND, &target);
            };
            let updated = fields.apply(existing)?;
            let outcome = match target.slot() {
                Slot::Position(position) => store.update_clinician_at(position, updated)?,
                Slot::Id(id) => store.update_clinician(id, updated)?,
            };
            report_mutation(KIND, &target, "updated", outcome)
        }
        ClinicianAction::Delete(target) => {
            let outcome = match target.slot() {
                Slot::Position(position) => store.delete_clinician_at(position)?,
                Slot::Id(id) => store.delete_clinician(id)?,
            };
            report_mutation(KIND, &target, "deleted", outcome)
        }
        ClinicianAction::NextId => {
            println!("{}", store.generate_next_clinician_id()?);
            Ok(())
        }
    }
}

fn run_appointments(
    store: &mut ClinicStore,
    action: AppointmentAction,
    json: bool,
) -> anyhow::Result<()> {
    const KIND: &str = "appointment";
    match action {
        AppointmentAction::List => print_listing(&store.list_appointments(), json),
        AppointmentAction::Add(fields) => {
            let created = store.create_appointment(fields.into_new()?)?;
            print_created(&created, created.id(), json)
        }
        AppointmentAction::Update { target, fields } => {
            let Some(existing) = target.current(store.appointments()) else {
                return stale(KIND, &target);
            };
            let updated = fields.apply(existing)?;
            let outcome = match target.slot() {
                Slot::Position(position) => store.update_appointment_at(position, updated)?,
                Slot::Id(id) => store.update_appointment(id, updated)?,
            };
            report_mutation(KIND, &target, "updated", outcome)
        }
        AppointmentAction::Delete(target) => {
            let outcome = match target.slot() {
                Slot::Position(position) => store.delete_appointment_at(position)?,
                Slot::Id(id) => store.delete_appointment(id)?,
            };
            report_mutation(KIND, &target, "deleted", outcome)
        }
        AppointmentAction::NextId => {
            println!("{}", store.generate_next_appointment_id()?);
            Ok(())
        }
    }
}

fn run_prescriptions(
    store: &mut ClinicStore,
    action: PrescriptionAction,
    json: bool,
) -> anyhow::Result<()> {
    const KIND: &str = "prescription";
    match action {
        PrescriptionAction::List => print_listing(&store.list_prescriptions(), json),
        PrescriptionAction::Add(fields) => {
            let created = store.create_prescription(fields.into_new()?)?;
            print_created(&created, created.id(), json)
        }
        PrescriptionAction::Update { target, fields } => {
            let Some(existing) = target.current(store.prescriptions()) else {
                return stale(KIND, &target);
            };
            let updated = fields.apply(existing)?;
            let outcome = match target.slot() {
                Slot::Position(position) => store.update_prescription_at(position, updated)?,
                Slot::Id(id) => store.update_prescription(id, updated)?,
            };
            report_mutation(KIND, &target, "updated", outcome)
        }
        PrescriptionAction::Delete(target) => {
            let outcome = match target.slot() {
                Slot::Position(position) => store.delete_prescription_at(position)?,
                Slot::Id(id) => store.delete_prescription(id)?,
            };
            report_mutation(KIND, &target, "deleted", outcome)
        }
        PrescriptionAction::NextId => {
            println!("{}", store.generate_next_prescription_id()?);
            Ok(())
        }
    }
}

fn run_referrals(store: &mut ClinicStore, action: ReferralAction, json: bool) -> anyhow::Result<()> {
    match action {
        ReferralAction::Create {
            patient,
            patient_name,
            from,
            to,
            reason,
            preview,
        } => {
            let request = ReferralRequest {
                patient_id: non_empty("patient", patient)?,
                patient_name: non_empty("patient-name", patient_name)?,
                from_clinician_id: non_empty("from", from)?,
                to_clinician_id: non_empty("to", to)?,
                reason: non_empty("reason", reason)?,
            };
            let created = store.create_referral(request)?;
            let referral_id = created.record.referral_id.clone();

            print_created(&created.record, &referral_id, json)?;
            match created.notification {
                Ok(path) => println!("Notification written to {}", path.display()),
                Err(e) => eprintln!("warning: referral {referral_id} kept, notification failed: {e}"),
            }
            if preview {
                println!("{}", store.referral_notification_preview(&referral_id)?);
            }
            Ok(())
        }
    }
}

fn print_listing<T: Serialize + fmt::Display>(records: &[T], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else if records.is_empty() {
        println!("No records found.");
    } else {
        for (position, record) in records.iter().enumerate() {
            println!("{position:>4}  {record}");
        }
    }
    Ok(())
}

fn print_created<T: Serialize + fmt::Display>(record: &T, id: &str, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(record)?);
    } else {
        println!("Created {id}: {record}");
    }
    Ok(())
}

fn report_mutation(kind: &str, target: &Target, verb: &str, outcome: Mutation) -> anyhow::Result<()> {
    match outcome {
        Mutation::Applied => {
            println!("{verb} {kind} at {target}");
            Ok(())
        }
        Mutation::Ignored => stale(kind, target),
    }
}

/// A position or id that no longer matches a record is a warning, not a failure.
fn stale(kind: &str, target: &Target) -> anyhow::Result<()> {
    eprintln!("warning: no {kind} at {target}; nothing changed");
    Ok(())
}

fn non_empty(label: &str, value: String) -> anyhow::Result<String> {
    let value = NonEmptyText::new(value).with_context(|| format!("--{label}"))?;
    Ok(value.into_string())
}

fn text(label: &str, value: String) -> anyhow::Result<String> {
    free_text(label, non_empty(label, value)?)
}

fn required(label: &str, value: Option<String>) -> anyhow::Result<String> {
    match value {
        Some(v) => text(label, v),
        None => bail!("--{label} is required"),
    }
}

/// Fields are stored unquoted, one record per line. A delimiter would shift every later column
/// and a line break would split the record.
fn free_text(label: &str, value: String) -> anyhow::Result<String> {
    if value.contains(DELIMITER) {
        bail!("--{label} must not contain '{DELIMITER}'");
    }
    if value.contains(['\n', '\r']) {
        bail!("--{label} must be a single line");
    }
    Ok(value.trim().to_string())
}

fn parse_age(value: &str) -> anyhow::Result<u32> {
    let age: Age = value.parse().context("--age")?;
    Ok(age.years())
}

fn parse_status(value: &str) -> anyhow::Result<AppointmentStatus> {
    value.trim().parse().map_err(|_| {
        let allowed: Vec<&str> = AppointmentStatus::ALL.iter().map(|s| s.as_str()).collect();
        anyhow!("--status must be one of {}, got '{value}'", allowed.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_load_problems_counts_failed_and_skipping_stores() {
        use clinic_core::{ClinicError, LoadReport, StoreLoad};
        use std::path::PathBuf;

        let load = |kind: &'static str,
                    loaded: usize,
                    skipped: usize,
                    failure: Option<ClinicError>| StoreLoad {
            kind,
            path: PathBuf::from(format!("data/{kind}s.csv")),
            report: LoadReport { loaded, skipped },
            failure,
        };
        let report = OpenReport {
            stores: vec![
                load("patient", 2, 0, None),
                load("clinician", 1, 1, None),
                load(
                    "appointment",
                    0,
                    0,
                    Some(ClinicError::StoreUnavailable {
                        path: PathBuf::from("data/appointments.csv"),
                    }),
                ),
                load("prescription", 0, 0, None),
            ],
        };

        assert_eq!(report_load_problems(&report), 2);
        assert_eq!(report_load_problems(&OpenReport::default()), 0);
    }

    #[test]
    fn test_free_text_rejects_delimiter() {
        let err = free_text("address", "1 Elm St, Flat 2".into()).expect_err("comma should fail");
        assert!(err.to_string().contains("--address"));
    }

    #[test]
    fn test_free_text_rejects_line_breaks() {
        for value in ["asthma\nallergies", "asthma\rallergies", "asthma\r\n"] {
            let err = free_text("history", value.into()).expect_err("line break should fail");
            assert_eq!(err.to_string(), "--history must be a single line");
        }
    }

    #[test]
    fn test_free_text_trims_and_allows_empty() {
        assert_eq!(free_text("history", "  none ".into()).expect("should accept"), "none");
        assert_eq!(free_text("history", String::new()).expect("should accept"), "");
    }

    #[test]
    fn test_text_requires_content() {
        assert!(text("name", "   ".into()).is_err());
        assert!(required("name", None).is_err());
        assert_eq!(text("name", " Alice ".into()).expect("should accept"), "Alice");
    }
}
