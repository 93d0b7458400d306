//! Generic file-backed entity repository.
//!
//! A [`Repository`] owns the in-memory, insertion-ordered collection for one record kind and
//! mirrors it to one store file. The file is read once in [`Repository::open`]; after that every
//! successful mutation rewrites the whole file through an atomic replace.
//!
//! ## Addressing
//!
//! Records can be addressed by position (their index in [`Repository::list`]) or by identifier.
//! Positions are only stable until the next mutation or reload, so identifier addressing is
//! preferred whenever the caller has one.
//!
//! ## Outcomes
//!
//! Mutations report what happened instead of staying silent:
//! - `Ok(Mutation::Applied)`: memory and file both reflect the change
//! - `Ok(Mutation::Ignored)`: the position or identifier matched nothing; the file is untouched
//! - `Err(_)`: the file could not be written; the in-memory collection is left as it was

use crate::codec::{decode_store, encode_store, DelimitedRecord};
use crate::repositories::helpers::{read_store, write_atomically};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// Nothing matched the requested position or identifier.
    Ignored,
}

impl Mutation {
    pub fn is_applied(self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Counts from decoding a store file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub loaded: usize,
    /// Rows dropped because they had too few fields.
    pub skipped: usize,
}

#[derive(Debug)]
pub struct Repository<T> {
    path: PathBuf,
    records: Vec<T>,
    read_only: bool,
}

impl<T: DelimitedRecord> Repository<T> {
    /// Loads the repository from `path`. A missing file gives an empty repository.
    ///
    /// # Errors
    ///
    /// Returns `ClinicError` if:
    /// - the file exists but cannot be read ([`ClinicError::FileRead`])
    /// - a typed field on any row does not parse ([`ClinicError::FieldParse`])
    pub fn open(path: impl Into<PathBuf>) -> ClinicResult<(Self, LoadReport)> {
        let path = path.into();
        let mut repo = Self {
            path,
            records: Vec::new(),
            read_only: false,
        };
        let report = repo.reload()?;
        Ok((repo, report))
    }

    /// An empty repository that refuses mutations.
    ///
    /// Used when the store at `path` exists but could not be loaded, so that it is never
    /// overwritten with a partial collection.
    pub fn unavailable(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            read_only: true,
        }
    }

    /// Re-reads the store file, replacing the in-memory collection.
    ///
    /// On error the current collection is kept.
    pub fn reload(&mut self) -> ClinicResult<LoadReport> {
        let Some(content) = read_store(&self.path)? else {
            self.records.clear();
            tracing::debug!(kind = T::KIND, path = %self.path.display(), "store file absent, starting empty");
            return Ok(LoadReport::default());
        };

        let decoded = decode_store::<T>(&content).map_err(|e| ClinicError::FieldParse {
            path: self.path.clone(),
            line: e.line,
            field: e.field,
            value: e.value,
        })?;

        let report = LoadReport {
            loaded: decoded.records.len(),
            skipped: decoded.skipped,
        };
        self.records = decoded.records;

        tracing::info!(
            kind = T::KIND,
            path = %self.path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "store loaded"
        );
        Ok(report)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns a copy of every record in insertion order.
    pub fn list(&self) -> Vec<T> {
        self.records.clone()
    }

    pub fn get(&self, position: usize) -> Option<&T> {
        self.records.get(position)
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Derives the next identifier from the current contents (`max + 1`).
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Id`] if any stored identifier is malformed.
    pub fn next_id(&self) -> ClinicResult<String> {
        let next = T::ID_SCHEME.next_after(self.records.iter().map(|r| r.id()))?;
        Ok(next)
    }

    /// Appends `record` as given and rewrites the store.
    pub fn add(&mut self, record: T) -> ClinicResult<()> {
        self.ensure_writable()?;

        let mut next = self.records.clone();
        next.push(record);
        self.commit(next)
    }

    /// Assigns a fresh identifier to `record`, appends it and rewrites the store.
    ///
    /// Any identifier already on `record` is replaced. Returns the stored record.
    pub fn create(&mut self, mut record: T) -> ClinicResult<T> {
        self.ensure_writable()?;

        record.set_id(self.next_id()?);
        self.add(record.clone())?;
        Ok(record)
    }

    /// Replaces the record at `position`. Out-of-range positions are ignored.
    pub fn update_at(&mut self, position: usize, record: T) -> ClinicResult<Mutation> {
        self.ensure_writable()?;

        if position >= self.records.len() {
            return Ok(self.ignored("update", position));
        }

        let mut next = self.records.clone();
        next[position] = record;
        self.commit(next)?;
        Ok(Mutation::Applied)
    }

    /// Removes the record at `position`. Out-of-range positions are ignored.
    pub fn delete_at(&mut self, position: usize) -> ClinicResult<Mutation> {
        self.ensure_writable()?;

        if position >= self.records.len() {
            return Ok(self.ignored("delete", position));
        }

        let mut next = self.records.clone();
        next.remove(position);
        self.commit(next)?;
        Ok(Mutation::Applied)
    }

    /// Replaces the record whose identifier is `id`.
    pub fn update_by_id(&mut self, id: &str, record: T) -> ClinicResult<Mutation> {
        match self.position_of(id) {
            Some(position) => self.update_at(position, record),
            None => {
                self.ensure_writable()?;
                tracing::warn!(kind = T::KIND, id, "update ignored: no record with this id");
                Ok(Mutation::Ignored)
            }
        }
    }

    /// Removes the record whose identifier is `id`.
    pub fn delete_by_id(&mut self, id: &str) -> ClinicResult<Mutation> {
        match self.position_of(id) {
            Some(position) => self.delete_at(position),
            None => {
                self.ensure_writable()?;
                tracing::warn!(kind = T::KIND, id, "delete ignored: no record with this id");
                Ok(Mutation::Ignored)
            }
        }
    }

    fn ensure_writable(&self) -> ClinicResult<()> {
        if self.read_only {
            tracing::warn!(kind = T::KIND, path = %self.path.display(), "mutation refused on read-only store");
            return Err(ClinicError::StoreUnavailable {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn ignored(&self, op: &str, position: usize) -> Mutation {
        tracing::warn!(
            kind = T::KIND,
            position,
            len = self.records.len(),
            "{op} ignored: position out of range"
        );
        Mutation::Ignored
    }

    fn commit(&mut self, next: Vec<T>) -> ClinicResult<()> {
        write_atomically(&self.path, &encode_store(&next))?;
        tracing::debug!(kind = T::KIND, path = %self.path.display(), records = next.len(), "store rewritten");
        self.records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PATIENTS_HEADER;
    use crate::records::{Appointment, AppointmentStatus, Patient};
    use std::fs;
    use tempfile::TempDir;

    fn patient(id: &str, name: &str) -> Patient {
        Patient {
            patient_id: id.into(),
            name: name.into(),
            age: 30,
            gender: "Female".into(),
            contact_number: "555-0100".into(),
            address: "1 Elm St".into(),
            medical_history: "none".into(),
        }
    }

    fn open_patients(dir: &TempDir) -> Repository<Patient> {
        let (repo, _) =
            Repository::open(dir.path().join("patients.csv")).expect("open should succeed");
        repo
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (repo, report) = Repository::<Patient>::open(temp_dir.path().join("patients.csv"))
            .expect("missing file is not an error");

        assert!(repo.is_empty());
        assert_eq!(report, LoadReport::default());
        assert!(!temp_dir.path().join("patients.csv").exists());
    }

    #[test]
    fn test_add_appends_and_persists() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);

        repo.add(patient("P001", "Alice")).expect("add should succeed");
        repo.add(patient("P002", "Bob")).expect("add should succeed");

        let content = fs::read_to_string(repo.path()).expect("store should exist");
        assert_eq!(
            content,
            format!(
                "{PATIENTS_HEADER}\nP001,Alice,30,Female,555-0100,1 Elm St,none\nP002,Bob,30,Female,555-0100,1 Elm St,none\n"
            )
        );
        assert_eq!(repo.list().last().map(|p| p.name.as_str()), Some("Bob"));
    }

    #[test]
    fn test_create_assigns_next_id_once_at_end() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("P001", "Alice")).expect("add should succeed");
        repo.add(patient("P005", "Eve")).expect("add should succeed");

        let expected_id = repo.next_id().expect("should allocate");
        let stored = repo
            .create(patient("ignored", "Frank"))
            .expect("create should succeed");

        assert_eq!(expected_id, "P006");
        assert_eq!(stored.patient_id, "P006");
        let list = repo.list();
        assert_eq!(list.last(), Some(&stored));
        assert_eq!(list.iter().filter(|p| p.patient_id == "P006").count(), 1);
    }

    #[test]
    fn test_list_is_a_copy() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("P001", "Alice")).expect("add should succeed");

        let mut snapshot = repo.list();
        snapshot[0].name = "Mallory".into();
        snapshot.clear();

        assert_eq!(repo.len(), 1);
        assert_eq!(repo.get(0).map(|p| p.name.as_str()), Some("Alice"));
    }

    #[test]
    fn test_update_at_out_of_range_leaves_file_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("P001", "Alice")).expect("add should succeed");
        let before = fs::read(repo.path()).expect("should read store");

        let outcome = repo
            .update_at(repo.len(), patient("P009", "Zed"))
            .expect("out of range is not an error");
        let outcome_far = repo
            .update_at(usize::MAX, patient("P009", "Zed"))
            .expect("out of range is not an error");

        assert_eq!(outcome, Mutation::Ignored);
        assert_eq!(outcome_far, Mutation::Ignored);
        assert_eq!(fs::read(repo.path()).expect("should read store"), before);
        assert_eq!(repo.list(), vec![patient("P001", "Alice")]);
    }

    #[test]
    fn test_update_at_replaces_in_place() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("P001", "Alice")).expect("add should succeed");
        repo.add(patient("P002", "Bob")).expect("add should succeed");

        let outcome = repo
            .update_at(0, patient("P001", "Alicia"))
            .expect("update should succeed");

        assert!(outcome.is_applied());
        let (reloaded, _) = Repository::<Patient>::open(repo.path()).expect("reopen");
        let names: Vec<_> = reloaded.list().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Alicia", "Bob"]);
    }

    #[test]
    fn test_delete_at_removes_and_ignores_stale_position() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("P001", "Alice")).expect("add should succeed");
        repo.add(patient("P002", "Bob")).expect("add should succeed");

        assert_eq!(repo.delete_at(0).expect("delete"), Mutation::Applied);
        assert_eq!(repo.delete_at(1).expect("delete"), Mutation::Ignored);

        assert_eq!(repo.list(), vec![patient("P002", "Bob")]);
        // Gaps are never reused.
        assert_eq!(repo.next_id().expect("should allocate"), "P003");
    }

    #[test]
    fn test_delete_all_keeps_header_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("P001", "Alice")).expect("add should succeed");

        repo.delete_at(0).expect("delete should succeed");

        let content = fs::read_to_string(repo.path()).expect("should read store");
        assert_eq!(content, format!("{PATIENTS_HEADER}\n"));
    }

    #[test]
    fn test_by_id_addressing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("P001", "Alice")).expect("add should succeed");
        repo.add(patient("P002", "Bob")).expect("add should succeed");

        assert_eq!(
            repo.update_by_id("P002", patient("P002", "Robert"))
                .expect("update"),
            Mutation::Applied
        );
        assert_eq!(
            repo.update_by_id("P404", patient("P404", "Nobody"))
                .expect("update"),
            Mutation::Ignored
        );
        assert_eq!(repo.delete_by_id("P001").expect("delete"), Mutation::Applied);
        assert_eq!(repo.delete_by_id("P001").expect("delete"), Mutation::Ignored);

        assert_eq!(repo.list(), vec![patient("P002", "Robert")]);
        assert_eq!(repo.find("P002").map(|p| p.name.as_str()), Some("Robert"));
    }

    #[test]
    fn test_open_skips_short_rows_and_reports_them() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.csv");
        fs::write(
            &path,
            format!(
                "{PATIENTS_HEADER}\nP001,Alice,30,Female,555-0100,1 Elm St,none\nP002,Bob\nP003,Cara,22,Female,555-0102,3 Ash Rd,flu\n"
            ),
        )
        .expect("Failed to seed store");

        let (repo, report) = Repository::<Patient>::open(&path).expect("open should succeed");

        assert_eq!(report, LoadReport { loaded: 2, skipped: 1 });
        let ids: Vec<_> = repo.list().into_iter().map(|p| p.patient_id).collect();
        assert_eq!(ids, ["P001", "P003"]);
    }

    #[test]
    fn test_open_fails_on_bad_typed_field() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("appointments.csv");
        fs::write(
            &path,
            "AppointmentID,PatientID,ClinicianID,Date,Time,Status\nA001,P001,C001,2026-10-18,09:30,Maybe\n",
        )
        .expect("Failed to seed store");

        let err = Repository::<Appointment>::open(&path).expect_err("bad status should fail");

        match err {
            ClinicError::FieldParse {
                line, field, value, ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(field, "Status");
                assert_eq!(value, "Maybe");
            }
            other => panic!("Expected FieldParse error, got {other:?}"),
        }
    }

    #[test]
    fn test_next_id_fails_on_malformed_stored_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.add(patient("PX1", "Odd")).expect("add stores ids as given");

        let err = repo.next_id().expect_err("malformed id should fail generation");
        assert!(matches!(err, ClinicError::Id(_)));
    }

    #[test]
    fn test_unavailable_refuses_mutations() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("appointments.csv");
        let mut repo = Repository::<Appointment>::unavailable(&path);

        let appt = Appointment {
            appointment_id: "A001".into(),
            patient_id: "P001".into(),
            clinician_id: "C001".into(),
            date: "2026-10-18".into(),
            time: "09:30".into(),
            status: AppointmentStatus::Scheduled,
        };

        assert!(repo.is_read_only());
        assert!(matches!(
            repo.add(appt.clone()),
            Err(ClinicError::StoreUnavailable { .. })
        ));
        assert!(matches!(
            repo.update_at(5, appt),
            Err(ClinicError::StoreUnavailable { .. })
        ));
        assert!(!path.exists(), "read-only store must never be written");
    }

    #[test]
    fn test_failed_write_keeps_memory_unchanged() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        // A directory at the store path makes the final rename fail.
        fs::create_dir(repo.path()).expect("Failed to create blocking directory");

        let err = repo
            .add(patient("P001", "Alice"))
            .expect_err("write should fail");

        assert!(matches!(err, ClinicError::FilePersist { .. }));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_reload_matches_in_memory_state() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut repo = open_patients(&temp_dir);
        repo.create(patient("", "Alice")).expect("create should succeed");
        repo.create(patient("", "Bob")).expect("create should succeed");
        let before = repo.list();

        let report = repo.reload().expect("reload should succeed");

        assert_eq!(report.loaded, 2);
        assert_eq!(repo.list(), before);
    }
}
