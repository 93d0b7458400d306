use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read store file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write store file: {0}")]
    FileWrite(std::io::Error),
    #[error(
        "failed to replace store file (path: {path}): {source}",
        path = path.display()
    )]
    FilePersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "{path}:{line}: invalid {field} value '{value}'",
        path = path.display()
    )]
    FieldParse {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },
    #[error(
        "store {path} could not be loaded and is read-only",
        path = path.display()
    )]
    StoreUnavailable { path: PathBuf },

    #[error("failed to create notification directory: {0}")]
    NotificationDirCreation(std::io::Error),
    #[error(
        "failed to write referral notification (path: {path}): {source}",
        path = path.display()
    )]
    NotificationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("referral not found: {0}")]
    ReferralNotFound(String),

    #[error("identifier error: {0}")]
    Id(#[from] clinic_ids::IdError),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
