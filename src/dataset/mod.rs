//! Flattening generated records into fixed-width tables and persisting them.

pub mod assembler;
pub mod writer;

use std::path::PathBuf;

use thiserror::Error;

pub use assembler::{combined_columns, patient_columns, CombinedTable, PatientTable};
pub use writer::{retry_write, write_manifest, write_table};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Manifest serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Gave up writing {} after {attempts} attempts: {source}", path.display())]
    RetriesExhausted {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: Box<DatasetError>,
    },
}

impl DatasetError {
    /// True when the underlying failure is a permission denial, which is
    /// what a file held open by another program looks like.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            DatasetError::Io { source, .. } => {
                source.kind() == std::io::ErrorKind::PermissionDenied
            }
            DatasetError::Csv { source, .. } => match source.kind() {
                csv::ErrorKind::Io(e) => e.kind() == std::io::ErrorKind::PermissionDenied,
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    fn io_error(kind: ErrorKind) -> DatasetError {
        DatasetError::Io {
            path: PathBuf::from("x.csv"),
            source: Error::new(kind, "boom"),
        }
    }

    #[test]
    fn permission_denied_is_detected() {
        assert!(io_error(ErrorKind::PermissionDenied).is_permission_denied());
        assert!(!io_error(ErrorKind::NotFound).is_permission_denied());
    }

    #[test]
    fn csv_wrapped_permission_error_is_detected() {
        let err = DatasetError::Csv {
            path: PathBuf::from("x.csv"),
            source: csv::Error::from(Error::new(ErrorKind::PermissionDenied, "locked")),
        };
        assert!(err.is_permission_denied());
    }

    #[test]
    fn exhausted_message_names_attempts() {
        let err = DatasetError::RetriesExhausted {
            path: PathBuf::from("all.csv"),
            attempts: 3,
            source: Box::new(io_error(ErrorKind::PermissionDenied)),
        };
        assert!(err.to_string().contains("3 attempts"));
    }
}
