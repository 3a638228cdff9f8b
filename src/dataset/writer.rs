//! CSV and manifest persistence.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::RetryPolicy;

use super::DatasetError;

/// Writes `header` then `rows` to a fresh CSV file at `path`.
pub fn write_table(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<(), DatasetError> {
    let csv_err = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(header).map_err(csv_err)?;
    for row in rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = rows.len(), "Wrote table");
    Ok(())
}

/// Runs `op` until it succeeds, retrying only permission-denied failures.
///
/// At most `policy.attempts` calls are made, sleeping `policy.backoff()`
/// between them. Any other error is returned after the first call.
pub fn retry_write<T, F>(policy: &RetryPolicy, path: &Path, mut op: F) -> Result<T, DatasetError>
where
    F: FnMut() -> Result<T, DatasetError>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if e.is_permission_denied() && attempt < attempts => {
                tracing::warn!(
                    path = %path.display(),
                    attempt,
                    attempts,
                    "Permission denied, close any program holding the file open; retrying"
                );
                std::thread::sleep(policy.backoff());
                attempt += 1;
            }
            Err(e) if e.is_permission_denied() => {
                tracing::error!(path = %path.display(), attempts, "Giving up on locked file");
                return Err(DatasetError::RetriesExhausted {
                    path: path.to_path_buf(),
                    attempts,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Unexpected write failure");
                return Err(e);
            }
        }
    }
}

/// Pretty-printed JSON, overwriting any previous manifest.
pub fn write_manifest<T: Serialize>(path: &Path, manifest: &T) -> Result<(), DatasetError> {
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Wrote generation manifest");
    Ok(())
}
