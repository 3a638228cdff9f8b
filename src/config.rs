//! Generator configuration.
//!
//! Every knob has a default matching the reference study period, so an
//! empty JSON object (or no file at all) is a valid configuration. CLI flags
//! are applied on top of the loaded file, then `validate()` runs once.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sampling::SamplingTables;

/// Application-level constants
pub const APP_NAME: &str = "health-synth";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_PATIENT_COUNT: usize = 100;
pub const DEFAULT_SEED: u64 = 999;
pub const DEFAULT_OUTPUT_DIR: &str = "public";

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "health_synth=info,health_synth_lib=info"
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Bounded retry for writes that may hit a transiently locked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_ms: 2000,
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub patient_count: usize,
    /// Inclusive.
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub seed: u64,
    pub output_dir: PathBuf,
    pub male_names: Option<PathBuf>,
    pub female_names: Option<PathBuf>,
    /// Bundled catalog when unset.
    pub catalog: Option<PathBuf>,
    /// Applies to the combined file only.
    pub combined_retry: RetryPolicy,
    pub tables: SamplingTables,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            patient_count: DEFAULT_PATIENT_COUNT,
            start_date: NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid calendar date"),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 31).expect("valid calendar date"),
            seed: DEFAULT_SEED,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            male_names: None,
            female_names: None,
            catalog: None,
            combined_retry: RetryPolicy::default(),
            tables: SamplingTables::default(),
        }
    }
}

impl GeneratorConfig {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patient_count == 0 {
            return Err(ConfigError::Invalid("patient_count must be at least 1".into()));
        }
        if self.start_date > self.end_date {
            return Err(ConfigError::Invalid(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        if self.combined_retry.attempts == 0 {
            return Err(ConfigError::Invalid("combined_retry.attempts must be at least 1".into()));
        }
        self.tables.validate()
    }

    /// Every date in the range, ascending, both ends included.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }

    pub fn day_count(&self) -> usize {
        if self.start_date > self.end_date {
            return 0;
        }
        (self.end_date - self.start_date).num_days() as usize + 1
    }

    pub fn patient_dir(&self) -> PathBuf {
        self.output_dir.join("synthetic_patients")
    }

    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join("synthetic_patients_all.csv")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join("generation_manifest.json")
    }
}
