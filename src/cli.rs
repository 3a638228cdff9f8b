//! Command-line surface. Flags override values from `--config`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::config::{ConfigError, GeneratorConfig};

#[derive(Debug, Parser)]
#[command(name = "health-synth")]
#[command(version)]
#[command(about = "Synthetic longitudinal health records for older adults", long_about = None)]
pub struct Cli {
    /// JSON configuration file; missing keys keep their defaults
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Master seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of patients
    #[arg(long, value_name = "N")]
    pub patients: Option<usize>,

    /// First date, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last date, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Medication catalog file (bundled catalog when omitted)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Male first names, one per line
    #[arg(long, value_name = "FILE")]
    pub male_names: Option<PathBuf>,

    /// Female first names, one per line
    #[arg(long, value_name = "FILE")]
    pub female_names: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Loads `--config` (or the defaults) and applies every flag on top.
    pub fn resolve_config(&self) -> Result<GeneratorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)?,
            None => GeneratorConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(n) = self.patients {
            config.patient_count = n;
        }
        if let Some(start) = self.start {
            config.start_date = start;
        }
        if let Some(end) = self.end {
            config.end_date = end;
        }
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }
        if let Some(path) = &self.catalog {
            config.catalog = Some(path.clone());
        }
        if let Some(path) = &self.male_names {
            config.male_names = Some(path.clone());
        }
        if let Some(path) = &self.female_names {
            config.female_names = Some(path.clone());
        }

        config.validate()?;
        Ok(config)
    }
}
