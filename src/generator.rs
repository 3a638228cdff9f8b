//! Orchestration: patients → daily records → tables → files.
//!
//! Patient `i` (1-based) draws from its own stream seeded by
//! `derive_patient_seed(config.seed, i)`. Within a patient the stream is
//! consumed in a fixed order: static traits, medications, then one day at a
//! time in ascending date order.

use std::collections::BTreeMap;
use std::fs;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::config::{ConfigError, GeneratorConfig, APP_NAME, APP_VERSION};
use crate::dataset::{
    retry_write, write_manifest, write_table, CombinedTable, DatasetError, PatientTable,
};
use crate::models::{patient_id, DailyRecord, Patient};
use crate::sampling::{
    assign_medications, patient_rng, sample_day, sample_patient, Distributions, SamplingTables,
};
use crate::sources::{Catalog, NameLists, SourceError};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════
// Generation
// ═══════════════════════════════════════════

/// One patient with every day in the configured range.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPatient {
    pub patient: Patient,
    pub days: Vec<DailyRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub patients: usize,
    pub days_per_patient: usize,
    pub rows: usize,
    /// Patients carrying each condition, keyed by label.
    pub condition_counts: BTreeMap<String, usize>,
    /// Assigned medications per category, keyed by label.
    pub medication_counts: BTreeMap<String, usize>,
    pub blood_pressure_patients: usize,
    pub glucose_patients: usize,
    /// Readings whose timestamp was kept without honouring the minimum gap.
    pub spacing_fallbacks: usize,
}

impl GenerationSummary {
    fn record(&mut self, generated: &GeneratedPatient) {
        let patient = &generated.patient;
        self.patients += 1;
        self.rows += generated.days.len();
        for condition in &patient.conditions {
            *self.condition_counts.entry(condition.to_string()).or_default() += 1;
        }
        for med in &patient.medications {
            *self.medication_counts.entry(med.category.to_string()).or_default() += 1;
        }
        if patient.tracks_blood_pressure() {
            self.blood_pressure_patients += 1;
        }
        if patient.tracks_glucose() {
            self.glucose_patients += 1;
        }
        self.spacing_fallbacks += generated
            .days
            .iter()
            .map(DailyRecord::spacing_fallbacks)
            .sum::<usize>();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub patients: Vec<GeneratedPatient>,
    pub summary: GenerationSummary,
}

/// Everything a generation run reads besides the configuration itself.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub names: NameLists,
    pub catalog: Catalog,
    pub distributions: Distributions,
}

impl Inputs {
    pub fn load(config: &GeneratorConfig) -> Result<Self, GenerateError> {
        let names = NameLists::load(config.male_names.as_deref(), config.female_names.as_deref())?;
        let catalog = Catalog::load(config.catalog.as_deref())?;
        let distributions = Distributions::from_tables(&config.tables)?;
        Ok(Self {
            names,
            catalog,
            distributions,
        })
    }
}

/// Generates patient `index` (1-based) and all of its days.
pub fn generate_patient(config: &GeneratorConfig, inputs: &Inputs, index: usize) -> GeneratedPatient {
    let dists = &inputs.distributions;
    let mut rng = patient_rng(config.seed, index as u64);

    let traits = sample_patient(&mut rng, &inputs.names, dists);
    let medications = assign_medications(
        &mut rng,
        &traits.conditions,
        &inputs.catalog.medications,
        &dists.tables.medications,
    );
    let patient = traits.into_patient(patient_id(index), medications);

    let days = config
        .dates()
        .map(|date| sample_day(&mut rng, &patient, date, dists))
        .collect();

    GeneratedPatient { patient, days }
}

pub fn generate(config: &GeneratorConfig, inputs: &Inputs) -> Dataset {
    let mut summary = GenerationSummary {
        days_per_patient: config.day_count(),
        ..Default::default()
    };
    let mut patients = Vec::with_capacity(config.patient_count);

    for index in 1..=config.patient_count {
        let generated = generate_patient(config, inputs, index);
        tracing::info!(
            patient = %generated.patient.id,
            conditions = generated.patient.conditions.len(),
            medications = generated.patient.medications.len(),
            "Processed patient"
        );
        summary.record(&generated);
        patients.push(generated);
    }

    Dataset { patients, summary }
}

// ═══════════════════════════════════════════
// Output
// ═══════════════════════════════════════════

/// Contents of `generation_manifest.json`.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub generator: &'static str,
    pub version: &'static str,
    pub seed: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub catalog_medications: usize,
    pub catalog_dropped: usize,
    pub combined_file_written: bool,
    pub summary: &'a GenerationSummary,
    pub tables: &'a SamplingTables,
}

/// Writes one file per patient, the combined file, and the manifest.
///
/// Per-patient files are written first and stay on disk even when the
/// combined file cannot be written; that failure is returned after the
/// manifest records it.
pub fn write_outputs(
    config: &GeneratorConfig,
    inputs: &Inputs,
    dataset: &Dataset,
) -> Result<(), GenerateError> {
    let patient_dir = config.patient_dir();
    fs::create_dir_all(&patient_dir).map_err(|source| DatasetError::Io {
        path: patient_dir.clone(),
        source,
    })?;

    let mut combined = CombinedTable::default();
    for generated in &dataset.patients {
        let table = PatientTable::assemble(&generated.patient, &generated.days);
        write_table(&patient_dir.join(table.file_name()), &table.header(), &table.rows)?;
        combined.push(&table);
    }

    let combined_path = config.combined_path();
    let combined_result = retry_write(&config.combined_retry, &combined_path, || {
        write_table(&combined_path, &combined.header(), &combined.rows)
    });
    if let Err(e) = &combined_result {
        tracing::error!(
            error = %e,
            dir = %patient_dir.display(),
            "Combined file not written; per-patient files are still available"
        );
    }

    let manifest = Manifest {
        generator: APP_NAME,
        version: APP_VERSION,
        seed: config.seed,
        start_date: config.start_date,
        end_date: config.end_date,
        catalog_medications: inputs.catalog.medications.len(),
        catalog_dropped: inputs.catalog.dropped,
        combined_file_written: combined_result.is_ok(),
        summary: &dataset.summary,
        tables: &config.tables,
    };
    write_manifest(&config.manifest_path(), &manifest)?;

    combined_result.map_err(GenerateError::from)
}

/// Full run: validate, load inputs, generate, write.
pub fn run_generation(config: &GeneratorConfig) -> Result<GenerationSummary, GenerateError> {
    config.validate()?;
    let inputs = Inputs::load(config)?;

    tracing::info!(
        seed = config.seed,
        patients = config.patient_count,
        start = %config.start_date,
        end = %config.end_date,
        "Generating synthetic patients"
    );
    let dataset = generate(config, &inputs);
    write_outputs(config, &inputs, &dataset)?;

    let summary = dataset.summary;
    tracing::info!(
        patients = summary.patients,
        rows = summary.rows,
        spacing_fallbacks = summary.spacing_fallbacks,
        output = %config.output_dir.display(),
        "Generation complete"
    );
    Ok(summary)
}
