//! Medication catalog text format.
//!
//! ```text
//! ===Heart health and hypertension===
//! Lisinopril
//! Type: Prescribed
//! Category: Heart health and hypertension
//! Dose: 10 mg once daily
//! ```
//!
//! A line without a colon starts a new block. Blank lines, a bare
//! `Medications` title and `===…===` section lines are ignored. Blocks
//! missing a field, or with an unknown type/category, are dropped.

use std::path::Path;

use serde::Serialize;

use crate::models::{Medication, MedicationCategory, MedicationType};

use super::SourceError;

/// Bundled catalog used when no catalog file is configured.
pub const BUILTIN_CATALOG: &str = include_str!("../../data/medications.txt");

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub medications: Vec<Medication>,
    /// Blocks discarded for missing or unrecognised fields.
    pub dropped: usize,
}

impl Catalog {
    pub fn load(path: Option<&Path>) -> Result<Self, SourceError> {
        let catalog = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| SourceError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let catalog = parse_catalog(&text);
                if catalog.medications.is_empty() {
                    return Err(SourceError::EmptyCatalog(path.to_path_buf()));
                }
                tracing::info!(
                    path = %path.display(),
                    medications = catalog.medications.len(),
                    dropped = catalog.dropped,
                    "Loaded medication catalog"
                );
                catalog
            }
            None => builtin_catalog(),
        };
        Ok(catalog)
    }
}

pub fn builtin_catalog() -> Catalog {
    parse_catalog(BUILTIN_CATALOG)
}

#[derive(Debug, Default)]
struct PendingBlock {
    name: String,
    med_type: Option<String>,
    category: Option<String>,
    dose: Option<String>,
}

impl PendingBlock {
    fn finish(self) -> Option<Medication> {
        let med_type = MedicationType::from_label_ignore_case(self.med_type.as_deref()?)?;
        let category = MedicationCategory::from_label_ignore_case(self.category.as_deref()?)?;
        let dose = self.dose.filter(|d| !d.is_empty())?;
        if self.name.is_empty() {
            return None;
        }
        Some(Medication::new(self.name, med_type, category, dose))
    }
}

pub fn parse_catalog(text: &str) -> Catalog {
    let mut catalog = Catalog::default();
    let mut pending: Option<PendingBlock> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line == "Medications" || is_section_header(line) {
            continue;
        }

        match line.split_once(':') {
            None => {
                flush_block(pending.take(), &mut catalog);
                pending = Some(PendingBlock {
                    name: line.to_string(),
                    ..Default::default()
                });
            }
            Some((key, value)) => {
                let Some(block) = pending.as_mut() else { continue };
                let value = Some(value.trim().to_string());
                match key.trim() {
                    "Type" => block.med_type = value,
                    "Category" => block.category = value,
                    "Dose" => block.dose = value,
                    _ => {}
                }
            }
        }
    }
    flush_block(pending.take(), &mut catalog);

    catalog
}

fn flush_block(block: Option<PendingBlock>, catalog: &mut Catalog) {
    let Some(block) = block else { return };
    let name = block.name.clone();
    match block.finish() {
        Some(med) => catalog.medications.push(med),
        None => {
            tracing::debug!(medication = %name, "Dropping incomplete catalog entry");
            catalog.dropped += 1;
        }
    }
}

fn is_section_header(line: &str) -> bool {
    line.starts_with("===") && line.ends_with("===")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_complete_blocks() {
        let text = "Medications\n\n===Heart===\nLisinopril\nType: Prescribed\nCategory: Heart health and hypertension\nDose: 10 mg once daily\n\nVitamin D\nType: Supplement\nCategory: Vitamins and supplements\nDose: 1000 IU once daily\n";
        let catalog = parse_catalog(text);
        assert_eq!(catalog.dropped, 0);
        assert_eq!(catalog.medications.len(), 2);
        assert_eq!(catalog.medications[0].name, "Lisinopril");
        assert_eq!(catalog.medications[0].category, MedicationCategory::HeartHypertension);
        assert_eq!(catalog.medications[1].dosage, "1000 IU once daily");
        assert_eq!(catalog.medications[1].med_type, MedicationType::Supplement);
    }

    #[test]
    fn drops_block_missing_dose() {
        let text = "Lisinopril\nType: Prescribed\nCategory: Heart health and hypertension\n\nMetformin\nType: Prescribed\nCategory: Diabetes (oral or injectable)\nDose: 500 mg twice daily\n";
        let catalog = parse_catalog(text);
        assert_eq!(catalog.dropped, 1);
        assert_eq!(catalog.medications.len(), 1);
        assert_eq!(catalog.medications[0].name, "Metformin");
    }

    #[test]
    fn drops_unknown_category() {
        let text = "Melatonin\nType: Supplement\nCategory: Sleep aids\nDose: 3 mg at bedtime\n";
        let catalog = parse_catalog(text);
        assert_eq!(catalog.dropped, 1);
        assert!(catalog.medications.is_empty());
    }

    #[test]
    fn dose_value_keeps_later_colons() {
        let text = "Insulin\nType: Scheduled\nCategory: Diabetes (oral or injectable)\nDose: 10 units at 22:00\n";
        let catalog = parse_catalog(text);
        assert_eq!(catalog.medications[0].dosage, "10 units at 22:00");
    }

    #[test]
    fn fields_before_any_name_are_ignored() {
        let text = "Type: Prescribed\nDose: 5 mg\nAmlodipine\nType: prescribed\nCategory: heart health and hypertension\nDose: 5 mg once daily\n";
        let catalog = parse_catalog(text);
        assert_eq!(catalog.dropped, 0);
        assert_eq!(catalog.medications.len(), 1);
        assert_eq!(catalog.medications[0].med_type, MedicationType::Prescribed);
    }

    #[test]
    fn builtin_catalog_covers_every_category() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.dropped, 0);
        for category in MedicationCategory::ALL {
            assert!(
                catalog.medications.iter().filter(|m| m.category == *category).count() >= 3,
                "{category} under-represented"
            );
        }
    }

    #[test]
    fn load_without_path_uses_builtin() {
        assert_eq!(Catalog::load(None).unwrap(), builtin_catalog());
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(Some(dir.path().join("meds.txt").as_path())).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }

    #[test]
    fn load_file_without_entries_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Medications\n===Other===").unwrap();
        let err = Catalog::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, SourceError::EmptyCatalog(_)));
    }
}
