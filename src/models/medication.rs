use serde::{Deserialize, Serialize};

use super::enums::{MedicationCategory, MedicationType};

/// One catalog entry, and one line of a patient's medication list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub med_type: MedicationType,
    pub category: MedicationCategory,
    pub dosage: String,
}

impl Medication {
    pub fn new(
        name: impl Into<String>,
        med_type: MedicationType,
        category: MedicationCategory,
        dosage: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            med_type,
            category,
            dosage: dosage.into(),
        }
    }
}

/// `"; "`-joined views of a medication list, as repeated on every day row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MedicationSummary {
    pub names: String,
    pub types: String,
    pub categories: String,
    pub dosages: String,
    pub count: usize,
}

impl MedicationSummary {
    pub fn from_list(meds: &[Medication]) -> Self {
        let join = |f: fn(&Medication) -> &str| {
            meds.iter().map(f).collect::<Vec<_>>().join("; ")
        };
        Self {
            names: join(|m| m.name.as_str()),
            types: join(|m| m.med_type.as_str()),
            categories: join(|m| m.category.as_str()),
            dosages: join(|m| m.dosage.as_str()),
            count: meds.len(),
        }
    }
}
