use serde::Serialize;

use super::enums::{ChronicCondition, Gender, PainLocation};
use super::medication::{Medication, MedicationSummary};

/// Static per-patient traits. Sampled once, never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Patient {
    /// Sequential, zero-padded (`"001"`).
    pub id: String,
    pub age: u32,
    pub gender: Gender,
    pub name: String,
    /// At least two entries, no duplicates, in assignment order.
    pub conditions: Vec<ChronicCondition>,
    pub pain_location: PainLocation,
    pub medications: Vec<Medication>,
}

impl Patient {
    pub fn has(&self, condition: ChronicCondition) -> bool {
        self.conditions.contains(&condition)
    }

    /// Blood pressure is tracked for hypertension or ischemic heart disease.
    pub fn tracks_blood_pressure(&self) -> bool {
        self.has(ChronicCondition::Hypertension) || self.has(ChronicCondition::IschemicHeartDisease)
    }

    /// Glucose is tracked for diabetes only.
    pub fn tracks_glucose(&self) -> bool {
        self.has(ChronicCondition::Diabetes)
    }

    pub fn conditions_label(&self) -> String {
        self.conditions
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn medication_summary(&self) -> MedicationSummary {
        MedicationSummary::from_list(&self.medications)
    }
}

/// Formats a 1-based patient index as a zero-padded identifier.
pub fn patient_id(index: usize) -> String {
    format!("{index:03}")
}
