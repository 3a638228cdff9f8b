//! Patient Attribute Sampler: static traits drawn once per patient.

use rand::distributions::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{ChronicCondition, Gender, Medication, PainLocation, Patient};
use crate::sources::NameLists;

use super::tables::{Distributions, SamplingTables};

/// Every patient carries at least this many chronic conditions.
pub const MIN_CONDITIONS: usize = 2;

/// Added, in order, when no condition was drawn at all.
const EMPTY_SET_FALLBACK: [ChronicCondition; 2] =
    [ChronicCondition::Hypertension, ChronicCondition::Osteoarthritis];

/// Preference order for topping up a single-condition patient.
const SECOND_CONDITION_PREFERENCE: [ChronicCondition; 6] = [
    ChronicCondition::Hypertension,
    ChronicCondition::Diabetes,
    ChronicCondition::Osteoarthritis,
    ChronicCondition::Osteoporosis,
    ChronicCondition::MoodAnxietyDisorder,
    ChronicCondition::IschemicHeartDisease,
];

/// Static traits before medications are assigned.
#[derive(Debug, Clone)]
pub struct PatientTraits {
    pub age: u32,
    pub gender: Gender,
    pub name: String,
    pub conditions: Vec<ChronicCondition>,
    pub pain_location: PainLocation,
}

impl PatientTraits {
    pub fn into_patient(self, id: String, medications: Vec<Medication>) -> Patient {
        Patient {
            id,
            age: self.age,
            gender: self.gender,
            name: self.name,
            conditions: self.conditions,
            pain_location: self.pain_location,
            medications,
        }
    }
}

/// Draws one patient's traits. Draw order: conditions, age, gender, name, pain location.
pub fn sample_patient<R: Rng>(
    rng: &mut R,
    names: &NameLists,
    dists: &Distributions,
) -> PatientTraits {
    let conditions = sample_conditions(rng, &dists.tables);

    let age_draw: f64 = dists.age.sample(rng);
    let age = age_draw.max(f64::from(dists.tables.age.floor)) as u32;

    let gender = if rng.gen_bool(0.5) { Gender::Male } else { Gender::Female };
    let name = names
        .for_gender(gender)
        .choose(rng)
        .cloned()
        .unwrap_or_default();

    let pain_location = *PainLocation::ALL
        .choose(rng)
        .unwrap_or(&PainLocation::Back);

    PatientTraits {
        age,
        gender,
        name,
        conditions,
        pain_location,
    }
}

/// Independent inclusion per condition at its prevalence, then topped up to
/// `MIN_CONDITIONS`.
pub fn sample_conditions<R: Rng>(rng: &mut R, tables: &SamplingTables) -> Vec<ChronicCondition> {
    let mut conditions: Vec<ChronicCondition> = ChronicCondition::ALL
        .iter()
        .zip(tables.condition_prevalence)
        .filter(|(_, p)| rng.gen_bool(*p))
        .map(|(c, _)| *c)
        .collect();

    ensure_minimum_conditions(&mut conditions);
    conditions
}

/// Deterministic top-up. Each pool is walked once, so this always terminates,
/// and each pool holds enough entries not already present to reach the floor.
pub fn ensure_minimum_conditions(conditions: &mut Vec<ChronicCondition>) {
    let pool: &[ChronicCondition] = if conditions.is_empty() {
        &EMPTY_SET_FALLBACK
    } else {
        &SECOND_CONDITION_PREFERENCE
    };

    for candidate in pool {
        if conditions.len() >= MIN_CONDITIONS {
            break;
        }
        if !conditions.contains(candidate) {
            conditions.push(*candidate);
        }
    }
}
