//! Medication Assignment Engine: condition set + catalog → bounded medication list.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{ChronicCondition, Medication, MedicationCategory, MedicationType};

use super::tables::MedicationRules;

/// Condition flags the eligibility rules look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ConditionFlags {
    cardiac: bool,
    diabetes: bool,
    pain: bool,
    mood: bool,
    respiratory: bool,
    cancer: bool,
}

impl ConditionFlags {
    fn from_conditions(conditions: &[ChronicCondition]) -> Self {
        let has = |c| conditions.contains(&c);
        Self {
            cardiac: has(ChronicCondition::Hypertension)
                || has(ChronicCondition::IschemicHeartDisease),
            diabetes: has(ChronicCondition::Diabetes),
            pain: has(ChronicCondition::Osteoarthritis) || has(ChronicCondition::Osteoporosis),
            mood: has(ChronicCondition::MoodAnxietyDisorder),
            respiratory: has(ChronicCondition::Copd) || has(ChronicCondition::Asthma),
            cancer: has(ChronicCondition::Cancer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Eligibility {
    Never,
    Always,
    WithProbability(f64),
}

/// First matching rule wins. For "Other", respiratory is checked before cancer.
fn eligibility(
    category: MedicationCategory,
    flags: ConditionFlags,
    rules: &MedicationRules,
) -> Eligibility {
    use MedicationCategory as Cat;

    match category {
        Cat::HeartHypertension if flags.cardiac => Eligibility::Always,
        Cat::Diabetes if flags.diabetes => Eligibility::Always,
        Cat::ChronicPain if flags.pain => Eligibility::Always,
        Cat::MentalHealth if flags.mood => Eligibility::Always,
        Cat::Other if flags.respiratory => Eligibility::WithProbability(rules.respiratory_other),
        Cat::Other | Cat::VitaminsSupplements if flags.cancer => {
            Eligibility::WithProbability(rules.cancer_other_or_vitamins)
        }
        Cat::VitaminsSupplements => Eligibility::WithProbability(rules.vitamins_baseline),
        _ => Eligibility::Never,
    }
}

/// Walks a per-call shuffle of `catalog` once, keeping eligible candidates
/// (subject to the retention draw) until each category reaches its cap.
/// Never returns an empty list.
pub fn assign_medications<R: Rng>(
    rng: &mut R,
    conditions: &[ChronicCondition],
    catalog: &[Medication],
    rules: &MedicationRules,
) -> Vec<Medication> {
    let flags = ConditionFlags::from_conditions(conditions);

    let mut candidates: Vec<&Medication> = catalog.iter().collect();
    candidates.shuffle(rng);

    let mut assigned = Vec::new();
    let mut per_category: BTreeMap<MedicationCategory, usize> = BTreeMap::new();

    for med in candidates {
        let count = per_category.entry(med.category).or_insert(0);
        if *count >= rules.per_category_cap {
            continue;
        }

        let eligible = match eligibility(med.category, flags, rules) {
            Eligibility::Never => false,
            Eligibility::Always => true,
            Eligibility::WithProbability(p) => rng.gen_bool(p),
        };

        if eligible && rng.gen_bool(rules.retention) {
            assigned.push(med.clone());
            *count += 1;
        }
    }

    if assigned.is_empty() {
        assigned.push(default_medication(flags));
    }
    assigned
}

/// Single fallback medication, by condition priority.
fn default_medication(flags: ConditionFlags) -> Medication {
    use MedicationCategory as Cat;
    use MedicationType::{Prescribed, Supplement};

    if flags.cardiac {
        Medication::new("Lisinopril", Prescribed, Cat::HeartHypertension, "10 mg once daily")
    } else if flags.diabetes {
        Medication::new("Metformin", Prescribed, Cat::Diabetes, "500 mg twice daily")
    } else if flags.pain {
        Medication::new("Ibuprofen", Prescribed, Cat::ChronicPain, "400 mg as needed")
    } else if flags.mood {
        Medication::new("Sertraline", Prescribed, Cat::MentalHealth, "50 mg once daily")
    } else {
        Medication::new("Vitamin D", Supplement, Cat::VitaminsSupplements, "1000 IU once daily")
    }
}
