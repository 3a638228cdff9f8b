//! Probability tables and distribution parameters for every sampler.
//!
//! `SamplingTables` is the serialisable, user-editable form (part of
//! `GeneratorConfig`). `Distributions` is the compiled form: validated once,
//! after which no sampler can fail.

use rand::distributions::WeightedIndex;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::models::{EXERCISE_SLOTS, READING_SLOTS};

use super::EXPONENTIAL_DECAY_WEIGHTS;

// ═══════════════════════════════════════════
// Serialisable tables
// ═══════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    pub mean: f64,
    pub sd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClippedGaussian {
    pub mean: f64,
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeModel {
    pub mean: f64,
    pub sd: f64,
    pub floor: u32,
}

/// Inclusive hour window for a meal; the minute is drawn from 0..=59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealWindow {
    pub first_hour: u16,
    pub last_hour: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedicationRules {
    pub per_category_cap: usize,
    /// Final keep probability for an eligible candidate.
    pub retention: f64,
    /// "Other" category when COPD or asthma is present.
    pub respiratory_other: f64,
    /// "Other" or vitamins when cancer is present.
    pub cancer_other_or_vitamins: f64,
    pub vitamins_baseline: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureModel {
    pub systolic: Gaussian,
    pub diastolic: Gaussian,
    /// Minimum systolic minus diastolic.
    pub min_gap: i32,
    /// Replacement diastolic when the gap cap still leaves it at or above systolic.
    pub diastolic_floor: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlucoseModel {
    pub pre_meal: ClippedGaussian,
    pub post_meal: ClippedGaussian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingRule {
    pub min_minutes: u16,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingTables {
    pub age: AgeModel,
    /// Indexed like `ChronicCondition::ALL`.
    pub condition_prevalence: [f64; 10],
    /// happy, sad, angry, contempt, neutral.
    pub mood_weights: [f64; 5],
    /// Number of exercise entries, 1..=5.
    pub exercise_count_weights: [f64; EXERCISE_SLOTS],
    /// Number of BP or glucose readings, 1..=4.
    pub reading_count_weights: [f64; READING_SLOTS],
    /// Indexed like `SugarBucket::ALL`.
    pub sugar_weights: [f64; 5],
    /// Indexed like `MealType::ALL`.
    pub meal_windows: [MealWindow; 4],
    pub meal_food_probability: [f64; 4],
    pub sleep_hours_min: f64,
    pub sleep_hours_max: f64,
    pub exercise_minutes_min: u32,
    pub exercise_minutes_max: u32,
    pub pain_level_max: u8,
    pub medications: MedicationRules,
    pub blood_pressure: BloodPressureModel,
    pub glucose: GlucoseModel,
    pub spacing: SpacingRule,
}

impl Default for SamplingTables {
    fn default() -> Self {
        Self {
            age: AgeModel { mean: 69.0, sd: 3.1, floor: 65 },
            // CCHS 2017-2018 prevalence among seniors.
            condition_prevalence: [0.657, 0.52, 0.38, 0.27, 0.268, 0.251, 0.215, 0.202, 0.107, 0.105],
            mood_weights: [0.25, 0.15, 0.10, 0.10, 0.40],
            exercise_count_weights: EXPONENTIAL_DECAY_WEIGHTS,
            reading_count_weights: [0.516, 0.258, 0.129, 0.097],
            sugar_weights: EXPONENTIAL_DECAY_WEIGHTS,
            meal_windows: [
                MealWindow { first_hour: 6, last_hour: 11 },
                MealWindow { first_hour: 11, last_hour: 15 },
                MealWindow { first_hour: 16, last_hour: 22 },
                MealWindow { first_hour: 22, last_hour: 23 },
            ],
            meal_food_probability: [1.0, 0.9, 1.0, 0.1],
            sleep_hours_min: 1.0,
            sleep_hours_max: 10.0,
            exercise_minutes_min: 5,
            exercise_minutes_max: 29,
            pain_level_max: 10,
            medications: MedicationRules {
                per_category_cap: 2,
                retention: 0.9,
                respiratory_other: 0.6,
                cancer_other_or_vitamins: 0.7,
                vitamins_baseline: 0.7,
            },
            blood_pressure: BloodPressureModel {
                systolic: Gaussian { mean: 130.0, sd: 15.0 },
                diastolic: Gaussian { mean: 85.0, sd: 10.0 },
                min_gap: 10,
                diastolic_floor: 40,
            },
            glucose: GlucoseModel {
                pre_meal: ClippedGaussian { mean: 6.0, sd: 1.5, min: 3.0, max: 9.0 },
                post_meal: ClippedGaussian { mean: 7.5, sd: 2.0, min: 4.0, max: 12.0 },
            },
            spacing: SpacingRule { min_minutes: 60, max_attempts: 50 },
        }
    }
}

impl SamplingTables {
    /// Checks every bound the samplers rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = self
            .condition_prevalence
            .iter()
            .chain(self.meal_food_probability.iter())
            .chain([
                &self.medications.retention,
                &self.medications.respiratory_other,
                &self.medications.cancer_other_or_vitamins,
                &self.medications.vitamins_baseline,
            ]);
        for p in probabilities {
            if !(0.0..=1.0).contains(p) {
                return Err(invalid(format!("probability {p} outside [0, 1]")));
            }
        }

        if !(self.sleep_hours_min.is_finite()
            && self.sleep_hours_max.is_finite()
            && self.sleep_hours_min <= self.sleep_hours_max)
        {
            return Err(invalid("sleep hours range must be finite and ordered"));
        }
        if self.exercise_minutes_min > self.exercise_minutes_max {
            return Err(invalid("exercise minutes range must be ordered"));
        }
        if self.exercise_minutes_min == 0 {
            return Err(invalid("exercise_minutes_min must be at least 1"));
        }
        for w in &self.meal_windows {
            if w.first_hour > w.last_hour || w.last_hour > 23 {
                return Err(invalid(format!(
                    "meal window {}..={} must be ordered within 0..=23",
                    w.first_hour, w.last_hour
                )));
            }
        }
        if self.medications.per_category_cap == 0 {
            return Err(invalid("per_category_cap must be at least 1"));
        }

        let gaussians = [
            ("age", self.age.sd),
            ("systolic", self.blood_pressure.systolic.sd),
            ("diastolic", self.blood_pressure.diastolic.sd),
            ("pre-meal glucose", self.glucose.pre_meal.sd),
            ("post-meal glucose", self.glucose.post_meal.sd),
        ];
        for (name, sd) in gaussians {
            if !(sd.is_finite() && sd > 0.0) {
                return Err(invalid(format!("{name} standard deviation must be positive")));
            }
        }
        for (name, g) in [("pre-meal", self.glucose.pre_meal), ("post-meal", self.glucose.post_meal)] {
            if !(g.min <= g.max) {
                return Err(invalid(format!("{name} glucose clip range must be ordered")));
            }
        }
        if self.blood_pressure.min_gap < 0 {
            return Err(invalid("blood pressure min_gap must not be negative"));
        }
        if self.spacing.max_attempts == 0 {
            return Err(invalid("spacing max_attempts must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

// ═══════════════════════════════════════════
// Compiled distributions
// ═══════════════════════════════════════════

/// Validated tables plus ready-to-sample distributions.
#[derive(Debug, Clone)]
pub struct Distributions {
    pub tables: SamplingTables,
    pub(crate) age: Normal<f64>,
    pub(crate) mood: WeightedIndex<f64>,
    pub(crate) exercise_count: WeightedIndex<f64>,
    pub(crate) reading_count: WeightedIndex<f64>,
    pub(crate) sugar: WeightedIndex<f64>,
    pub(crate) systolic: Normal<f64>,
    pub(crate) diastolic: Normal<f64>,
    pub(crate) glucose_pre: Normal<f64>,
    pub(crate) glucose_post: Normal<f64>,
}

impl Distributions {
    pub fn from_tables(tables: &SamplingTables) -> Result<Self, ConfigError> {
        tables.validate()?;

        let weighted = |name: &str, w: &[f64]| {
            WeightedIndex::new(w).map_err(|e| invalid(format!("{name} weights: {e}")))
        };
        let normal = |name: &str, mean: f64, sd: f64| {
            Normal::new(mean, sd).map_err(|e| invalid(format!("{name} distribution: {e}")))
        };
        let bp = &tables.blood_pressure;
        let glucose = &tables.glucose;

        Ok(Self {
            age: normal("age", tables.age.mean, tables.age.sd)?,
            mood: weighted("mood", &tables.mood_weights)?,
            exercise_count: weighted("exercise count", &tables.exercise_count_weights)?,
            reading_count: weighted("reading count", &tables.reading_count_weights)?,
            sugar: weighted("added sugar", &tables.sugar_weights)?,
            systolic: normal("systolic", bp.systolic.mean, bp.systolic.sd)?,
            diastolic: normal("diastolic", bp.diastolic.mean, bp.diastolic.sd)?,
            glucose_pre: normal("pre-meal glucose", glucose.pre_meal.mean, glucose.pre_meal.sd)?,
            glucose_post: normal("post-meal glucose", glucose.post_meal.mean, glucose.post_meal.sd)?,
            tables: tables.clone(),
        })
    }

    pub fn standard() -> Self {
        // The defaults are covered by `default_tables_compile`.
        Self::from_tables(&SamplingTables::default()).expect("default sampling tables are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChronicCondition;

    #[test]
    fn default_tables_compile() {
        assert!(Distributions::from_tables(&SamplingTables::default()).is_ok());
    }

    #[test]
    fn prevalence_table_matches_condition_order() {
        let tables = SamplingTables::default();
        assert_eq!(tables.condition_prevalence.len(), ChronicCondition::ALL.len());
        assert_eq!(ChronicCondition::ALL[0], ChronicCondition::Hypertension);
        assert_eq!(tables.condition_prevalence[0], 0.657);
        assert_eq!(ChronicCondition::ALL[9], ChronicCondition::MoodAnxietyDisorder);
        assert_eq!(tables.condition_prevalence[9], 0.105);
        for p in tables.condition_prevalence {
            assert!((0.105..=0.657).contains(&p));
        }
    }

    #[test]
    fn rejects_probability_above_one() {
        let mut tables = SamplingTables::default();
        tables.meal_food_probability[1] = 1.2;
        assert!(matches!(tables.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_all_zero_weights() {
        let mut tables = SamplingTables::default();
        tables.mood_weights = [0.0; 5];
        let err = Distributions::from_tables(&tables).unwrap_err();
        assert!(err.to_string().contains("mood"));
    }

    #[test]
    fn rejects_zero_exercise_budget() {
        let mut tables = SamplingTables::default();
        tables.exercise_minutes_min = 0;
        assert!(tables.validate().is_err());
        tables.exercise_minutes_min = 1;
        assert!(tables.validate().is_ok());
    }

    #[test]
    fn rejects_meal_window_past_midnight() {
        let mut tables = SamplingTables::default();
        tables.meal_windows[3].last_hour = 24;
        assert!(tables.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_sd() {
        let mut tables = SamplingTables::default();
        tables.blood_pressure.systolic.sd = 0.0;
        assert!(tables.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tables: SamplingTables =
            serde_json::from_str(r#"{"mood_weights": [1, 1, 1, 1, 1]}"#).unwrap();
        assert_eq!(tables.mood_weights, [1.0; 5]);
        assert_eq!(tables.exercise_minutes_max, 29);
    }
}
