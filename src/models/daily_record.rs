//! One day of observations for one patient.
//!
//! Repeated measurements live in fixed-size slot arrays of `Option`. An empty
//! slot stays `None` here; zero/empty sentinel cells only appear when the
//! record is flattened into a table row (see `dataset::assembler`).

use chrono::NaiveDate;
use serde::Serialize;

use super::enums::{
    BpRisk, ExerciseType, GlucoseMeasurement, GlucoseRange, MealType, Mood,
    PainLocation, SleepQuality, SugarBucket, Weather,
};
use super::time_of_day::TimeOfDay;

/// Maximum exercise entries per day.
pub const EXERCISE_SLOTS: usize = 5;
/// Maximum blood pressure or glucose readings per day.
pub const READING_SLOTS: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// `None` is a neutral day.
    pub mood: Option<Mood>,
    pub weather: Weather,
    pub sleep_quality: SleepQuality,
    pub sleep_hours: f64,
    pub exercise: ExerciseDay,
    pub pain_level: u8,
    pub pain_location: PainLocation,
    pub meals: [Meal; 4],
    pub urinary_continence: bool,
    pub fecal_continence: bool,
    pub health_goal_met: bool,
    pub blood_pressure: [Option<BloodPressureReading>; READING_SLOTS],
    pub glucose: [Option<GlucoseReading>; READING_SLOTS],
}

impl DailyRecord {
    pub fn blood_pressure_readings(&self) -> impl Iterator<Item = &BloodPressureReading> {
        self.blood_pressure.iter().flatten()
    }

    pub fn glucose_readings(&self) -> impl Iterator<Item = &GlucoseReading> {
        self.glucose.iter().flatten()
    }

    /// Readings whose timestamp was accepted without the minimum spacing.
    pub fn spacing_fallbacks(&self) -> usize {
        self.blood_pressure_readings()
            .map(|r| r.spacing)
            .chain(self.glucose_readings().map(|r| r.spacing))
            .filter(|s| *s == Spacing::Fallback)
            .count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseDay {
    pub total_minutes: u32,
    /// Between 1 and `EXERCISE_SLOTS` entries, distinct types.
    pub entries: Vec<ExerciseEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExerciseEntry {
    pub exercise_type: ExerciseType,
    pub minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meal {
    pub meal_type: MealType,
    pub time: TimeOfDay,
    /// `None` when nothing was eaten.
    pub contents: Option<MealContents>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MealContents {
    pub protein: bool,
    pub vegetables: bool,
    pub fruit: bool,
    pub alcohol: bool,
    pub carbohydrates: bool,
    pub added_sugar: SugarBucket,
}

/// Whether a reading's timestamp honours the minimum gap to earlier readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    Spaced,
    /// Attempts ran out; the last candidate was accepted as-is.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BloodPressureReading {
    pub systolic: i32,
    pub diastolic: i32,
    pub systolic_risk: BpRisk,
    pub diastolic_risk: BpRisk,
    pub time: TimeOfDay,
    pub spacing: Spacing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlucoseReading {
    /// mmol/L, one decimal.
    pub value: f64,
    pub measurement: GlucoseMeasurement,
    pub range: GlucoseRange,
    pub time: TimeOfDay,
    pub spacing: Spacing,
}
