//! Daily Observation Sampler: one `DailyRecord` per (patient, date).
//!
//! Days are independent given the patient's static traits; nothing is
//! carried from one day to the next except the position of the stream.

use chrono::NaiveDate;
use rand::distributions::Distribution;
use rand::seq::index;
use rand::Rng;

use crate::models::{
    DailyRecord, ExerciseDay, ExerciseEntry, ExerciseType, Meal, MealContents, MealType, Mood,
    Patient, SleepQuality, SugarBucket, TimeOfDay, Weather,
};

use super::round1;
use super::tables::Distributions;
use super::vitals::{sample_blood_pressure, sample_glucose};

/// Draw order: mood, weather, sleep, meals, exercise, pain, continence,
/// goal, blood pressure, glucose.
pub fn sample_day<R: Rng>(
    rng: &mut R,
    patient: &Patient,
    date: NaiveDate,
    dists: &Distributions,
) -> DailyRecord {
    let tables = &dists.tables;

    let mood = Mood::ALL.get(dists.mood.sample(rng)).copied();
    let weather = if rng.gen_bool(0.5) { Weather::Good } else { Weather::Bad };
    let sleep_quality = SleepQuality::ALL[rng.gen_range(0..SleepQuality::ALL.len())];
    let sleep_hours = round1(rng.gen_range(tables.sleep_hours_min..=tables.sleep_hours_max));

    let meals: [Meal; 4] = std::array::from_fn(|i| sample_meal(rng, i, dists));
    let exercise = sample_exercise(rng, dists);
    let pain_level = rng.gen_range(0..=tables.pain_level_max);

    let urinary_continence = rng.gen_bool(0.5);
    let fecal_continence = rng.gen_bool(0.5);
    let health_goal_met = rng.gen_bool(0.5);

    let blood_pressure = if patient.tracks_blood_pressure() {
        sample_blood_pressure(rng, dists)
    } else {
        [None; 4]
    };
    let glucose = if patient.tracks_glucose() {
        sample_glucose(rng, dists)
    } else {
        [None; 4]
    };

    DailyRecord {
        date,
        mood,
        weather,
        sleep_quality,
        sleep_hours,
        exercise,
        pain_level,
        pain_location: patient.pain_location,
        meals,
        urinary_continence,
        fecal_continence,
        health_goal_met,
        blood_pressure,
        glucose,
    }
}

/// `slot` indexes `MealType::ALL` and the per-meal tables.
fn sample_meal<R: Rng>(rng: &mut R, slot: usize, dists: &Distributions) -> Meal {
    let tables = &dists.tables;
    let meal_type = MealType::ALL[slot];
    let window = tables.meal_windows[slot];

    let hour = rng.gen_range(window.first_hour..=window.last_hour);
    let minute = rng.gen_range(0..60);
    let time = TimeOfDay::from_hm(hour, minute).unwrap_or_default();

    let contents = if rng.gen_bool(tables.meal_food_probability[slot]) {
        Some(MealContents {
            protein: rng.gen_bool(0.5),
            vegetables: rng.gen_bool(0.5),
            fruit: rng.gen_bool(0.5),
            alcohol: rng.gen_bool(0.5),
            carbohydrates: rng.gen_bool(0.5),
            added_sugar: SugarBucket::ALL[dists.sugar.sample(rng)],
        })
    } else {
        None
    };

    Meal {
        meal_type,
        time,
        contents,
    }
}

fn sample_exercise<R: Rng>(rng: &mut R, dists: &Distributions) -> ExerciseDay {
    let tables = &dists.tables;
    let count = dists.exercise_count.sample(rng) + 1;
    let total_minutes = rng.gen_range(tables.exercise_minutes_min..=tables.exercise_minutes_max);

    let types = index::sample(rng, ExerciseType::ALL.len(), count.min(ExerciseType::ALL.len()));
    let minutes = split_minutes(rng, total_minutes, types.len());

    let entries = types
        .iter()
        .zip(minutes)
        .map(|(i, minutes)| ExerciseEntry {
            exercise_type: ExerciseType::ALL[i],
            minutes,
        })
        .collect();

    ExerciseDay {
        total_minutes,
        entries,
    }
}

/// Splits `total` into `parts` non-negative integers summing to `total`.
///
/// Cut points are drawn independently from `1..total` and sorted, so two
/// equal cuts give a 0-minute entry.
pub fn split_minutes<R: Rng>(rng: &mut R, total: u32, parts: usize) -> Vec<u32> {
    let parts = parts.max(1);
    if parts == 1 {
        return vec![total];
    }
    if total < 2 {
        let mut out = vec![0; parts];
        out[0] = total;
        return out;
    }

    let mut cuts: Vec<u32> = (0..parts - 1).map(|_| rng.gen_range(1..total)).collect();
    cuts.sort_unstable();

    let mut out = Vec::with_capacity(parts);
    let mut prev = 0;
    for cut in cuts.into_iter().chain(std::iter::once(total)) {
        out.push(cut - prev);
        prev = cut;
    }
    out
}
