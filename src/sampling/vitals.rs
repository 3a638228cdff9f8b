//! Blood pressure and glucose readings: count, spaced timestamps, values, bands.

use rand::distributions::Distribution;
use rand::Rng;

use crate::models::{
    BloodPressureReading, BpRisk, GlucoseMeasurement, GlucoseRange, GlucoseReading, Spacing,
    TimeOfDay, READING_SLOTS,
};

use super::round1;
use super::tables::{BloodPressureModel, Distributions, SpacingRule};

// ═══════════════════════════════════════════
// Classification
// ═══════════════════════════════════════════

/// Systolic bands: <90 low, 90..=120 ideal, 121..=140 pre-high, >140 high.
pub fn classify_systolic(systolic: i32) -> BpRisk {
    match systolic {
        i32::MIN..=89 => BpRisk::Low,
        90..=120 => BpRisk::Ideal,
        121..=140 => BpRisk::PreHigh,
        _ => BpRisk::High,
    }
}

/// Diastolic bands: <60 low, 60..=80 ideal, 81..=90 pre-high, >90 high.
pub fn classify_diastolic(diastolic: i32) -> BpRisk {
    match diastolic {
        i32::MIN..=59 => BpRisk::Low,
        60..=80 => BpRisk::Ideal,
        81..=90 => BpRisk::PreHigh,
        _ => BpRisk::High,
    }
}

/// Pre-meal target 4.0–7.0 mmol/L, two hours post-meal 5.0–10.0, bounds inclusive.
pub fn classify_glucose(value: f64, measurement: GlucoseMeasurement) -> GlucoseRange {
    let (low, high) = match measurement {
        GlucoseMeasurement::PreMeal => (4.0, 7.0),
        GlucoseMeasurement::PostMeal => (5.0, 10.0),
    };
    if value < low {
        GlucoseRange::Below
    } else if value <= high {
        GlucoseRange::InRange
    } else {
        GlucoseRange::Above
    }
}

// ═══════════════════════════════════════════
// Timestamps
// ═══════════════════════════════════════════

/// Draws `count` times of day, each at least `rule.min_minutes` (around the
/// clock) from every earlier spaced time. A reading that cannot be placed in
/// `rule.max_attempts` draws keeps its last candidate and is marked
/// `Spacing::Fallback`; fallback times do not constrain later readings.
pub fn spaced_timestamps<R: Rng>(
    rng: &mut R,
    count: usize,
    rule: &SpacingRule,
) -> Vec<(TimeOfDay, Spacing)> {
    let mut placed: Vec<TimeOfDay> = Vec::with_capacity(count);
    let mut out = Vec::with_capacity(count);

    for _ in 0..count {
        let mut outcome = None;
        let mut last = random_time(rng);

        for attempt in 0..rule.max_attempts {
            if attempt > 0 {
                last = random_time(rng);
            }
            let clear = placed
                .iter()
                .all(|t| t.circular_distance(last) >= rule.min_minutes);
            if clear {
                outcome = Some((last, Spacing::Spaced));
                break;
            }
        }

        match outcome {
            Some((time, spacing)) => {
                placed.push(time);
                out.push((time, spacing));
            }
            None => {
                tracing::debug!(
                    time = %last,
                    attempts = rule.max_attempts,
                    "Reading spacing not satisfied, keeping last candidate"
                );
                out.push((last, Spacing::Fallback));
            }
        }
    }
    out
}

fn random_time<R: Rng>(rng: &mut R) -> TimeOfDay {
    let hour = rng.gen_range(0..24u16);
    let minute = rng.gen_range(0..60u16);
    TimeOfDay::from_hm(hour, minute).unwrap_or_default()
}

fn reading_count<R: Rng>(rng: &mut R, dists: &Distributions) -> usize {
    dists.reading_count.sample(rng) + 1
}

// ═══════════════════════════════════════════
// Blood pressure
// ═══════════════════════════════════════════

/// Caps diastolic at `systolic - min_gap`. Only when the cap still leaves
/// diastolic at or above systolic is it replaced by `diastolic_floor`.
/// Systolic is never changed.
pub fn enforce_pulse_pressure(systolic: i32, diastolic: i32, model: &BloodPressureModel) -> (i32, i32) {
    let mut diastolic = diastolic.min(systolic - model.min_gap);
    if diastolic >= systolic {
        diastolic = model.diastolic_floor;
    }
    (systolic, diastolic)
}

/// 1–4 readings for a patient whose conditions call for BP tracking.
pub fn sample_blood_pressure<R: Rng>(
    rng: &mut R,
    dists: &Distributions,
) -> [Option<BloodPressureReading>; READING_SLOTS] {
    let count = reading_count(rng, dists);
    let times = spaced_timestamps(rng, count, &dists.tables.spacing);
    let model = &dists.tables.blood_pressure;

    let mut slots = [None; READING_SLOTS];
    for (slot, (time, spacing)) in slots.iter_mut().zip(times) {
        let raw_systolic: f64 = dists.systolic.sample(rng);
        let raw_diastolic: f64 = dists.diastolic.sample(rng);
        let (systolic, diastolic) =
            enforce_pulse_pressure(raw_systolic as i32, raw_diastolic as i32, model);

        *slot = Some(BloodPressureReading {
            systolic,
            diastolic,
            systolic_risk: classify_systolic(systolic),
            diastolic_risk: classify_diastolic(diastolic),
            time,
            spacing,
        });
    }
    slots
}

// ═══════════════════════════════════════════
// Glucose
// ═══════════════════════════════════════════

/// 1–4 readings for a diabetic patient.
pub fn sample_glucose<R: Rng>(
    rng: &mut R,
    dists: &Distributions,
) -> [Option<GlucoseReading>; READING_SLOTS] {
    let count = reading_count(rng, dists);
    let times = spaced_timestamps(rng, count, &dists.tables.spacing);
    let model = &dists.tables.glucose;

    let mut slots = [None; READING_SLOTS];
    for (slot, (time, spacing)) in slots.iter_mut().zip(times) {
        let measurement = if rng.gen_bool(0.5) {
            GlucoseMeasurement::PreMeal
        } else {
            GlucoseMeasurement::PostMeal
        };
        let (draw, bounds): (f64, _) = match measurement {
            GlucoseMeasurement::PreMeal => (dists.glucose_pre.sample(rng), model.pre_meal),
            GlucoseMeasurement::PostMeal => (dists.glucose_post.sample(rng), model.post_meal),
        };
        let value = round1(draw.clamp(bounds.min, bounds.max));

        *slot = Some(GlucoseReading {
            value,
            measurement,
            range: classify_glucose(value, measurement),
            time,
            spacing,
        });
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::patient_rng;

    #[test]
    fn systolic_thresholds() {
        assert_eq!(classify_systolic(89), BpRisk::Low);
        assert_eq!(classify_systolic(90), BpRisk::Ideal);
        assert_eq!(classify_systolic(120), BpRisk::Ideal);
        assert_eq!(classify_systolic(121), BpRisk::PreHigh);
        assert_eq!(classify_systolic(140), BpRisk::PreHigh);
        assert_eq!(classify_systolic(141), BpRisk::High);
    }

    #[test]
    fn diastolic_thresholds() {
        assert_eq!(classify_diastolic(59), BpRisk::Low);
        assert_eq!(classify_diastolic(60), BpRisk::Ideal);
        assert_eq!(classify_diastolic(80), BpRisk::Ideal);
        assert_eq!(classify_diastolic(81), BpRisk::PreHigh);
        assert_eq!(classify_diastolic(90), BpRisk::PreHigh);
        assert_eq!(classify_diastolic(91), BpRisk::High);
    }

    #[test]
    fn glucose_thresholds() {
        use GlucoseMeasurement::*;
        assert_eq!(classify_glucose(6.5, PreMeal), GlucoseRange::InRange);
        assert_eq!(classify_glucose(7.5, PreMeal), GlucoseRange::Above);
        assert_eq!(classify_glucose(3.9, PreMeal), GlucoseRange::Below);
        assert_eq!(classify_glucose(4.0, PreMeal), GlucoseRange::InRange);
        assert_eq!(classify_glucose(7.0, PreMeal), GlucoseRange::InRange);
        assert_eq!(classify_glucose(4.9, PostMeal), GlucoseRange::Below);
        assert_eq!(classify_glucose(7.5, PostMeal), GlucoseRange::InRange);
        assert_eq!(classify_glucose(10.0, PostMeal), GlucoseRange::InRange);
        assert_eq!(classify_glucose(10.1, PostMeal), GlucoseRange::Above);
    }

    #[test]
    fn pulse_pressure_is_enforced() {
        let model = Distributions::standard().tables.blood_pressure;
        assert_eq!(enforce_pulse_pressure(130, 85, &model), (130, 85));
        assert_eq!(enforce_pulse_pressure(110, 105, &model), (110, 100));
        // Low diastolic values pass through untouched.
        assert_eq!(enforce_pulse_pressure(120, 35, &model), (120, 35));
        assert_eq!(enforce_pulse_pressure(45, 44, &model), (45, 35));
    }

    #[test]
    fn floor_applies_only_when_cap_leaves_no_gap() {
        let mut model = Distributions::standard().tables.blood_pressure;
        model.min_gap = 0;
        assert_eq!(enforce_pulse_pressure(120, 125, &model), (120, 40));
        assert_eq!(enforce_pulse_pressure(120, 119, &model), (120, 119));
    }

    #[test]
    fn blood_pressure_invariants_hold() {
        let dists = Distributions::standard();
        let mut rng = patient_rng(42, 1);
        for _ in 0..2000 {
            let slots = sample_blood_pressure(&mut rng, &dists);
            let present: Vec<_> = slots.iter().flatten().collect();
            assert!((1..=READING_SLOTS).contains(&present.len()));
            // Slots fill from the front.
            let first_empty = slots.iter().position(|s| s.is_none()).unwrap_or(READING_SLOTS);
            assert!(slots[first_empty..].iter().all(|s| s.is_none()));
            for r in present {
                assert!(r.systolic - r.diastolic >= 10);
                assert_eq!(r.systolic_risk, classify_systolic(r.systolic));
                assert_eq!(r.diastolic_risk, classify_diastolic(r.diastolic));
            }
        }
    }

    #[test]
    fn glucose_values_are_clipped_and_classified() {
        let dists = Distributions::standard();
        let mut rng = patient_rng(42, 2);
        for _ in 0..2000 {
            for r in sample_glucose(&mut rng, &dists).iter().flatten() {
                let (lo, hi) = match r.measurement {
                    GlucoseMeasurement::PreMeal => (3.0, 9.0),
                    GlucoseMeasurement::PostMeal => (4.0, 12.0),
                };
                assert!(r.value >= lo && r.value <= hi, "{} out of bounds", r.value);
                assert_eq!(round1(r.value), r.value);
                assert_eq!(r.range, classify_glucose(r.value, r.measurement));
            }
        }
    }

    #[test]
    fn spaced_readings_keep_minimum_gap() {
        let rule = SpacingRule { min_minutes: 60, max_attempts: 50 };
        let mut rng = patient_rng(9, 9);
        for _ in 0..500 {
            let times = spaced_timestamps(&mut rng, 4, &rule);
            assert_eq!(times.len(), 4);
            let spaced: Vec<TimeOfDay> = times
                .iter()
                .filter(|(_, s)| *s == Spacing::Spaced)
                .map(|(t, _)| *t)
                .collect();
            for (i, a) in spaced.iter().enumerate() {
                for b in &spaced[i + 1..] {
                    assert!(a.circular_distance(*b) >= 60);
                }
            }
        }
    }

    #[test]
    fn impossible_spacing_degrades_to_fallback() {
        // A 13-hour gap fits at most one reading on a 24-hour clock.
        let rule = SpacingRule { min_minutes: 13 * 60, max_attempts: 5 };
        let mut rng = patient_rng(1, 1);
        let times = spaced_timestamps(&mut rng, 3, &rule);
        assert_eq!(times.len(), 3);
        assert_eq!(times[0].1, Spacing::Spaced);
        assert!(times[1..].iter().all(|(_, s)| *s == Spacing::Fallback));
    }
}
