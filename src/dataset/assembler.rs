//! Fixed-width table schema.
//!
//! This is the only place where an absent exercise entry, empty meal or
//! missing reading becomes a sentinel cell: `0` for numeric columns and an
//! empty string for labels and times.

use crate::models::{
    DailyRecord, MealContents, MealType, MedicationSummary, Patient, SugarBucket, EXERCISE_SLOTS,
    READING_SLOTS,
};

pub const PATIENT_ID_COLUMN: &str = "Patient_ID";

const MEAL_COMPONENTS: [&str; 5] = ["Protein", "Vegetables", "Fruit", "Alcohol", "Carbohydrates"];
const PATIENT_LEVEL_COLUMNS: [&str; 4] = ["Age", "Gender", "Name", "Chronic_Conditions"];

// ═══════════════════════════════════════════
// Schema
// ═══════════════════════════════════════════

/// Per-day columns in output order, ending with Medication_Count.
pub fn day_columns() -> Vec<String> {
    let mut cols: Vec<String> = [
        "Date",
        "Mood",
        "Weather",
        "Sleep_Quality",
        "Sleep_Quality_Code",
        "Sleep_Hours",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect();

    for n in 1..=EXERCISE_SLOTS {
        cols.push(format!("Exercise_Type_{n}"));
        cols.push(format!("Exercise_Minutes_{n}"));
        cols.push(format!("Exercise_Category_{n}"));
    }

    cols.push("Pain_Location".into());
    cols.push("Pain_Level".into());

    for meal in MealType::ALL {
        cols.push(format!("{}_Time", meal.column_prefix()));
    }
    for meal in MealType::ALL {
        let prefix = meal.column_prefix();
        for component in MEAL_COMPONENTS {
            cols.push(format!("{prefix}_{component}"));
        }
        cols.push(format!("{prefix}_Added_Sugar"));
    }

    cols.extend(
        ["Urinary_Continence", "Fecal_Continence", "Health_Goal_Met"]
            .iter()
            .map(|c| c.to_string()),
    );

    for n in 1..=READING_SLOTS {
        cols.push(format!("Systolic_{n}"));
        cols.push(format!("Diastolic_{n}"));
        cols.push(format!("Systolic_Type_{n}"));
        cols.push(format!("Diastolic_Type_{n}"));
        cols.push(format!("BP_Time_{n}"));
    }
    for n in 1..=READING_SLOTS {
        cols.push(format!("Glucose_{n}"));
        cols.push(format!("Glucose_Measurement_Type_{n}"));
        cols.push(format!("Glucose_Range_{n}"));
        cols.push(format!("Glucose_Time_{n}"));
    }

    cols.extend(
        [
            "Medication_Names",
            "Medication_Types",
            "Medication_Categories",
            "Medication_Dosages",
            "Medication_Count",
        ]
        .iter()
        .map(|c| c.to_string()),
    );
    cols
}

/// Header of a per-patient file.
pub fn patient_columns() -> Vec<String> {
    let mut cols = day_columns();
    cols.extend(PATIENT_LEVEL_COLUMNS.iter().map(|c| c.to_string()));
    cols
}

/// Header of the combined file.
pub fn combined_columns() -> Vec<String> {
    let mut cols = vec![PATIENT_ID_COLUMN.to_string()];
    cols.extend(patient_columns());
    cols
}

// ═══════════════════════════════════════════
// Rows
// ═══════════════════════════════════════════

fn yes_no(value: bool) -> String {
    let label = if value { "Yes" } else { "No" };
    label.to_string()
}

fn flag(value: bool) -> String {
    let cell = if value { "1" } else { "0" };
    cell.to_string()
}

/// Flattens one day into cells aligned with `patient_columns()`.
pub fn patient_row(patient: &Patient, summary: &MedicationSummary, day: &DailyRecord) -> Vec<String> {
    let mut row = Vec::with_capacity(128);

    row.push(day.date.format("%Y-%m-%d").to_string());
    row.push(day.mood.map(|m| m.as_str()).unwrap_or_default().to_string());
    row.push(day.weather.to_string());
    row.push(day.sleep_quality.to_string());
    row.push(day.sleep_quality.code().to_string());
    row.push(format!("{:.1}", day.sleep_hours));

    for slot in 0..EXERCISE_SLOTS {
        match day.exercise.entries.get(slot) {
            Some(entry) => {
                // The category column repeats the exercise type label.
                row.push(entry.exercise_type.to_string());
                row.push(entry.minutes.to_string());
                row.push(entry.exercise_type.to_string());
            }
            None => row.extend([String::new(), "0".into(), String::new()]),
        }
    }

    row.push(day.pain_location.to_string());
    row.push(day.pain_level.to_string());

    for meal in &day.meals {
        row.push(meal.time.to_string());
    }
    for meal in &day.meals {
        let MealContents {
            protein,
            vegetables,
            fruit,
            alcohol,
            carbohydrates,
            added_sugar,
        } = meal.contents.unwrap_or(MealContents {
            protein: false,
            vegetables: false,
            fruit: false,
            alcohol: false,
            carbohydrates: false,
            added_sugar: SugarBucket::NoneAdded,
        });
        row.extend([protein, vegetables, fruit, alcohol, carbohydrates].map(flag));
        row.push(added_sugar.to_string());
    }

    row.push(yes_no(day.urinary_continence));
    row.push(yes_no(day.fecal_continence));
    row.push(yes_no(day.health_goal_met));

    for slot in &day.blood_pressure {
        match slot {
            Some(bp) => row.extend([
                bp.systolic.to_string(),
                bp.diastolic.to_string(),
                bp.systolic_risk.to_string(),
                bp.diastolic_risk.to_string(),
                bp.time.to_string(),
            ]),
            None => row.extend(["0".into(), "0".into(), String::new(), String::new(), String::new()]),
        }
    }
    for slot in &day.glucose {
        match slot {
            Some(g) => row.extend([
                format!("{:.1}", g.value),
                g.measurement.to_string(),
                g.range.to_string(),
                g.time.to_string(),
            ]),
            None => row.extend(["0".into(), String::new(), String::new(), String::new()]),
        }
    }

    row.push(summary.names.clone());
    row.push(summary.types.clone());
    row.push(summary.categories.clone());
    row.push(summary.dosages.clone());
    row.push(summary.count.to_string());

    row.push(patient.age.to_string());
    row.push(patient.gender.to_string());
    row.push(patient.name.clone());
    row.push(patient.conditions_label());
    row
}

// ═══════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════

/// One patient's days, ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientTable {
    pub patient_id: String,
    pub rows: Vec<Vec<String>>,
}

impl PatientTable {
    pub fn assemble(patient: &Patient, days: &[DailyRecord]) -> Self {
        let summary = patient.medication_summary();
        let mut ordered: Vec<&DailyRecord> = days.iter().collect();
        ordered.sort_by_key(|d| d.date);

        Self {
            patient_id: patient.id.clone(),
            rows: ordered
                .into_iter()
                .map(|d| patient_row(patient, &summary, d))
                .collect(),
        }
    }

    pub fn header(&self) -> Vec<String> {
        patient_columns()
    }

    pub fn file_name(&self) -> String {
        format!("Patient_{}.csv", self.patient_id)
    }
}

/// All patients' rows in generation order, each prefixed with its id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedTable {
    pub rows: Vec<Vec<String>>,
}

impl CombinedTable {
    pub fn push(&mut self, table: &PatientTable) {
        self.rows.extend(table.rows.iter().map(|row| {
            let mut combined = Vec::with_capacity(row.len() + 1);
            combined.push(table.patient_id.clone());
            combined.extend(row.iter().cloned());
            combined
        }));
    }

    pub fn header(&self) -> Vec<String> {
        combined_columns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BloodPressureReading, BpRisk, ChronicCondition, ExerciseDay, ExerciseEntry, ExerciseType,
        Gender, GlucoseMeasurement, GlucoseRange, GlucoseReading, Meal, Medication,
        MedicationCategory, MedicationType, Mood, PainLocation, SleepQuality, Spacing, TimeOfDay,
        Weather,
    };
    use chrono::NaiveDate;

    fn patient() -> Patient {
        Patient {
            id: "007".into(),
            age: 71,
            gender: Gender::Female,
            name: "Mary".into(),
            conditions: vec![ChronicCondition::Hypertension, ChronicCondition::Diabetes],
            pain_location: PainLocation::Knees,
            medications: vec![
                Medication::new(
                    "Lisinopril",
                    MedicationType::Prescribed,
                    MedicationCategory::HeartHypertension,
                    "10 mg once daily",
                ),
                Medication::new(
                    "Metformin",
                    MedicationType::Prescribed,
                    MedicationCategory::Diabetes,
                    "500 mg twice daily",
                ),
            ],
        }
    }

    fn time(h: u16, m: u16) -> TimeOfDay {
        TimeOfDay::from_hm(h, m).unwrap()
    }

    fn day(date: NaiveDate) -> DailyRecord {
        let meal = |meal_type, t, contents| Meal {
            meal_type,
            time: t,
            contents,
        };
        DailyRecord {
            date,
            mood: None,
            weather: Weather::Good,
            sleep_quality: SleepQuality::FairlyBad,
            sleep_hours: 7.0,
            exercise: ExerciseDay {
                total_minutes: 12,
                entries: vec![ExerciseEntry {
                    exercise_type: ExerciseType::Swimming,
                    minutes: 12,
                }],
            },
            pain_level: 3,
            pain_location: PainLocation::Knees,
            meals: [
                meal(
                    MealType::Breakfast,
                    time(7, 5),
                    Some(MealContents {
                        protein: true,
                        vegetables: false,
                        fruit: true,
                        alcohol: false,
                        carbohydrates: true,
                        added_sugar: SugarBucket::ALL[1],
                    }),
                ),
                meal(MealType::Lunch, time(12, 0), None),
                meal(MealType::Dinner, time(18, 30), None),
                meal(MealType::LateNightSnack, time(22, 45), None),
            ],
            urinary_continence: true,
            fecal_continence: false,
            health_goal_met: true,
            blood_pressure: [
                Some(BloodPressureReading {
                    systolic: 135,
                    diastolic: 85,
                    systolic_risk: BpRisk::PreHigh,
                    diastolic_risk: BpRisk::PreHigh,
                    time: time(8, 0),
                    spacing: Spacing::Spaced,
                }),
                None,
                None,
                None,
            ],
            glucose: [
                Some(GlucoseReading {
                    value: 6.0,
                    measurement: GlucoseMeasurement::PreMeal,
                    range: GlucoseRange::InRange,
                    time: time(9, 15),
                    spacing: Spacing::Spaced,
                }),
                None,
                None,
                None,
            ],
        }
    }

    fn cell<'a>(row: &'a [String], column: &str) -> &'a str {
        let idx = patient_columns().iter().position(|c| c == column).unwrap();
        &row[idx]
    }

    #[test]
    fn header_shape() {
        let cols = patient_columns();
        assert_eq!(cols[0], "Date");
        assert_eq!(cols.last().unwrap(), "Chronic_Conditions");
        // 6 + 15 + 2 + 4 + 24 + 3 + 20 + 16 + 5 + 4
        assert_eq!(cols.len(), 99);
        let pain = cols.iter().position(|c| c == "Pain_Location").unwrap();
        assert_eq!(cols[pain + 1], "Pain_Level");
        assert!(cols.contains(&"Late_Night_Snack_Added_Sugar".to_string()));

        let combined = combined_columns();
        assert_eq!(combined[0], PATIENT_ID_COLUMN);
        assert_eq!(combined.len(), cols.len() + 1);
    }

    #[test]
    fn columns_are_unique() {
        let mut cols = combined_columns();
        let n = cols.len();
        cols.sort();
        cols.dedup();
        assert_eq!(cols.len(), n);
    }

    #[test]
    fn row_matches_header_and_uses_sentinels() {
        let p = patient();
        let row = patient_row(&p, &p.medication_summary(), &day(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()));
        assert_eq!(row.len(), patient_columns().len());

        assert_eq!(cell(&row, "Date"), "2024-07-01");
        assert_eq!(cell(&row, "Mood"), "");
        assert_eq!(cell(&row, "Sleep_Quality"), "Fairly bad");
        assert_eq!(cell(&row, "Sleep_Quality_Code"), "2");
        assert_eq!(cell(&row, "Sleep_Hours"), "7.0");
        assert_eq!(cell(&row, "Exercise_Category_1"), "swimming");
        assert_eq!(cell(&row, "Exercise_Type_2"), "");
        assert_eq!(cell(&row, "Exercise_Minutes_2"), "0");
        assert_eq!(cell(&row, "Breakfast_Time"), "07:05");
        assert_eq!(cell(&row, "Breakfast_Protein"), "1");
        assert_eq!(cell(&row, "Breakfast_Vegetables"), "0");
        assert_eq!(cell(&row, "Breakfast_Added_Sugar"), "1-20g");
        assert_eq!(cell(&row, "Lunch_Protein"), "0");
        assert_eq!(cell(&row, "Lunch_Added_Sugar"), "");
        assert_eq!(cell(&row, "Fecal_Continence"), "No");
        assert_eq!(cell(&row, "Systolic_1"), "135");
        assert_eq!(cell(&row, "Systolic_Type_1"), "Pre-high blood pressure");
        assert_eq!(cell(&row, "BP_Time_1"), "08:00");
        assert_eq!(cell(&row, "Systolic_2"), "0");
        assert_eq!(cell(&row, "BP_Time_2"), "");
        assert_eq!(cell(&row, "Glucose_1"), "6.0");
        assert_eq!(cell(&row, "Glucose_2"), "0");
        assert_eq!(cell(&row, "Glucose_Range_2"), "");
        assert_eq!(cell(&row, "Medication_Names"), "Lisinopril; Metformin");
        assert_eq!(cell(&row, "Medication_Count"), "2");
        assert_eq!(cell(&row, "Pain_Location"), "knees");
        assert_eq!(cell(&row, "Chronic_Conditions"), "Hypertension; Diabetes");
    }

    #[test]
    fn patient_table_sorts_by_date() {
        let p = patient();
        let d1 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
        let table = PatientTable::assemble(&p, &[day(d2), day(d1)]);
        assert_eq!(table.rows[0][0], "2024-07-01");
        assert_eq!(table.rows[1][0], "2024-07-02");
        assert_eq!(table.file_name(), "Patient_007.csv");
    }

    #[test]
    fn combined_table_prefixes_patient_id() {
        let p = patient();
        let d = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let table = PatientTable::assemble(&p, &[day(d)]);

        let mut combined = CombinedTable::default();
        combined.push(&table);
        combined.push(&table);
        assert_eq!(combined.rows.len(), 2);
        for row in &combined.rows {
            assert_eq!(row[0], "007");
            assert_eq!(row.len(), combined.header().len());
            assert_eq!(&row[1..], table.rows[0].as_slice());
        }
    }

    #[test]
    fn mood_label_is_written() {
        let p = patient();
        let mut record = day(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        record.mood = Some(Mood::Contempt);
        let row = patient_row(&p, &p.medication_summary(), &record);
        assert_eq!(cell(&row, "Mood"), "contempt");
    }
}
