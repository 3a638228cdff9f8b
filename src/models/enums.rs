use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown label for one of the fixed vocabularies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {field}: {value:?}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string literal is the exact label written to the dataset.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Lenient lookup used for hand-edited input files.
            pub fn from_label_ignore_case(s: &str) -> Option<Self> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
});

str_enum!(
    /// Chronic conditions in descending order of survey prevalence.
    ChronicCondition {
        Hypertension => "Hypertension",
        PeriodontalDisease => "Periodontal disease",
        Osteoarthritis => "Osteoarthritis",
        IschemicHeartDisease => "Ischemic heart disease",
        Diabetes => "Diabetes",
        Osteoporosis => "Osteoporosis",
        Cancer => "Cancer",
        Copd => "COPD",
        Asthma => "Asthma",
        MoodAnxietyDisorder => "Mood and/or anxiety disorder",
    }
);

str_enum!(MedicationType {
    Prescribed => "Prescribed",
    Supplement => "Supplement",
    OverTheCounter => "Over-the-counter",
    Scheduled => "Scheduled",
    AsNeeded => "As-needed",
});

str_enum!(MedicationCategory {
    HeartHypertension => "Heart health and hypertension",
    Diabetes => "Diabetes (oral or injectable)",
    ChronicPain => "Chronic pain and musculoskeletal",
    MentalHealth => "Mental health (mood and anxiety)",
    VitaminsSupplements => "Vitamins and supplements",
    Other => "Other",
});

str_enum!(Mood {
    Happy => "happy",
    Sad => "sad",
    Angry => "angry",
    Contempt => "contempt",
});

str_enum!(Weather {
    Good => "Good",
    Bad => "Bad",
});

str_enum!(SleepQuality {
    VeryGood => "Very good",
    FairlyGood => "Fairly good",
    FairlyBad => "Fairly bad",
    VeryBad => "Very bad",
});

impl SleepQuality {
    /// Ordinal code, 0 = best.
    pub fn code(self) -> u8 {
        match self {
            SleepQuality::VeryGood => 0,
            SleepQuality::FairlyGood => 1,
            SleepQuality::FairlyBad => 2,
            SleepQuality::VeryBad => 3,
        }
    }
}

str_enum!(MealType {
    Breakfast => "Breakfast",
    Lunch => "Lunch",
    Dinner => "Dinner",
    LateNightSnack => "Late night snack",
});

impl MealType {
    /// Column name prefix in the tabular output.
    pub fn column_prefix(self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::LateNightSnack => "Late_Night_Snack",
        }
    }
}

str_enum!(
    /// Added-sugar bucket for a meal. `NoneAdded` is written as an empty cell.
    SugarBucket {
        NoneAdded => "",
        UpTo20g => "1-20g",
        From20To40g => "20-40g",
        From40To60g => "40-60g",
        Over60g => "60g+",
    }
);

str_enum!(ExerciseType {
    Walking => "walking",
    Swimming => "swimming",
    Running => "running",
    Biking => "biking",
    MuscleStrengthening => "muscle-strengthening",
    Balance => "balance",
    Other => "other",
});

str_enum!(PainLocation {
    Head => "head",
    Neck => "neck",
    Shoulders => "shoulders",
    Back => "back",
    Chest => "chest",
    Stomach => "stomach",
    Hips => "hips",
    Arms => "arms",
    Elbows => "elbows",
    Hands => "hands",
    Legs => "legs",
    Knees => "knees",
    Feet => "feet",
});

str_enum!(
    /// Per-limb blood pressure risk band.
    BpRisk {
        Low => "Low blood pressure",
        Ideal => "Ideal",
        PreHigh => "Pre-high blood pressure",
        High => "High blood pressure",
    }
);

str_enum!(GlucoseMeasurement {
    PreMeal => "Pre meal",
    PostMeal => "2-hour post meal",
});

str_enum!(GlucoseRange {
    Below => "below range",
    InRange => "in range",
    Above => "above range",
});
