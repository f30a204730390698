use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::date::DateKey;
use crate::models::{
    DayRecord, FoodLibraryItem, LibraryExercise, PersonalRecord, Settings, WeighIn,
    WorkoutHistoryRecord, WorkoutTemplate,
};
use crate::seed;

pub const STATE_VERSION: u32 = 2;

/// Everything the tracker persists, as one document.
///
/// Fields missing from a stored document fall back to their defaults, so a
/// partially written or older document still loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootState {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default = "DateKey::today")]
    pub selected_date: DateKey,
    #[serde(default)]
    pub days: BTreeMap<DateKey, DayRecord>,
    #[serde(default)]
    pub food_library: Vec<FoodLibraryItem>,
    #[serde(default = "seed::exercises")]
    pub exercises: Vec<LibraryExercise>,
    #[serde(default = "seed::templates")]
    pub templates: Vec<WorkoutTemplate>,
    /// Most recent first.
    #[serde(default)]
    pub workout_history: Vec<WorkoutHistoryRecord>,
    /// Keyed by normalised exercise name.
    #[serde(default)]
    pub personal_records: BTreeMap<String, PersonalRecord>,
    #[serde(default)]
    pub weigh_ins: Vec<WeighIn>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for RootState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            settings: Settings::default(),
            selected_date: DateKey::today(),
            days: BTreeMap::new(),
            food_library: Vec::new(),
            exercises: seed::exercises(),
            templates: seed::templates(),
            workout_history: Vec::new(),
            personal_records: BTreeMap::new(),
            weigh_ins: Vec::new(),
        }
    }
}
