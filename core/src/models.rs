use std::fmt;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coerce;
use crate::date::DateKey;
use crate::error::{TrackError, TrackResult};

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// --- Food ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealBucket {
    Breakfast,
    Snacks,
    Lunch,
    Dinner,
}

impl MealBucket {
    /// Display order of the meal cards.
    pub const ALL: [MealBucket; 4] = [
        MealBucket::Breakfast,
        MealBucket::Snacks,
        MealBucket::Lunch,
        MealBucket::Dinner,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MealBucket::Breakfast => "breakfast",
            MealBucket::Snacks => "snacks",
            MealBucket::Lunch => "lunch",
            MealBucket::Dinner => "dinner",
        }
    }

    pub fn parse(meal: &str) -> Result<Self> {
        match meal.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealBucket::Breakfast),
            "snack" | "snacks" => Ok(MealBucket::Snacks),
            "lunch" => Ok(MealBucket::Lunch),
            "dinner" => Ok(MealBucket::Dinner),
            _ => bail!(
                "Invalid meal '{meal}'. Must be one of: {}",
                MealBucket::ALL.map(MealBucket::as_str).join(", ")
            ),
        }
    }
}

impl fmt::Display for MealBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Logged,
    Planned,
}

impl EntryStatus {
    pub fn parse(status: &str) -> Result<Self> {
        match status.trim().to_lowercase().as_str() {
            "logged" | "eaten" => Ok(EntryStatus::Logged),
            "planned" | "plan" => Ok(EntryStatus::Planned),
            _ => bail!("Invalid status '{status}'. Must be one of: logged, planned"),
        }
    }
}

/// Calories and macros in absolute amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    pub bucket: MealBucket,
    #[serde(default)]
    pub status: EntryStatus,
    pub name: String,
    #[serde(default)]
    pub serving_label: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub calories_per_serving: f64,
    #[serde(default)]
    pub protein_per_serving: f64,
    #[serde(default)]
    pub carbs_per_serving: f64,
    #[serde(default)]
    pub fat_per_serving: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_item_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FoodEntry {
    /// Per-serving values scaled by quantity. Only multiplies, so a zero
    /// quantity contributes nothing.
    #[must_use]
    pub fn macros(&self) -> Macros {
        Macros {
            calories: self.quantity * self.calories_per_serving,
            protein: self.quantity * self.protein_per_serving,
            carbs: self.quantity * self.carbs_per_serving,
            fat: self.quantity * self.fat_per_serving,
        }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[must_use]
    pub fn is_logged(&self) -> bool {
        !self.is_deleted() && self.status == EntryStatus::Logged
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FoodTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub logged_count: usize,
    pub planned_count: usize,
}

impl FoodTotals {
    pub(crate) fn add_entry(&mut self, entry: &FoodEntry) {
        if entry.is_deleted() {
            return;
        }
        match entry.status {
            EntryStatus::Logged => {
                let m = entry.macros();
                self.calories += m.calories;
                self.protein += m.protein;
                self.carbs += m.carbs;
                self.fat += m.fat;
                self.logged_count += 1;
            }
            EntryStatus::Planned => self.planned_count += 1,
        }
    }
}

/// Reusable macro template. Entries copy its values at creation time, so
/// editing an item never changes what was already logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLibraryItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub serving_label: String,
    #[serde(default = "default_quantity")]
    pub default_quantity: f64,
    #[serde(default)]
    pub calories_per_serving: f64,
    #[serde(default)]
    pub protein_per_serving: f64,
    #[serde(default)]
    pub carbs_per_serving: f64,
    #[serde(default)]
    pub fat_per_serving: f64,
    #[serde(default)]
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_quantity() -> f64 {
    1.0
}

#[derive(Debug, Clone)]
pub struct NewLibraryItem {
    pub name: String,
    pub serving_label: String,
    pub default_quantity: f64,
    pub calories_per_serving: f64,
    pub protein_per_serving: f64,
    pub carbs_per_serving: f64,
    pub fat_per_serving: f64,
    pub favorite: bool,
}

/// Food typed in by hand rather than picked from the library.
#[derive(Debug, Clone, Default)]
pub struct ManualFood {
    pub name: String,
    pub serving_label: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl ManualFood {
    /// Build from raw form input; unreadable numbers count as zero.
    #[must_use]
    pub fn from_inputs(
        name: &str,
        serving_label: &str,
        calories: &str,
        protein: &str,
        carbs: &str,
        fat: &str,
    ) -> Self {
        Self {
            name: name.trim().to_string(),
            serving_label: serving_label.trim().to_string(),
            calories: coerce::food_number(calories),
            protein: coerce::food_number(protein),
            carbs: coerce::food_number(carbs),
            fat: coerce::food_number(fat),
        }
    }
}

/// Where a new entry's per-serving values come from.
#[derive(Debug, Clone)]
pub enum FoodSource<'a> {
    Library(&'a FoodLibraryItem),
    Manual(ManualFood),
}

// --- Workouts ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub muscle_group: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseField {
    Sets,
    Reps,
    Weight,
    Notes,
}

impl ExerciseField {
    pub fn parse(field: &str) -> Result<Self> {
        match field.trim().to_lowercase().as_str() {
            "sets" => Ok(ExerciseField::Sets),
            "reps" => Ok(ExerciseField::Reps),
            "weight" => Ok(ExerciseField::Weight),
            "notes" => Ok(ExerciseField::Notes),
            _ => bail!("Invalid field '{field}'. Must be one of: sets, reps, weight, notes"),
        }
    }
}

/// The single workout planned for a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// History snapshot produced by the last completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutHistoryRecord {
    pub id: String,
    pub date: DateKey,
    pub name: String,
    pub exercises: Vec<ExerciseEntry>,
    pub completed_at: DateTime<Utc>,
}

/// Best weight and best reps ever seen for one exercise, tracked separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub name: String,
    #[serde(default)]
    pub best_weight: Option<f64>,
    #[serde(default)]
    pub best_reps: Option<u32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub name: String,
    #[serde(default)]
    pub muscle_group: String,
    #[serde(default)]
    pub sets: Option<u32>,
    #[serde(default)]
    pub reps: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryExercise {
    pub id: String,
    pub name: String,
    pub muscle_group: String,
    #[serde(default)]
    pub equipment: String,
}

// --- Weigh-ins ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeighIn {
    pub id: String,
    pub date: DateKey,
    pub weight: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl WeighIn {
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// --- Days ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reopened_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
    #[serde(default)]
    pub workout: Option<WorkoutPlan>,
}

impl DayRecord {
    pub(crate) const EMPTY: DayRecord = DayRecord {
        closed: false,
        closed_at: None,
        reopened_at: None,
        foods: Vec::new(),
        workout: None,
    };

    #[must_use]
    pub fn has_completed_workout(&self) -> bool {
        self.workout.as_ref().is_some_and(|w| w.completed)
    }
}

// --- Settings ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_calorie_target")]
    pub calorie_target: f64,
    #[serde(default = "default_protein_target")]
    pub protein_target: f64,
    /// 0 = Sunday … 6 = Saturday.
    #[serde(default)]
    pub weigh_in_weekday: u8,
}

fn default_calorie_target() -> f64 {
    2200.0
}

fn default_protein_target() -> f64 {
    190.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calorie_target: default_calorie_target(),
            protein_target: default_protein_target(),
            weigh_in_weekday: 0,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> TrackResult<()> {
        if !(self.calorie_target.is_finite() && self.calorie_target > 0.0) {
            return Err(TrackError::InvalidSettings(
                "calorie target must be greater than 0".to_string(),
            ));
        }
        if !(self.protein_target.is_finite() && self.protein_target > 0.0) {
            return Err(TrackError::InvalidSettings(
                "protein target must be greater than 0".to_string(),
            ));
        }
        if self.weigh_in_weekday > 6 {
            return Err(TrackError::InvalidSettings(
                "weigh-in weekday must be between 0 (Sunday) and 6 (Saturday)".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn entry(status: EntryStatus, quantity: f64, calories: f64) -> FoodEntry {
        FoodEntry {
            id: new_id(),
            bucket: MealBucket::Lunch,
            status,
            name: "Rice".to_string(),
            serving_label: "cup".to_string(),
            quantity,
            calories_per_serving: calories,
            protein_per_serving: 4.0,
            carbs_per_serving: 45.0,
            fat_per_serving: 0.5,
            library_item_id: None,
            created_at: now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_meal_bucket_parse() {
        assert_eq!(
            MealBucket::parse("Breakfast").unwrap(),
            MealBucket::Breakfast
        );
        assert_eq!(MealBucket::parse("snack").unwrap(), MealBucket::Snacks);
        assert_eq!(MealBucket::parse("SNACKS").unwrap(), MealBucket::Snacks);
        assert!(MealBucket::parse("brunch").is_err());
        assert!(MealBucket::parse("").is_err());
    }

    #[test]
    fn test_entry_status_parse() {
        assert_eq!(EntryStatus::parse("planned").unwrap(), EntryStatus::Planned);
        assert_eq!(EntryStatus::parse("Logged").unwrap(), EntryStatus::Logged);
        assert!(EntryStatus::parse("maybe").is_err());
    }

    #[test]
    fn test_macros_scale_with_quantity() {
        let e = entry(EntryStatus::Logged, 2.0, 150.0);
        let m = e.macros();
        assert!((m.calories - 300.0).abs() < f64::EPSILON);
        assert!((m.protein - 8.0).abs() < f64::EPSILON);
        assert!((m.carbs - 90.0).abs() < f64::EPSILON);
        assert!((m.fat - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_quantity_contributes_nothing() {
        let e = entry(EntryStatus::Logged, 0.0, 150.0);
        assert_eq!(e.macros(), Macros::default());
    }

    #[test]
    fn test_totals_skip_planned_and_deleted() {
        let mut totals = FoodTotals::default();
        totals.add_entry(&entry(EntryStatus::Logged, 1.0, 200.0));
        totals.add_entry(&entry(EntryStatus::Planned, 1.0, 500.0));
        let mut gone = entry(EntryStatus::Logged, 1.0, 900.0);
        gone.deleted_at = Some(now());
        totals.add_entry(&gone);

        assert!((totals.calories - 200.0).abs() < f64::EPSILON);
        assert_eq!(totals.logged_count, 1);
        assert_eq!(totals.planned_count, 1);
    }

    #[test]
    fn test_manual_food_from_inputs_coerces() {
        let food = ManualFood::from_inputs(" Eggs ", "2 large", "140", "", "x", "-3");
        assert_eq!(food.name, "Eggs");
        assert!((food.calories - 140.0).abs() < f64::EPSILON);
        assert_eq!(food.protein.to_bits(), 0.0_f64.to_bits());
        assert_eq!(food.carbs.to_bits(), 0.0_f64.to_bits());
        assert_eq!(food.fat.to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn test_exercise_field_parse() {
        assert_eq!(
            ExerciseField::parse("Weight").unwrap(),
            ExerciseField::Weight
        );
        assert!(ExerciseField::parse("tempo").is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let s = Settings::default();
        assert!((s.calorie_target - 2200.0).abs() < f64::EPSILON);
        assert!((s.protein_target - 190.0).abs() < f64::EPSILON);
        assert_eq!(s.weigh_in_weekday, 0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_settings_validate_rejects_bad_values() {
        let mut s = Settings::default();
        s.calorie_target = 0.0;
        assert!(matches!(s.validate(), Err(TrackError::InvalidSettings(_))));

        let mut s = Settings::default();
        s.protein_target = f64::NAN;
        assert!(s.validate().is_err());

        let mut s = Settings::default();
        s.weigh_in_weekday = 7;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_settings_missing_fields_default() {
        let s: Settings = serde_json::from_str(r#"{"calorie_target": 1800}"#).unwrap();
        assert!((s.calorie_target - 1800.0).abs() < f64::EPSILON);
        assert!((s.protein_target - 190.0).abs() < f64::EPSILON);
    }
}
