use chrono::Utc;
use tracing::{debug, info};

use crate::date::DateKey;
use crate::engine::{DayOverview, Engine, EngineConfig, WeeklySummary};
use crate::error::TrackResult;
use crate::models::{
    DayRecord, EntryStatus, ExerciseEntry, ExerciseField, FoodEntry, FoodLibraryItem, FoodSource,
    FoodTotals, LibraryExercise, ManualFood, MealBucket, NewLibraryItem, PersonalRecord, Settings,
    WeighIn, WorkoutHistoryRecord, WorkoutPlan, WorkoutTemplate,
};
use crate::state::RootState;
use crate::store::{MemoryStore, StateAdapter};

/// The tracker as the front ends see it: one `RootState` in memory, an
/// adapter it is persisted through, and the engine configuration.
///
/// Every mutation runs against a copy of the state. The copy replaces the
/// live state only once the operation succeeded and the adapter saved it, so
/// a failed save or a refused operation leaves nothing half applied.
pub struct DaybookService<S: StateAdapter = Box<dyn StateAdapter>> {
    store: S,
    state: RootState,
    config: EngineConfig,
}

impl DaybookService<MemoryStore> {
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self {
            store: MemoryStore::new(),
            state: RootState::default(),
            config: EngineConfig::default(),
        }
    }
}

impl<S: StateAdapter> DaybookService<S> {
    /// Load through `store`; an empty store starts from the default state.
    pub fn load(mut store: S, config: EngineConfig) -> TrackResult<Self> {
        config.validate()?;
        let stored = store.load_state()?;
        let first_run = stored.is_none();
        let state = stored.unwrap_or_default();
        info!(first_run, days = state.days.len(), "state loaded");
        Ok(Self {
            store,
            state,
            config,
        })
    }

    fn commit<T>(&mut self, op: impl FnOnce(&mut RootState) -> TrackResult<T>) -> TrackResult<T> {
        let mut next = self.state.clone();
        let out = op(&mut next)?;
        self.store.save_state(&next)?;
        self.state = next;
        Ok(out)
    }

    /// Like `commit`, but an operation that changed nothing isn't saved.
    fn commit_changed(&mut self, op: impl FnOnce(&mut RootState) -> bool) -> TrackResult<bool> {
        let mut next = self.state.clone();
        if !op(&mut next) {
            return Ok(false);
        }
        self.store.save_state(&next)?;
        self.state = next;
        Ok(true)
    }

    fn commit_some<T>(
        &mut self,
        op: impl FnOnce(&mut RootState) -> Option<T>,
    ) -> TrackResult<Option<T>> {
        let mut next = self.state.clone();
        let Some(out) = op(&mut next) else {
            return Ok(None);
        };
        self.store.save_state(&next)?;
        self.state = next;
        Ok(Some(out))
    }

    #[must_use]
    pub fn state(&self) -> &RootState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn engine(&self) -> Engine<'_> {
        Engine::new(&self.state, &self.config)
    }

    // --- Days ---

    #[must_use]
    pub fn day(&self, day: DateKey) -> &DayRecord {
        self.state.day(day)
    }

    #[must_use]
    pub fn overview(&self, day: DateKey) -> DayOverview {
        self.engine().day_overview(day)
    }

    #[must_use]
    pub fn can_close_day(&self, day: DateKey) -> bool {
        self.engine().can_close_day(day)
    }

    pub fn close_day(&mut self, day: DateKey) -> TrackResult<()> {
        let config = self.config;
        let now = Utc::now();
        self.commit(move |s| s.close_day(day, &config, now))
    }

    pub fn reopen_day(&mut self, day: DateKey) -> TrackResult<bool> {
        let now = Utc::now();
        self.commit_changed(|s| s.reopen_day(day, now))
    }

    #[must_use]
    pub fn streak(&self, anchor: DateKey) -> u32 {
        self.engine().compute_streak(anchor)
    }

    #[must_use]
    pub fn weekly_summary(&self, anchor: DateKey) -> WeeklySummary {
        self.engine().weekly_summary(anchor)
    }

    #[must_use]
    pub fn momentum_score(&self, day: DateKey) -> f64 {
        self.engine().momentum_score(day)
    }

    #[must_use]
    pub fn selected_date(&self) -> DateKey {
        self.state.selected_date
    }

    pub fn select_date(&mut self, day: DateKey) -> TrackResult<()> {
        self.commit(|s| {
            s.select_date(day);
            Ok(())
        })
    }

    // --- Food ---

    pub fn add_food_entry(
        &mut self,
        day: DateKey,
        bucket: MealBucket,
        food: ManualFood,
        quantity: Option<f64>,
        serving_label: Option<&str>,
        status: EntryStatus,
    ) -> TrackResult<FoodEntry> {
        let now = Utc::now();
        self.commit(|s| {
            Ok(s.add_food_entry(
                day,
                bucket,
                FoodSource::Manual(food),
                quantity,
                serving_label,
                status,
                now,
            ))
        })
    }

    pub fn add_library_food(
        &mut self,
        day: DateKey,
        bucket: MealBucket,
        item_id: &str,
        quantity: Option<f64>,
        serving_label: Option<&str>,
        status: EntryStatus,
    ) -> TrackResult<Option<FoodEntry>> {
        let now = Utc::now();
        self.commit_some(|s| {
            s.add_library_food(day, bucket, item_id, quantity, serving_label, status, now)
        })
    }

    pub fn mark_logged(&mut self, day: DateKey, entry_id: &str) -> TrackResult<bool> {
        self.commit_changed(|s| s.mark_logged(day, entry_id))
    }

    pub fn set_entry_status(
        &mut self,
        day: DateKey,
        entry_id: &str,
        status: EntryStatus,
    ) -> TrackResult<bool> {
        self.commit_changed(|s| s.set_entry_status(day, entry_id, status))
    }

    pub fn mark_meal_logged(&mut self, day: DateKey, bucket: MealBucket) -> TrackResult<usize> {
        let mut changed = 0;
        self.commit_changed(|s| {
            changed = s.mark_meal_logged(day, bucket);
            changed > 0
        })?;
        Ok(changed)
    }

    pub fn delete_food_entry(&mut self, day: DateKey, entry_id: &str) -> TrackResult<bool> {
        let now = Utc::now();
        self.commit_changed(|s| s.delete_food_entry(day, entry_id, now))
    }

    pub fn restore_food_entry(&mut self, entry_id: &str) -> TrackResult<bool> {
        self.commit_changed(|s| s.restore_food_entry(entry_id))
    }

    pub fn repeat_last_meal(
        &mut self,
        day: DateKey,
        bucket: MealBucket,
        status: EntryStatus,
    ) -> TrackResult<Vec<FoodEntry>> {
        let now = Utc::now();
        let copies = self
            .commit_some(|s| {
                let copies = s.repeat_last_meal(day, bucket, status, now);
                (!copies.is_empty()).then_some(copies)
            })?
            .unwrap_or_default();
        Ok(copies)
    }

    #[must_use]
    pub fn food_entries(&self, day: DateKey, bucket: Option<MealBucket>) -> Vec<&FoodEntry> {
        self.state.food_entries(day, bucket).collect()
    }

    #[must_use]
    pub fn food_totals(&self, day: DateKey, bucket: Option<MealBucket>) -> FoodTotals {
        self.state.food_totals(day, bucket)
    }

    // --- Food library ---

    pub fn add_library_item(&mut self, item: NewLibraryItem) -> TrackResult<FoodLibraryItem> {
        let now = Utc::now();
        self.commit(|s| Ok(s.add_library_item(item, now)))
    }

    pub fn update_library_item(
        &mut self,
        id: &str,
        item: NewLibraryItem,
    ) -> TrackResult<Option<FoodLibraryItem>> {
        let now = Utc::now();
        self.commit_some(|s| s.update_library_item(id, item, now))
    }

    pub fn delete_library_item(&mut self, id: &str) -> TrackResult<bool> {
        self.commit_changed(|s| s.delete_library_item(id))
    }

    pub fn set_favorite(&mut self, id: &str, favorite: bool) -> TrackResult<bool> {
        let now = Utc::now();
        self.commit_changed(|s| s.set_favorite(id, favorite, now))
    }

    #[must_use]
    pub fn library_items(&self) -> Vec<&FoodLibraryItem> {
        self.state.library_items()
    }

    #[must_use]
    pub fn find_library_item(&self, id_or_name: &str) -> Option<&FoodLibraryItem> {
        self.state.find_library_item(id_or_name)
    }

    // --- Workouts ---

    pub fn plan_workout(&mut self, day: DateKey, name: &str) -> TrackResult<WorkoutPlan> {
        let now = Utc::now();
        self.commit(|s| Ok(s.plan_workout(day, name, now)))
    }

    pub fn apply_template(
        &mut self,
        day: DateKey,
        template_id: &str,
    ) -> TrackResult<Option<WorkoutPlan>> {
        let now = Utc::now();
        self.commit_some(|s| s.apply_template(day, template_id, now))
    }

    pub fn add_exercise(
        &mut self,
        day: DateKey,
        name: &str,
        muscle_group: &str,
    ) -> TrackResult<ExerciseEntry> {
        let now = Utc::now();
        self.commit(|s| Ok(s.add_exercise(day, name, muscle_group, now)))
    }

    pub fn add_exercise_from_library(
        &mut self,
        day: DateKey,
        exercise_id: &str,
    ) -> TrackResult<Option<ExerciseEntry>> {
        let now = Utc::now();
        self.commit_some(|s| s.add_exercise_from_library(day, exercise_id, now))
    }

    pub fn remove_exercise(&mut self, day: DateKey, exercise_id: &str) -> TrackResult<bool> {
        self.commit_changed(|s| s.remove_exercise(day, exercise_id))
    }

    pub fn update_exercise_field(
        &mut self,
        day: DateKey,
        exercise_id: &str,
        field: ExerciseField,
        value: &str,
    ) -> TrackResult<bool> {
        self.commit_changed(|s| s.update_exercise_field(day, exercise_id, field, value))
    }

    pub fn mark_complete(&mut self, day: DateKey) -> TrackResult<WorkoutHistoryRecord> {
        let now = Utc::now();
        self.commit(|s| s.mark_complete(day, now))
    }

    pub fn undo_complete(&mut self, day: DateKey) -> TrackResult<bool> {
        self.commit_changed(|s| s.undo_complete(day))
    }

    pub fn delete_history_record(&mut self, id: &str) -> TrackResult<bool> {
        self.commit_changed(|s| s.delete_history_record(id))
    }

    pub fn save_plan_as_template(
        &mut self,
        day: DateKey,
        name: &str,
    ) -> TrackResult<Option<WorkoutTemplate>> {
        self.commit_some(|s| s.save_plan_as_template(day, name))
    }

    pub fn delete_template(&mut self, id: &str) -> TrackResult<bool> {
        self.commit_changed(|s| s.delete_template(id))
    }

    #[must_use]
    pub fn templates(&self) -> &[WorkoutTemplate] {
        &self.state.templates
    }

    #[must_use]
    pub fn exercises(&self) -> &[LibraryExercise] {
        &self.state.exercises
    }

    #[must_use]
    pub fn history(&self, limit: Option<usize>) -> &[WorkoutHistoryRecord] {
        self.state.history(limit)
    }

    #[must_use]
    pub fn personal_records(&self) -> Vec<&PersonalRecord> {
        self.state.personal_records()
    }

    // --- Weigh-ins ---

    /// Record a weigh-in. A weight that isn't a positive number is ignored.
    pub fn add_weigh_in(&mut self, day: DateKey, weight: f64) -> TrackResult<Option<WeighIn>> {
        if !(weight.is_finite() && weight > 0.0) {
            debug!(date = %day, weight, "ignored non-positive weigh-in");
            return Ok(None);
        }
        let now = Utc::now();
        self.commit(|s| Ok(Some(s.add_weigh_in(day, weight, now))))
    }

    pub fn delete_weigh_in(&mut self, id: &str) -> TrackResult<bool> {
        let now = Utc::now();
        self.commit_changed(|s| s.delete_weigh_in(id, now))
    }

    pub fn restore_weigh_in(&mut self, id: &str) -> TrackResult<bool> {
        self.commit_changed(|s| s.restore_weigh_in(id))
    }

    #[must_use]
    pub fn weigh_ins(&self, limit: Option<usize>) -> Vec<&WeighIn> {
        self.state.weigh_ins(limit)
    }

    #[must_use]
    pub fn latest_weigh_in(&self) -> Option<&WeighIn> {
        self.state.latest_weigh_in()
    }

    #[must_use]
    pub fn is_weigh_in_due(&self, day: DateKey) -> bool {
        self.state.is_weigh_in_due(day, self.config.week_starts_on)
    }

    // --- Settings ---

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn save_settings(&mut self, settings: Settings) -> TrackResult<()> {
        settings.validate()?;
        self.commit(|s| {
            s.settings = settings;
            Ok(())
        })?;
        info!(?settings, "settings saved");
        Ok(())
    }

    /// Drop everything and start over from the default state.
    pub fn reset(&mut self) -> TrackResult<()> {
        self.commit(|s| {
            *s = RootState::default();
            Ok(())
        })?;
        info!("state reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;
    use crate::date::WeekStart;
    use crate::error::TrackError;

    fn key(m: u32, d: u32) -> DateKey {
        DateKey::from_ymd(2024, m, d).unwrap()
    }

    fn food(name: &str, calories: f64, protein: f64) -> ManualFood {
        ManualFood {
            name: name.to_string(),
            serving_label: "serving".to_string(),
            calories,
            protein,
            carbs: 0.0,
            fat: 0.0,
        }
    }

    fn log(svc: &mut DaybookService<MemoryStore>, day: DateKey, calories: f64) -> FoodEntry {
        svc.add_food_entry(
            day,
            MealBucket::Lunch,
            food("Meal", calories, 30.0),
            Some(1.0),
            None,
            EntryStatus::Logged,
        )
        .unwrap()
    }

    /// Loads fine, refuses every save.
    struct ReadOnlyStore;

    impl StateAdapter for ReadOnlyStore {
        fn load_state(&mut self) -> anyhow::Result<Option<RootState>> {
            Ok(None)
        }

        fn save_state(&mut self, _state: &RootState) -> anyhow::Result<()> {
            bail!("disk full")
        }
    }

    #[test]
    fn test_first_run_produces_default_state() {
        let svc = DaybookService::load(MemoryStore::new(), EngineConfig::default()).unwrap();
        assert_eq!(svc.state().templates.len(), 2);
        assert!((svc.settings().calorie_target - 2200.0).abs() < f64::EPSILON);
        assert_eq!(svc.selected_date(), DateKey::today());
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let mut cfg = EngineConfig::default();
        cfg.momentum.food = 0.9;
        let result = DaybookService::load(MemoryStore::new(), cfg);
        assert!(matches!(result, Err(TrackError::InvalidConfig(_))));
    }

    #[test]
    fn test_scenario_close_after_first_entry() {
        let mut svc = DaybookService::new_in_memory();
        let d = key(6, 15);
        assert!(!svc.can_close_day(d));

        log(&mut svc, d, 400.0);
        assert!(svc.can_close_day(d));
        svc.close_day(d).unwrap();
        assert!(svc.day(d).closed);
        assert!((svc.food_totals(d, None).calories - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_close_refused_leaves_state_and_store_untouched() {
        let mut svc = DaybookService::new_in_memory();
        let d = key(6, 15);
        let err = svc.close_day(d).unwrap_err();
        assert!(matches!(err, TrackError::NotClosable(_)));
        assert!(!svc.day(d).closed);
        assert!(svc.state().days.is_empty());
        assert_eq!(svc.store().save_count(), 0);
    }

    #[test]
    fn test_closable_flips_live_with_ledger_changes() {
        let mut svc = DaybookService::new_in_memory();
        let d = key(6, 15);
        let entry = log(&mut svc, d, 400.0);
        assert!(svc.can_close_day(d));

        svc.delete_food_entry(d, &entry.id).unwrap();
        assert!(!svc.can_close_day(d));

        svc.restore_food_entry(&entry.id).unwrap();
        assert!(svc.can_close_day(d));
    }

    #[test]
    fn test_reopen_open_day_does_not_save() {
        let mut svc = DaybookService::new_in_memory();
        assert!(!svc.reopen_day(key(6, 15)).unwrap());
        assert_eq!(svc.store().save_count(), 0);
    }

    #[test]
    fn test_empty_plan_cannot_complete() {
        let mut svc = DaybookService::new_in_memory();
        let d = key(6, 15);
        svc.plan_workout(d, "Legs").unwrap();
        assert!(matches!(svc.mark_complete(d), Err(TrackError::EmptyPlan(_))));
        assert!(!svc.day(d).workout.as_ref().unwrap().completed);
        assert!(svc.history(None).is_empty());
    }

    #[test]
    fn test_template_over_completed_workout_drops_its_history() {
        let mut svc = DaybookService::new_in_memory();
        let d = key(6, 15);
        svc.add_exercise(d, "Run", "Cardio").unwrap();
        svc.mark_complete(d).unwrap();
        svc.close_day(d).unwrap();
        assert_eq!(svc.weekly_summary(d).workouts_completed, 1);

        svc.apply_template(d, "full_body_a").unwrap();
        assert!(svc.history(None).is_empty());
        assert_eq!(svc.weekly_summary(d).workouts_completed, 0);
        assert!(!svc.undo_complete(d).unwrap());
        assert!(svc.day(d).closed);
    }

    #[test]
    fn test_personal_records_through_service() {
        let mut svc = DaybookService::new_in_memory();
        for (d, weight, reps) in [(14, "100", "8"), (15, "90", "10")] {
            let ex = svc.add_exercise(key(6, d), "Bench Press", "Chest").unwrap();
            svc.update_exercise_field(key(6, d), &ex.id, ExerciseField::Weight, weight)
                .unwrap();
            svc.update_exercise_field(key(6, d), &ex.id, ExerciseField::Reps, reps)
                .unwrap();
            svc.mark_complete(key(6, d)).unwrap();
        }
        let prs = svc.personal_records();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].best_weight, Some(100.0));
        assert_eq!(prs[0].best_reps, Some(10));
    }

    #[test]
    fn test_weekly_summary_uses_configured_week_start() {
        let cfg = EngineConfig {
            week_starts_on: WeekStart::Monday,
            ..EngineConfig::default()
        };
        let mut svc = DaybookService::load(MemoryStore::new(), cfg).unwrap();
        for (d, cal) in [(1, 2000.0), (3, 2200.0), (5, 1800.0)] {
            log(&mut svc, key(1, d), cal);
        }
        let summary = svc.weekly_summary(key(1, 7));
        assert_eq!(summary.week_start, key(1, 1));
        assert!((summary.average_calories - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_weigh_in_due_scenario() {
        let cfg = EngineConfig {
            week_starts_on: WeekStart::Monday,
            ..EngineConfig::default()
        };
        let mut svc = DaybookService::load(MemoryStore::new(), cfg).unwrap();
        svc.save_settings(Settings {
            weigh_in_weekday: 5,
            ..Settings::default()
        })
        .unwrap();
        assert!(svc.is_weigh_in_due(key(1, 5)));

        svc.add_weigh_in(key(1, 3), 82.0).unwrap();
        assert!(!svc.is_weigh_in_due(key(1, 5)));
    }

    #[test]
    fn test_non_positive_weigh_in_ignored() {
        let mut svc = DaybookService::new_in_memory();
        assert!(svc.add_weigh_in(key(1, 3), 0.0).unwrap().is_none());
        assert!(svc.add_weigh_in(key(1, 3), -70.0).unwrap().is_none());
        assert!(svc.add_weigh_in(key(1, 3), f64::NAN).unwrap().is_none());
        assert!(svc.weigh_ins(None).is_empty());
        assert_eq!(svc.store().save_count(), 0);
    }

    #[test]
    fn test_invalid_settings_rejected_without_change() {
        let mut svc = DaybookService::new_in_memory();
        let err = svc
            .save_settings(Settings {
                calorie_target: -1.0,
                ..Settings::default()
            })
            .unwrap_err();
        assert!(matches!(err, TrackError::InvalidSettings(_)));
        assert!((svc.settings().calorie_target - 2200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failed_save_is_all_or_nothing() {
        let mut svc = DaybookService::load(ReadOnlyStore, EngineConfig::default()).unwrap();
        let d = key(6, 15);

        let err = svc
            .add_food_entry(
                d,
                MealBucket::Dinner,
                food("Steak", 600.0, 50.0),
                None,
                None,
                EntryStatus::Logged,
            )
            .unwrap_err();
        assert!(matches!(err, TrackError::Storage(_)));
        assert!(svc.state().days.is_empty());

        // Completing touches plan, history and records together; none of it sticks
        assert!(svc.add_exercise(d, "Squat", "Legs").is_err());
        assert!(svc.mark_complete(d).is_err());
        assert!(svc.history(None).is_empty());
        assert!(svc.personal_records().is_empty());
    }

    #[test]
    fn test_state_persists_across_reload() {
        let mut svc = DaybookService::new_in_memory();
        let d = key(6, 15);
        log(&mut svc, d, 500.0);
        svc.close_day(d).unwrap();
        svc.select_date(d).unwrap();

        let saved = svc.store().saved().unwrap().clone();
        let reloaded =
            DaybookService::load(MemoryStore::with_state(saved), EngineConfig::default()).unwrap();
        assert!(reloaded.day(d).closed);
        assert_eq!(reloaded.selected_date(), d);
        assert_eq!(reloaded.streak(d), 1);
    }

    #[test]
    fn test_sqlite_backed_service() {
        let store = crate::db::SqliteStore::open_in_memory().unwrap();
        let mut svc = DaybookService::load(store, EngineConfig::default()).unwrap();
        let d = key(6, 15);
        let entry = svc
            .add_food_entry(
                d,
                MealBucket::Breakfast,
                food("Eggs", 140.0, 12.0),
                Some(2.0),
                None,
                EntryStatus::Planned,
            )
            .unwrap();
        assert!(svc.mark_logged(d, &entry.id).unwrap());
        assert!(!svc.mark_logged(d, &entry.id).unwrap());

        let mut store = svc.store;
        let loaded = store.load_state().unwrap().unwrap();
        assert!((loaded.food_totals(d, None).calories - 280.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boxed_adapter() {
        let store: Box<dyn StateAdapter> = Box::new(MemoryStore::new());
        let mut svc: DaybookService = DaybookService::load(store, EngineConfig::default()).unwrap();
        log_boxed(&mut svc);
        assert_eq!(svc.food_entries(key(6, 15), None).len(), 1);
    }

    fn log_boxed(svc: &mut DaybookService) {
        svc.add_food_entry(
            key(6, 15),
            MealBucket::Snacks,
            food("Apple", 95.0, 0.5),
            None,
            None,
            EntryStatus::Logged,
        )
        .unwrap();
    }

    #[test]
    fn test_mark_meal_logged_and_repeat() {
        let mut svc = DaybookService::new_in_memory();
        svc.add_food_entry(
            key(6, 14),
            MealBucket::Breakfast,
            food("Oats", 300.0, 10.0),
            None,
            None,
            EntryStatus::Logged,
        )
        .unwrap();

        let copies = svc
            .repeat_last_meal(key(6, 15), MealBucket::Breakfast, EntryStatus::Planned)
            .unwrap();
        assert_eq!(copies.len(), 1);
        let logged = svc
            .mark_meal_logged(key(6, 15), MealBucket::Breakfast)
            .unwrap();
        assert_eq!(logged, 1);
        assert!((svc.food_totals(key(6, 15), None).calories - 300.0).abs() < f64::EPSILON);

        let saves = svc.store().save_count();
        let none = svc
            .repeat_last_meal(key(6, 15), MealBucket::Dinner, EntryStatus::Logged)
            .unwrap();
        assert!(none.is_empty());
        assert_eq!(svc.store().save_count(), saves);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut svc = DaybookService::new_in_memory();
        log(&mut svc, key(6, 15), 500.0);
        svc.add_weigh_in(key(6, 15), 80.0).unwrap();
        svc.reset().unwrap();
        assert!(svc.state().days.is_empty());
        assert!(svc.weigh_ins(None).is_empty());
        assert_eq!(svc.templates().len(), 2);
    }
}
