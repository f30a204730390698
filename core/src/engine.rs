use serde::{Deserialize, Serialize};

use crate::date::{DateKey, WeekStart};
use crate::error::{TrackError, TrackResult};
use crate::models::{FoodEntry, FoodTotals};
use crate::state::RootState;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Weights of the momentum signals. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumWeights {
    pub food: f64,
    pub workout: f64,
    pub closed: f64,
}

impl Default for MomentumWeights {
    fn default() -> Self {
        Self {
            food: 0.45,
            workout: 0.45,
            closed: 0.10,
        }
    }
}

/// Knobs of the aggregation engine that are product decisions rather than
/// user settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub week_starts_on: WeekStart,
    pub momentum: MomentumWeights,
    /// Let a weigh-in alone make a day closable.
    pub weigh_in_closes_day: bool,
}

impl EngineConfig {
    pub fn validate(&self) -> TrackResult<()> {
        let MomentumWeights {
            food,
            workout,
            closed,
        } = self.momentum;
        for (name, value) in [("food", food), ("workout", workout), ("closed", closed)] {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackError::InvalidConfig(format!(
                    "momentum weight '{name}' must be a non-negative number"
                )));
            }
        }
        let sum = food + workout + closed;
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(TrackError::InvalidConfig(format!(
                "momentum weights must sum to 1.0 (got {sum})"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: DateKey,
    pub week_end: DateKey,
    pub closed_days: u32,
    pub workouts_completed: u32,
    /// Days with at least one logged food; the averages divide by this.
    pub food_days: u32,
    pub average_calories: f64,
    pub average_protein: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "count", rename_all = "snake_case")]
pub enum FoodStatus {
    Logged(usize),
    Planned(usize),
    NotLogged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Completed,
    Planned,
    NotLogged,
}

/// Everything the "today" screen shows about one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayOverview {
    pub date: DateKey,
    pub closed: bool,
    pub can_close: bool,
    pub totals: FoodTotals,
    pub food: FoodStatus,
    pub workout: WorkoutStatus,
    pub workout_name: Option<String>,
    pub weigh_in_due: bool,
    pub momentum: f64,
    pub calorie_target: f64,
    pub protein_target: f64,
    pub calories_remaining: f64,
    pub protein_remaining: f64,
    pub close_hint: &'static str,
}

/// Read-only views over a state snapshot. Nothing here is cached: every
/// call looks at the records as they are now.
pub struct Engine<'a> {
    state: &'a RootState,
    config: &'a EngineConfig,
}

impl<'a> Engine<'a> {
    #[must_use]
    pub fn new(state: &'a RootState, config: &'a EngineConfig) -> Self {
        Self { state, config }
    }

    fn has_logged_food(&self, day: DateKey) -> bool {
        self.state.day(day).foods.iter().any(FoodEntry::is_logged)
    }

    #[must_use]
    pub fn can_close_day(&self, day: DateKey) -> bool {
        self.has_logged_food(day)
            || self.state.day(day).has_completed_workout()
            || (self.config.weigh_in_closes_day && self.state.has_weigh_in_on(day))
    }

    /// Consecutive closed days ending at `anchor` (inclusive). One open day
    /// ends the run.
    #[must_use]
    pub fn compute_streak(&self, anchor: DateKey) -> u32 {
        let mut streak = 0;
        let mut day = anchor;
        while self.state.day(day).closed {
            streak += 1;
            day = day.add_days(-1);
        }
        streak
    }

    #[must_use]
    pub fn weekly_summary(&self, anchor: DateKey) -> WeeklySummary {
        let days = anchor.week_days(self.config.week_starts_on);
        let mut closed_days = 0;
        let mut workouts_completed = 0;
        let mut food_days = 0;
        let mut calories = 0.0;
        let mut protein = 0.0;

        for day in days {
            let record = self.state.day(day);
            if record.closed {
                closed_days += 1;
            }
            if record.has_completed_workout() {
                workouts_completed += 1;
            }
            let totals = self.state.food_totals(day, None);
            if totals.logged_count > 0 {
                food_days += 1;
                calories += totals.calories;
                protein += totals.protein;
            }
        }

        let mean = |sum: f64| {
            if food_days == 0 {
                0.0
            } else {
                sum / f64::from(food_days)
            }
        };
        WeeklySummary {
            week_start: days[0],
            week_end: days[6],
            closed_days,
            workouts_completed,
            food_days,
            average_calories: mean(calories),
            average_protein: mean(protein),
        }
    }

    /// Weighted completeness of a day, in [0, 1].
    #[must_use]
    pub fn momentum_score(&self, day: DateKey) -> f64 {
        let weights = self.config.momentum;
        let record = self.state.day(day);
        let mut score = 0.0;
        if self.has_logged_food(day) {
            score += weights.food;
        }
        if record.has_completed_workout() {
            score += weights.workout;
        }
        if record.closed {
            score += weights.closed;
        }
        score.clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn day_overview(&self, day: DateKey) -> DayOverview {
        let record = self.state.day(day);
        let settings = &self.state.settings;
        let totals = self.state.food_totals(day, None);
        let can_close = self.can_close_day(day);

        let food = if totals.logged_count > 0 {
            FoodStatus::Logged(totals.logged_count)
        } else if totals.planned_count > 0 {
            FoodStatus::Planned(totals.planned_count)
        } else {
            FoodStatus::NotLogged
        };
        let workout = match &record.workout {
            Some(plan) if plan.completed => WorkoutStatus::Completed,
            Some(plan) if !plan.exercises.is_empty() => WorkoutStatus::Planned,
            _ => WorkoutStatus::NotLogged,
        };
        let close_hint = if record.closed {
            "Day closed. Review tomorrow."
        } else if can_close {
            "Ready to close the day."
        } else {
            "Log food or a workout to enable Close Today."
        };

        DayOverview {
            date: day,
            closed: record.closed,
            can_close,
            totals,
            food,
            workout,
            workout_name: record.workout.as_ref().map(|w| w.name.clone()),
            weigh_in_due: self
                .state
                .is_weigh_in_due(day, self.config.week_starts_on),
            momentum: self.momentum_score(day),
            calorie_target: settings.calorie_target,
            protein_target: settings.protein_target,
            calories_remaining: settings.calorie_target - totals.calories,
            protein_remaining: settings.protein_target - totals.protein,
            close_hint,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;
    use crate::models::{EntryStatus, FoodSource, ManualFood, MealBucket};

    fn key(m: u32, d: u32) -> DateKey {
        DateKey::from_ymd(2024, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-05T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn log(state: &mut RootState, day: DateKey, calories: f64, protein: f64, status: EntryStatus) {
        state.add_food_entry(
            day,
            MealBucket::Lunch,
            FoodSource::Manual(ManualFood {
                name: "Meal".to_string(),
                serving_label: String::new(),
                calories,
                protein,
                carbs: 0.0,
                fat: 0.0,
            }),
            Some(1.0),
            None,
            status,
            now(),
        );
    }

    fn close(state: &mut RootState, day: DateKey) {
        log(state, day, 100.0, 10.0, EntryStatus::Logged);
        state
            .close_day(day, &EngineConfig::default(), now())
            .unwrap();
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.week_starts_on, WeekStart::Sunday);
        assert!(!cfg.weigh_in_closes_day);
        assert!(cfg.validate().is_ok());

        let mut bad = cfg;
        bad.momentum.closed = 0.2;
        assert!(matches!(bad.validate(), Err(TrackError::InvalidConfig(_))));

        let mut negative = cfg;
        negative.momentum = MomentumWeights {
            food: 1.2,
            workout: -0.2,
            closed: 0.0,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_config_partial_deserialise() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"week_starts_on": "monday"}"#).unwrap();
        assert_eq!(cfg.week_starts_on, WeekStart::Monday);
        assert_eq!(cfg.momentum, MomentumWeights::default());
    }

    #[test]
    fn test_can_close_requires_logged_food() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        let engine = Engine::new(&state, &cfg);
        assert!(!engine.can_close_day(key(1, 5)));

        log(&mut state, key(1, 5), 500.0, 20.0, EntryStatus::Planned);
        assert!(!Engine::new(&state, &cfg).can_close_day(key(1, 5)));

        log(&mut state, key(1, 5), 400.0, 20.0, EntryStatus::Logged);
        assert!(Engine::new(&state, &cfg).can_close_day(key(1, 5)));
    }

    #[test]
    fn test_can_close_with_completed_workout() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        state.add_exercise(key(1, 5), "Run", "Cardio", now());
        assert!(!Engine::new(&state, &cfg).can_close_day(key(1, 5)));
        state.mark_complete(key(1, 5), now()).unwrap();
        assert!(Engine::new(&state, &cfg).can_close_day(key(1, 5)));
    }

    #[test]
    fn test_weigh_in_closes_day_only_when_enabled() {
        let mut state = RootState::default();
        state.add_weigh_in(key(1, 5), 80.0, now());

        let off = EngineConfig::default();
        assert!(!Engine::new(&state, &off).can_close_day(key(1, 5)));

        let on = EngineConfig {
            weigh_in_closes_day: true,
            ..EngineConfig::default()
        };
        assert!(Engine::new(&state, &on).can_close_day(key(1, 5)));
        assert!(state.close_day(key(1, 5), &on, now()).is_ok());
    }

    #[test]
    fn test_streak_broken_by_gap() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        let d = key(1, 10);
        for n in 2..=4 {
            close(&mut state, d.add_days(-n));
        }
        assert_eq!(Engine::new(&state, &cfg).compute_streak(d), 0);
        assert_eq!(Engine::new(&state, &cfg).compute_streak(d.add_days(-2)), 3);

        close(&mut state, d);
        assert_eq!(Engine::new(&state, &cfg).compute_streak(d), 1);

        close(&mut state, d.add_days(-1));
        assert_eq!(Engine::new(&state, &cfg).compute_streak(d), 5);
    }

    #[test]
    fn test_streak_ends_at_reopened_day() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        for n in 0..3 {
            close(&mut state, key(1, 10).add_days(-n));
        }
        state.reopen_day(key(1, 9), now());
        assert_eq!(Engine::new(&state, &cfg).compute_streak(key(1, 10)), 1);
    }

    #[test]
    fn test_weekly_average_excludes_food_free_days() {
        let mut state = RootState::default();
        let cfg = EngineConfig {
            week_starts_on: WeekStart::Monday,
            ..EngineConfig::default()
        };
        log(&mut state, key(1, 1), 2000.0, 150.0, EntryStatus::Logged);
        log(&mut state, key(1, 3), 2200.0, 170.0, EntryStatus::Logged);
        log(&mut state, key(1, 5), 1800.0, 160.0, EntryStatus::Logged);
        // Planned-only day doesn't count as a food day
        log(&mut state, key(1, 6), 3000.0, 10.0, EntryStatus::Planned);
        // Outside the week
        log(&mut state, key(1, 8), 5000.0, 10.0, EntryStatus::Logged);

        let summary = Engine::new(&state, &cfg).weekly_summary(key(1, 4));
        assert_eq!(summary.week_start, key(1, 1));
        assert_eq!(summary.week_end, key(1, 7));
        assert_eq!(summary.food_days, 3);
        assert!((summary.average_calories - 2000.0).abs() < 1e-9);
        assert!((summary.average_protein - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_weekly_summary_counts() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        // Sunday-start week of 2024-01-07 .. 2024-01-13
        close(&mut state, key(1, 7));
        close(&mut state, key(1, 8));
        state.add_exercise(key(1, 9), "Run", "Cardio", now());
        state.mark_complete(key(1, 9), now()).unwrap();
        state.add_exercise(key(1, 10), "Walk", "Cardio", now());

        let summary = Engine::new(&state, &cfg).weekly_summary(key(1, 10));
        assert_eq!(summary.week_start, key(1, 7));
        assert_eq!(summary.closed_days, 2);
        assert_eq!(summary.workouts_completed, 1);
    }

    #[test]
    fn test_empty_week_averages_zero() {
        let state = RootState::default();
        let cfg = EngineConfig::default();
        let summary = Engine::new(&state, &cfg).weekly_summary(key(1, 10));
        assert_eq!(summary.food_days, 0);
        assert_eq!(summary.average_calories.to_bits(), 0.0_f64.to_bits());
        assert_eq!(summary.closed_days, 0);
    }

    #[test]
    fn test_momentum_score() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        let score = |state: &RootState| Engine::new(state, &cfg).momentum_score(key(1, 5));
        assert_eq!(score(&state).to_bits(), 0.0_f64.to_bits());

        log(&mut state, key(1, 5), 500.0, 30.0, EntryStatus::Logged);
        assert!((score(&state) - 0.45).abs() < 1e-9);

        state.add_exercise(key(1, 5), "Run", "Cardio", now());
        state.mark_complete(key(1, 5), now()).unwrap();
        state.close_day(key(1, 5), &cfg, now()).unwrap();
        assert!((score(&state) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_day_overview() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();

        let empty = Engine::new(&state, &cfg).day_overview(key(1, 5));
        assert_eq!(empty.food, FoodStatus::NotLogged);
        assert_eq!(empty.workout, WorkoutStatus::NotLogged);
        assert!(!empty.can_close);
        assert_eq!(
            empty.close_hint,
            "Log food or a workout to enable Close Today."
        );

        log(&mut state, key(1, 5), 500.0, 40.0, EntryStatus::Planned);
        let planned = Engine::new(&state, &cfg).day_overview(key(1, 5));
        assert_eq!(planned.food, FoodStatus::Planned(1));

        log(&mut state, key(1, 5), 700.0, 50.0, EntryStatus::Logged);
        state.apply_template(key(1, 5), "full_body_a", now());
        let ready = Engine::new(&state, &cfg).day_overview(key(1, 5));
        assert_eq!(ready.food, FoodStatus::Logged(1));
        assert_eq!(ready.workout, WorkoutStatus::Planned);
        assert_eq!(ready.workout_name.as_deref(), Some("Full Body A"));
        assert!((ready.calories_remaining - 1500.0).abs() < 1e-9);
        assert!((ready.protein_remaining - 140.0).abs() < 1e-9);
        assert_eq!(ready.close_hint, "Ready to close the day.");

        state.close_day(key(1, 5), &cfg, now()).unwrap();
        let closed = Engine::new(&state, &cfg).day_overview(key(1, 5));
        assert!(closed.closed);
        assert_eq!(closed.close_hint, "Day closed. Review tomorrow.");
    }

    #[test]
    fn test_overview_weigh_in_due() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        // 2024-01-07 is a Sunday, the default weigh-in day
        let overview = |state: &RootState| Engine::new(state, &cfg).day_overview(key(1, 7));
        assert!(overview(&state).weigh_in_due);
        state.add_weigh_in(key(1, 7), 80.0, now());
        assert!(!overview(&state).weigh_in_due);
    }
}
