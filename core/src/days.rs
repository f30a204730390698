use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::date::DateKey;
use crate::engine::{Engine, EngineConfig};
use crate::error::{TrackError, TrackResult};
use crate::models::DayRecord;
use crate::state::RootState;

static EMPTY_DAY: DayRecord = DayRecord::EMPTY;

impl RootState {
    /// Read a day. Days never touched read as empty and open; reading never
    /// creates a record.
    #[must_use]
    pub fn day(&self, key: DateKey) -> &DayRecord {
        self.days.get(&key).unwrap_or(&EMPTY_DAY)
    }

    pub(crate) fn day_mut(&mut self, key: DateKey) -> &mut DayRecord {
        self.days.entry(key).or_default()
    }

    /// Finalise a day. Refused with `NotClosable` (and no state change)
    /// unless the day currently has something worth closing.
    pub fn close_day(
        &mut self,
        key: DateKey,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> TrackResult<()> {
        if !Engine::new(self, config).can_close_day(key) {
            warn!(date = %key, "refused to close day with nothing logged");
            return Err(TrackError::NotClosable(key));
        }
        let day = self.day_mut(key);
        if !day.closed {
            day.closed = true;
            day.closed_at = Some(now);
            info!(date = %key, "day closed");
        }
        Ok(())
    }

    /// Reopen a closed day. Returns `false` when the day was not closed.
    pub fn reopen_day(&mut self, key: DateKey, now: DateTime<Utc>) -> bool {
        match self.days.get_mut(&key) {
            Some(day) if day.closed => {
                day.closed = false;
                day.reopened_at = Some(now);
                info!(date = %key, "day reopened");
                true
            }
            _ => false,
        }
    }

    pub fn select_date(&mut self, key: DateKey) {
        self.selected_date = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryStatus, FoodSource, ManualFood, MealBucket};

    fn key(d: u32) -> DateKey {
        DateKey::from_ymd(2024, 6, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T20:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn log_food(state: &mut RootState, day: DateKey, calories: f64) -> String {
        let food = ManualFood {
            name: "Oats".to_string(),
            calories,
            ..ManualFood::default()
        };
        state
            .add_food_entry(
                day,
                MealBucket::Breakfast,
                FoodSource::Manual(food),
                Some(1.0),
                None,
                EntryStatus::Logged,
                now(),
            )
            .id
    }

    #[test]
    fn test_get_day_is_side_effect_free() {
        let state = RootState::default();
        let first = state.day(key(15));
        assert!(!first.closed);
        assert!(first.foods.is_empty());
        assert!(first.workout.is_none());
        assert!(state.days.is_empty());

        let second = state.day(key(15));
        assert_eq!(first.closed, second.closed);
        assert_eq!(first.foods.len(), second.foods.len());
    }

    #[test]
    fn test_close_empty_day_refused_without_change() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();

        let err = state.close_day(key(15), &cfg, now()).unwrap_err();
        assert!(matches!(err, TrackError::NotClosable(d) if d == key(15)));
        assert!(!state.day(key(15)).closed);
        assert!(state.days.is_empty());
    }

    #[test]
    fn test_close_day_after_logging_food() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        log_food(&mut state, key(15), 400.0);

        state.close_day(key(15), &cfg, now()).unwrap();
        let day = state.day(key(15));
        assert!(day.closed);
        assert_eq!(day.closed_at, Some(now()));
    }

    #[test]
    fn test_close_twice_keeps_first_timestamp() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        log_food(&mut state, key(15), 400.0);

        state.close_day(key(15), &cfg, now()).unwrap();
        let later = now() + chrono::Duration::hours(1);
        state.close_day(key(15), &cfg, later).unwrap();
        assert_eq!(state.day(key(15)).closed_at, Some(now()));
    }

    #[test]
    fn test_close_refused_after_only_entry_deleted() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        let id = log_food(&mut state, key(15), 400.0);
        assert!(state.delete_food_entry(key(15), &id, now()));

        assert!(state.close_day(key(15), &cfg, now()).is_err());
        assert!(!state.day(key(15)).closed);
    }

    #[test]
    fn test_reopen_open_day_is_noop() {
        let mut state = RootState::default();
        assert!(!state.reopen_day(key(15), now()));
        assert!(state.days.is_empty());

        log_food(&mut state, key(15), 400.0);
        assert!(!state.reopen_day(key(15), now()));
        assert!(state.day(key(15)).reopened_at.is_none());
    }

    #[test]
    fn test_reopen_twice_same_as_once() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        log_food(&mut state, key(15), 400.0);
        state.close_day(key(15), &cfg, now()).unwrap();

        assert!(state.reopen_day(key(15), now()));
        let after_once = state.day(key(15)).clone();
        assert!(!state.reopen_day(key(15), now() + chrono::Duration::hours(2)));
        let after_twice = state.day(key(15));

        assert!(!after_twice.closed);
        assert_eq!(after_once.reopened_at, after_twice.reopened_at);
        assert_eq!(after_once.closed_at, after_twice.closed_at);
    }

    #[test]
    fn test_close_reopen_cycles() {
        let mut state = RootState::default();
        let cfg = EngineConfig::default();
        log_food(&mut state, key(15), 400.0);

        for _ in 0..3 {
            state.close_day(key(15), &cfg, now()).unwrap();
            assert!(state.day(key(15)).closed);
            assert!(state.reopen_day(key(15), now()));
            assert!(!state.day(key(15)).closed);
        }
    }
}
