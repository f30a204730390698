use chrono::{DateTime, Utc};
use tracing::debug;

use crate::date::{DateKey, WeekStart};
use crate::models::{WeighIn, new_id};
use crate::state::RootState;

impl RootState {
    /// Append a weigh-in. Several on the same day are fine.
    pub fn add_weigh_in(&mut self, day: DateKey, weight: f64, now: DateTime<Utc>) -> WeighIn {
        let weigh_in = WeighIn {
            id: new_id(),
            date: day,
            weight,
            created_at: now,
            deleted_at: None,
        };
        self.weigh_ins.push(weigh_in.clone());
        debug!(date = %day, id = %weigh_in.id, weight, "weigh-in added");
        weigh_in
    }

    pub fn delete_weigh_in(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        match self
            .weigh_ins
            .iter_mut()
            .find(|w| w.id == id && !w.is_deleted())
        {
            Some(w) => {
                w.deleted_at = Some(now);
                debug!(id, "weigh-in deleted");
                true
            }
            None => false,
        }
    }

    pub fn restore_weigh_in(&mut self, id: &str) -> bool {
        match self
            .weigh_ins
            .iter_mut()
            .find(|w| w.id == id && w.is_deleted())
        {
            Some(w) => {
                w.deleted_at = None;
                debug!(id, "weigh-in restored");
                true
            }
            None => false,
        }
    }

    fn live_weigh_ins(&self) -> impl Iterator<Item = &WeighIn> + '_ {
        self.weigh_ins.iter().filter(|w| !w.is_deleted())
    }

    #[must_use]
    pub fn has_weigh_in_on(&self, day: DateKey) -> bool {
        self.live_weigh_ins().any(|w| w.date == day)
    }

    /// Newest date first; same-day entries newest first.
    #[must_use]
    pub fn weigh_ins(&self, limit: Option<usize>) -> Vec<&WeighIn> {
        let mut list: Vec<&WeighIn> = self.live_weigh_ins().collect();
        list.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        if let Some(limit) = limit {
            list.truncate(limit);
        }
        list
    }

    #[must_use]
    pub fn latest_weigh_in(&self) -> Option<&WeighIn> {
        self.live_weigh_ins()
            .max_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)))
    }

    /// Due on the configured weekday, unless the week already has one.
    #[must_use]
    pub fn is_weigh_in_due(&self, day: DateKey, week_start: WeekStart) -> bool {
        if day.weekday_index() != self.settings.weigh_in_weekday {
            return false;
        }
        let start = day.start_of_week(week_start);
        let end = start.add_days(6);
        !self
            .live_weigh_ins()
            .any(|w| w.date >= start && w.date <= end)
    }
}
