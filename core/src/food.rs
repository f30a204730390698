use chrono::{DateTime, Utc};
use tracing::debug;

use crate::coerce;
use crate::date::DateKey;
use crate::models::{EntryStatus, FoodEntry, FoodSource, FoodTotals, MealBucket, new_id};
use crate::state::RootState;

/// How far back "repeat last meal" looks for something to copy.
const REPEAT_LOOKBACK_DAYS: i64 = 30;

impl RootState {
    /// Add a food to a day. Never fails: unusable numbers were already
    /// coerced to zero, and `quantity: None` uses the source's default.
    #[allow(clippy::too_many_arguments)]
    pub fn add_food_entry(
        &mut self,
        day: DateKey,
        bucket: MealBucket,
        source: FoodSource<'_>,
        quantity: Option<f64>,
        serving_label: Option<&str>,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> FoodEntry {
        let mut entry = match source {
            FoodSource::Library(item) => FoodEntry {
                id: new_id(),
                bucket,
                status,
                name: item.name.clone(),
                serving_label: item.serving_label.clone(),
                quantity: item.default_quantity,
                calories_per_serving: item.calories_per_serving,
                protein_per_serving: item.protein_per_serving,
                carbs_per_serving: item.carbs_per_serving,
                fat_per_serving: item.fat_per_serving,
                library_item_id: Some(item.id.clone()),
                created_at: now,
                deleted_at: None,
            },
            FoodSource::Manual(food) => FoodEntry {
                id: new_id(),
                bucket,
                status,
                name: food.name,
                serving_label: food.serving_label,
                quantity: 1.0,
                calories_per_serving: food.calories,
                protein_per_serving: food.protein,
                carbs_per_serving: food.carbs,
                fat_per_serving: food.fat,
                library_item_id: None,
                created_at: now,
                deleted_at: None,
            },
        };

        if let Some(q) = quantity {
            entry.quantity = q;
        }
        if let Some(label) = serving_label.map(str::trim).filter(|l| !l.is_empty()) {
            entry.serving_label = label.to_string();
        }
        entry.quantity = coerce::sanitize(entry.quantity);
        entry.calories_per_serving = coerce::sanitize(entry.calories_per_serving);
        entry.protein_per_serving = coerce::sanitize(entry.protein_per_serving);
        entry.carbs_per_serving = coerce::sanitize(entry.carbs_per_serving);
        entry.fat_per_serving = coerce::sanitize(entry.fat_per_serving);

        self.day_mut(day).foods.push(entry.clone());
        debug!(date = %day, id = %entry.id, bucket = %bucket, "food entry added");
        entry
    }

    /// Add a food from the library by id. `None` if the item doesn't exist.
    #[allow(clippy::too_many_arguments)]
    pub fn add_library_food(
        &mut self,
        day: DateKey,
        bucket: MealBucket,
        item_id: &str,
        quantity: Option<f64>,
        serving_label: Option<&str>,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> Option<FoodEntry> {
        let item = self.library_item(item_id)?.clone();
        Some(self.add_food_entry(
            day,
            bucket,
            FoodSource::Library(&item),
            quantity,
            serving_label,
            status,
            now,
        ))
    }

    fn live_entry_mut(&mut self, day: DateKey, entry_id: &str) -> Option<&mut FoodEntry> {
        self.days
            .get_mut(&day)?
            .foods
            .iter_mut()
            .find(|e| e.id == entry_id && !e.is_deleted())
    }

    /// Set an entry's status either way. `false` if nothing changed.
    pub fn set_entry_status(&mut self, day: DateKey, entry_id: &str, status: EntryStatus) -> bool {
        match self.live_entry_mut(day, entry_id) {
            Some(entry) if entry.status != status => {
                entry.status = status;
                debug!(date = %day, id = entry_id, ?status, "food entry status changed");
                true
            }
            _ => false,
        }
    }

    /// Planned → logged ("mark eaten").
    pub fn mark_logged(&mut self, day: DateKey, entry_id: &str) -> bool {
        self.set_entry_status(day, entry_id, EntryStatus::Logged)
    }

    /// Mark every planned entry in one meal as eaten. Returns how many changed.
    pub fn mark_meal_logged(&mut self, day: DateKey, bucket: MealBucket) -> usize {
        let Some(record) = self.days.get_mut(&day) else {
            return 0;
        };
        let mut changed = 0;
        for entry in record
            .foods
            .iter_mut()
            .filter(|e| e.bucket == bucket && !e.is_deleted())
        {
            if entry.status == EntryStatus::Planned {
                entry.status = EntryStatus::Logged;
                changed += 1;
            }
        }
        debug!(date = %day, bucket = %bucket, changed, "meal marked eaten");
        changed
    }

    /// Soft-delete: the entry stays stored but drops out of every total.
    pub fn delete_food_entry(&mut self, day: DateKey, entry_id: &str, now: DateTime<Utc>) -> bool {
        match self.live_entry_mut(day, entry_id) {
            Some(entry) => {
                entry.deleted_at = Some(now);
                debug!(date = %day, id = entry_id, "food entry deleted");
                true
            }
            None => false,
        }
    }

    /// Undo a soft-delete, wherever the entry lives.
    pub fn restore_food_entry(&mut self, entry_id: &str) -> bool {
        let found = self
            .days
            .values_mut()
            .flat_map(|d| d.foods.iter_mut())
            .find(|e| e.id == entry_id && e.is_deleted());
        match found {
            Some(entry) => {
                entry.deleted_at = None;
                debug!(id = entry_id, "food entry restored");
                true
            }
            None => false,
        }
    }

    /// Live entries for a day, optionally restricted to one meal, in the
    /// order they were added.
    pub fn food_entries(
        &self,
        day: DateKey,
        bucket: Option<MealBucket>,
    ) -> impl Iterator<Item = &FoodEntry> + '_ {
        self.day(day)
            .foods
            .iter()
            .filter(move |e| !e.is_deleted() && bucket.is_none_or(|b| e.bucket == b))
    }

    #[must_use]
    pub fn food_totals(&self, day: DateKey, bucket: Option<MealBucket>) -> FoodTotals {
        let mut totals = FoodTotals::default();
        for entry in self.food_entries(day, bucket) {
            totals.add_entry(entry);
        }
        totals
    }

    /// Copy the most recent earlier instance of a meal into `day`.
    pub fn repeat_last_meal(
        &mut self,
        day: DateKey,
        bucket: MealBucket,
        status: EntryStatus,
        now: DateTime<Utc>,
    ) -> Vec<FoodEntry> {
        let previous = (1..=REPEAT_LOOKBACK_DAYS)
            .map(|n| day.add_days(-n))
            .find_map(|d| {
                let items: Vec<FoodEntry> = self.food_entries(d, Some(bucket)).cloned().collect();
                (!items.is_empty()).then_some(items)
            });
        let Some(previous) = previous else {
            return Vec::new();
        };

        let copies: Vec<FoodEntry> = previous
            .into_iter()
            .map(|e| FoodEntry {
                id: new_id(),
                status,
                created_at: now,
                deleted_at: None,
                ..e
            })
            .collect();
        self.day_mut(day).foods.extend(copies.iter().cloned());
        debug!(date = %day, bucket = %bucket, count = copies.len(), "meal repeated");
        copies
    }
}
