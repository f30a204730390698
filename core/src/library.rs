use chrono::{DateTime, Utc};
use tracing::debug;

use crate::coerce;
use crate::models::{FoodLibraryItem, NewLibraryItem, new_id};
use crate::state::RootState;

fn clean(item: NewLibraryItem) -> NewLibraryItem {
    let default_quantity = coerce::sanitize(item.default_quantity);
    NewLibraryItem {
        name: item.name.trim().to_string(),
        serving_label: item.serving_label.trim().to_string(),
        // A zero default would make every quick-add count as nothing
        default_quantity: if default_quantity > 0.0 {
            default_quantity
        } else {
            1.0
        },
        calories_per_serving: coerce::sanitize(item.calories_per_serving),
        protein_per_serving: coerce::sanitize(item.protein_per_serving),
        carbs_per_serving: coerce::sanitize(item.carbs_per_serving),
        fat_per_serving: coerce::sanitize(item.fat_per_serving),
        favorite: item.favorite,
    }
}

impl RootState {
    pub fn add_library_item(
        &mut self,
        item: NewLibraryItem,
        now: DateTime<Utc>,
    ) -> FoodLibraryItem {
        let item = clean(item);
        let stored = FoodLibraryItem {
            id: new_id(),
            name: item.name,
            serving_label: item.serving_label,
            default_quantity: item.default_quantity,
            calories_per_serving: item.calories_per_serving,
            protein_per_serving: item.protein_per_serving,
            carbs_per_serving: item.carbs_per_serving,
            fat_per_serving: item.fat_per_serving,
            favorite: item.favorite,
            created_at: now,
            updated_at: now,
        };
        self.food_library.push(stored.clone());
        debug!(id = %stored.id, name = %stored.name, "library item added");
        stored
    }

    /// Replace an item's values. Entries already logged from it keep theirs.
    pub fn update_library_item(
        &mut self,
        id: &str,
        item: NewLibraryItem,
        now: DateTime<Utc>,
    ) -> Option<FoodLibraryItem> {
        let item = clean(item);
        let existing = self.food_library.iter_mut().find(|i| i.id == id)?;
        existing.name = item.name;
        existing.serving_label = item.serving_label;
        existing.default_quantity = item.default_quantity;
        existing.calories_per_serving = item.calories_per_serving;
        existing.protein_per_serving = item.protein_per_serving;
        existing.carbs_per_serving = item.carbs_per_serving;
        existing.fat_per_serving = item.fat_per_serving;
        existing.favorite = item.favorite;
        existing.updated_at = now;
        debug!(id, "library item updated");
        Some(existing.clone())
    }

    pub fn delete_library_item(&mut self, id: &str) -> bool {
        let before = self.food_library.len();
        self.food_library.retain(|i| i.id != id);
        let removed = self.food_library.len() < before;
        if removed {
            debug!(id, "library item deleted");
        }
        removed
    }

    pub fn set_favorite(&mut self, id: &str, favorite: bool, now: DateTime<Utc>) -> bool {
        match self.food_library.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.favorite = favorite;
                item.updated_at = now;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn library_item(&self, id: &str) -> Option<&FoodLibraryItem> {
        self.food_library.iter().find(|i| i.id == id)
    }

    /// Look an item up by id, falling back to a case-insensitive name match.
    #[must_use]
    pub fn find_library_item(&self, id_or_name: &str) -> Option<&FoodLibraryItem> {
        let needle = id_or_name.trim();
        self.library_item(needle).or_else(|| {
            let lower = needle.to_lowercase();
            self.food_library
                .iter()
                .find(|i| i.name.to_lowercase() == lower)
        })
    }

    /// Favourites first, then alphabetical.
    #[must_use]
    pub fn library_items(&self) -> Vec<&FoodLibraryItem> {
        let mut items: Vec<&FoodLibraryItem> = self.food_library.iter().collect();
        items.sort_by_cached_key(|i| (!i.favorite, i.name.to_lowercase()));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn new_item(name: &str, calories: f64, favorite: bool) -> NewLibraryItem {
        NewLibraryItem {
            name: name.to_string(),
            serving_label: "serving".to_string(),
            default_quantity: 1.0,
            calories_per_serving: calories,
            protein_per_serving: 10.0,
            carbs_per_serving: 10.0,
            fat_per_serving: 10.0,
            favorite,
        }
    }

    #[test]
    fn test_add_and_lookup() {
        let mut state = RootState::default();
        let item = state.add_library_item(new_item("  Banana ", 105.0, false), now());
        assert_eq!(item.name, "Banana");
        assert_eq!(state.library_item(&item.id).unwrap().name, "Banana");
        assert_eq!(state.find_library_item("banana").unwrap().id, item.id);
        assert!(state.find_library_item("apple").is_none());
    }

    #[test]
    fn test_add_sanitises_numbers() {
        let mut state = RootState::default();
        let mut raw = new_item("Weird", -5.0, false);
        raw.default_quantity = 0.0;
        raw.protein_per_serving = f64::NAN;
        let item = state.add_library_item(raw, now());
        assert_eq!(item.calories_per_serving.to_bits(), 0.0_f64.to_bits());
        assert_eq!(item.protein_per_serving.to_bits(), 0.0_f64.to_bits());
        assert!((item.default_quantity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_and_delete() {
        let mut state = RootState::default();
        let item = state.add_library_item(new_item("Rice", 200.0, false), now());

        let later = now() + chrono::Duration::minutes(5);
        let updated = state
            .update_library_item(&item.id, new_item("Brown Rice", 215.0, true), later)
            .unwrap();
        assert_eq!(updated.name, "Brown Rice");
        assert!(updated.favorite);
        assert_eq!(updated.created_at, now());
        assert_eq!(updated.updated_at, later);
        let missing = state.update_library_item("missing", new_item("X", 1.0, false), now());
        assert!(missing.is_none());

        assert!(state.delete_library_item(&item.id));
        assert!(!state.delete_library_item(&item.id));
        assert!(state.food_library.is_empty());
    }

    fn names(state: &RootState) -> Vec<&str> {
        state
            .library_items()
            .iter()
            .map(|i| i.name.as_str())
            .collect()
    }

    #[test]
    fn test_favorites_sort_first() {
        let mut state = RootState::default();
        state.add_library_item(new_item("cheese", 110.0, false), now());
        let apple = state.add_library_item(new_item("Apple", 95.0, false), now());
        state.add_library_item(new_item("Whey", 120.0, true), now());
        state.add_library_item(new_item("banana", 105.0, false), now());

        assert_eq!(names(&state), vec!["Whey", "Apple", "banana", "cheese"]);

        assert!(state.set_favorite(&apple.id, true, now()));
        assert_eq!(names(&state), vec!["Apple", "Whey", "banana", "cheese"]);
        assert!(!state.set_favorite("missing", true, now()));
    }
}
