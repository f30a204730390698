use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::coerce;
use crate::date::DateKey;
use crate::error::{TrackError, TrackResult};
use crate::models::{
    ExerciseEntry, ExerciseField, LibraryExercise, PersonalRecord, TemplateExercise,
    WorkoutHistoryRecord, WorkoutPlan, WorkoutTemplate, new_id,
};
use crate::state::RootState;

const DEFAULT_PLAN_NAME: &str = "Workout";

/// Identity used for personal records. Display names keep their case.
#[must_use]
pub fn normalize_exercise_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn empty_plan(name: &str, template_id: Option<String>, now: DateTime<Utc>) -> WorkoutPlan {
    let name = name.trim();
    WorkoutPlan {
        id: new_id(),
        name: if name.is_empty() {
            DEFAULT_PLAN_NAME.to_string()
        } else {
            name.to_string()
        },
        template_id,
        exercises: Vec::new(),
        completed: false,
        completed_at: None,
        history_id: None,
        created_at: now,
    }
}

fn entry_from_template(t: &TemplateExercise) -> ExerciseEntry {
    ExerciseEntry {
        id: new_id(),
        name: t.name.clone(),
        muscle_group: t.muscle_group.clone(),
        sets: t.sets,
        reps: t.reps,
        weight: t.weight,
        notes: t.notes.clone(),
    }
}

impl RootState {
    fn plan_mut(&mut self, day: DateKey) -> Option<&mut WorkoutPlan> {
        self.days.get_mut(&day)?.workout.as_mut()
    }

    #[must_use]
    pub fn plan(&self, day: DateKey) -> Option<&WorkoutPlan> {
        self.day(day).workout.as_ref()
    }

    /// Install a plan for the day. A completed plan being replaced takes its
    /// history snapshot with it.
    fn replace_plan(&mut self, day: DateKey, plan: WorkoutPlan) {
        let previous = self.day_mut(day).workout.replace(plan);
        if let Some(previous) = previous.filter(|p| p.completed) {
            self.drop_linked_history(day, previous.history_id.as_deref());
            debug!(date = %day, "completed workout replaced");
        }
    }

    fn drop_linked_history(&mut self, day: DateKey, linked: Option<&str>) {
        let position = match linked {
            Some(id) => self.workout_history.iter().position(|r| r.id == id),
            None => self.workout_history.iter().position(|r| r.date == day),
        };
        if let Some(position) = position {
            self.workout_history.remove(position);
        }
    }

    /// Start an empty plan, replacing whatever the day had.
    pub fn plan_workout(&mut self, day: DateKey, name: &str, now: DateTime<Utc>) -> WorkoutPlan {
        let plan = empty_plan(name, None, now);
        self.replace_plan(day, plan.clone());
        debug!(date = %day, name = %plan.name, "workout planned");
        plan
    }

    /// Replace the day's plan with a fresh copy of a template. The template
    /// itself is never touched.
    pub fn apply_template(
        &mut self,
        day: DateKey,
        template_id: &str,
        now: DateTime<Utc>,
    ) -> Option<WorkoutPlan> {
        let template = self.template(template_id)?;
        let mut plan = empty_plan(&template.name, Some(template.id.clone()), now);
        plan.exercises = template.exercises.iter().map(entry_from_template).collect();

        self.replace_plan(day, plan.clone());
        debug!(date = %day, template = template_id, "template applied");
        Some(plan)
    }

    /// Append an exercise, creating an empty plan first if the day has none.
    pub fn add_exercise(
        &mut self,
        day: DateKey,
        name: &str,
        muscle_group: &str,
        now: DateTime<Utc>,
    ) -> ExerciseEntry {
        let exercise = ExerciseEntry {
            id: new_id(),
            name: name.trim().to_string(),
            muscle_group: muscle_group.trim().to_string(),
            sets: None,
            reps: None,
            weight: None,
            notes: String::new(),
        };
        self.day_mut(day)
            .workout
            .get_or_insert_with(|| empty_plan(DEFAULT_PLAN_NAME, None, now))
            .exercises
            .push(exercise.clone());
        debug!(date = %day, id = %exercise.id, name = %exercise.name, "exercise added");
        exercise
    }

    pub fn add_exercise_from_library(
        &mut self,
        day: DateKey,
        exercise_id: &str,
        now: DateTime<Utc>,
    ) -> Option<ExerciseEntry> {
        let LibraryExercise {
            name,
            muscle_group,
            ..
        } = self.library_exercise(exercise_id)?.clone();
        Some(self.add_exercise(day, &name, &muscle_group, now))
    }

    pub fn remove_exercise(&mut self, day: DateKey, exercise_id: &str) -> bool {
        let Some(plan) = self.plan_mut(day) else {
            return false;
        };
        let before = plan.exercises.len();
        plan.exercises.retain(|e| e.id != exercise_id);
        let removed = plan.exercises.len() < before;
        if removed {
            debug!(date = %day, id = exercise_id, "exercise removed");
        }
        removed
    }

    /// Set one field from raw input. Blank or unreadable numbers clear the
    /// field rather than writing zero.
    pub fn update_exercise_field(
        &mut self,
        day: DateKey,
        exercise_id: &str,
        field: ExerciseField,
        value: &str,
    ) -> bool {
        let Some(exercise) = self
            .plan_mut(day)
            .and_then(|p| p.exercises.iter_mut().find(|e| e.id == exercise_id))
        else {
            return false;
        };
        match field {
            ExerciseField::Sets => exercise.sets = coerce::workout_count(value),
            ExerciseField::Reps => exercise.reps = coerce::workout_count(value),
            ExerciseField::Weight => exercise.weight = coerce::workout_number(value),
            ExerciseField::Notes => exercise.notes = value.trim().to_string(),
        }
        debug!(date = %day, id = exercise_id, ?field, "exercise updated");
        true
    }

    /// Complete the day's workout: snapshot it into history and fold it into
    /// the personal records. Completing twice returns the first snapshot.
    pub fn mark_complete(
        &mut self,
        day: DateKey,
        now: DateTime<Utc>,
    ) -> TrackResult<WorkoutHistoryRecord> {
        let plan = match self.plan(day) {
            Some(plan) if !plan.exercises.is_empty() => plan,
            _ => {
                warn!(date = %day, "refused to complete an empty workout");
                return Err(TrackError::EmptyPlan(day));
            }
        };

        if plan.completed {
            let linked = plan
                .history_id
                .as_deref()
                .and_then(|id| self.workout_history.iter().find(|r| r.id == id));
            if let Some(record) = linked {
                return Ok(record.clone());
            }
        }

        let record = WorkoutHistoryRecord {
            id: new_id(),
            date: day,
            name: plan.name.clone(),
            exercises: plan.exercises.clone(),
            completed_at: now,
        };

        if let Some(plan) = self.plan_mut(day) {
            plan.completed = true;
            plan.completed_at = Some(now);
            plan.history_id = Some(record.id.clone());
        }
        self.workout_history.insert(0, record.clone());
        self.apply_personal_records(&record.exercises, now);

        info!(
            date = %day,
            history_id = %record.id,
            exercises = record.exercises.len(),
            "workout completed"
        );
        Ok(record)
    }

    fn apply_personal_records(&mut self, exercises: &[ExerciseEntry], now: DateTime<Utc>) {
        for exercise in exercises {
            if exercise.weight.is_none() && exercise.reps.is_none() {
                continue;
            }
            let key = normalize_exercise_name(&exercise.name);
            if key.is_empty() {
                continue;
            }
            let pr = self
                .personal_records
                .entry(key)
                .or_insert_with(|| PersonalRecord {
                    name: exercise.name.trim().to_string(),
                    best_weight: None,
                    best_reps: None,
                    updated_at: now,
                });

            let mut improved = false;
            if let Some(weight) = exercise.weight {
                if pr.best_weight.is_none_or(|best| weight > best) {
                    pr.best_weight = Some(weight);
                    improved = true;
                }
            }
            if let Some(reps) = exercise.reps {
                if pr.best_reps.is_none_or(|best| reps > best) {
                    pr.best_reps = Some(reps);
                    improved = true;
                }
            }
            if improved {
                pr.updated_at = now;
                debug!(
                    exercise = %pr.name,
                    weight = ?pr.best_weight,
                    reps = ?pr.best_reps,
                    "personal record updated"
                );
            }
        }
    }

    /// Un-complete the day's workout and drop its history snapshot.
    /// Personal records only ever go up, so they are left as they are.
    pub fn undo_complete(&mut self, day: DateKey) -> bool {
        let Some(plan) = self.plan_mut(day) else {
            return false;
        };
        if !plan.completed {
            return false;
        }
        plan.completed = false;
        plan.completed_at = None;
        let linked = plan.history_id.take();
        self.drop_linked_history(day, linked.as_deref());
        info!(date = %day, "workout completion undone");
        true
    }

    /// Remove a history snapshot. If the day's plan was completed by it, the
    /// plan goes back to not completed.
    pub fn delete_history_record(&mut self, id: &str) -> bool {
        let Some(position) = self.workout_history.iter().position(|r| r.id == id) else {
            return false;
        };
        let record = self.workout_history.remove(position);
        if let Some(plan) = self.plan_mut(record.date) {
            if plan.history_id.as_deref() == Some(id) {
                plan.completed = false;
                plan.completed_at = None;
                plan.history_id = None;
            }
        }
        debug!(id, date = %record.date, "history record deleted");
        true
    }

    /// Most recent first.
    #[must_use]
    pub fn history(&self, limit: Option<usize>) -> &[WorkoutHistoryRecord] {
        let len = self.workout_history.len();
        &self.workout_history[..limit.map_or(len, |l| l.min(len))]
    }

    // --- Templates ---

    /// Look a template up by id, then by case-insensitive name.
    #[must_use]
    pub fn template(&self, id_or_name: &str) -> Option<&WorkoutTemplate> {
        let needle = id_or_name.trim();
        self.templates.iter().find(|t| t.id == needle).or_else(|| {
            let lower = needle.to_lowercase();
            self.templates
                .iter()
                .find(|t| t.name.to_lowercase() == lower)
        })
    }

    pub fn save_plan_as_template(&mut self, day: DateKey, name: &str) -> Option<WorkoutTemplate> {
        let plan = self.plan(day).filter(|p| !p.exercises.is_empty())?;
        let name = name.trim();
        let template = WorkoutTemplate {
            id: new_id(),
            name: if name.is_empty() {
                plan.name.clone()
            } else {
                name.to_string()
            },
            exercises: plan
                .exercises
                .iter()
                .map(|e| TemplateExercise {
                    name: e.name.clone(),
                    muscle_group: e.muscle_group.clone(),
                    sets: e.sets,
                    reps: e.reps,
                    weight: e.weight,
                    notes: e.notes.clone(),
                })
                .collect(),
        };
        self.templates.push(template.clone());
        debug!(id = %template.id, name = %template.name, "template saved");
        Some(template)
    }

    pub fn delete_template(&mut self, id: &str) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        self.templates.len() < before
    }

    // --- Catalogue & records ---

    #[must_use]
    pub fn library_exercise(&self, id_or_name: &str) -> Option<&LibraryExercise> {
        let needle = id_or_name.trim();
        self.exercises.iter().find(|e| e.id == needle).or_else(|| {
            let lower = needle.to_lowercase();
            self.exercises
                .iter()
                .find(|e| e.name.to_lowercase() == lower)
        })
    }

    /// Sorted by display name.
    #[must_use]
    pub fn personal_records(&self) -> Vec<&PersonalRecord> {
        let mut records: Vec<&PersonalRecord> = self.personal_records.values().collect();
        records.sort_by_cached_key(|r| r.name.to_lowercase());
        records
    }

    #[must_use]
    pub fn personal_record(&self, name: &str) -> Option<&PersonalRecord> {
        self.personal_records.get(&normalize_exercise_name(name))
    }
}
