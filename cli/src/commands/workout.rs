use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use daybook_core::date::DateKey;
use daybook_core::models::{ExerciseEntry, ExerciseField};

use super::Service;
use super::helpers::{
    exit_not_found, expand_id, fmt_opt, print_json, report_change, resolve_day, short_id, truncate,
};

fn exercise_id(svc: &Service, day: DateKey, id: &str) -> String {
    let ids = svc
        .day(day)
        .workout
        .iter()
        .flat_map(|p| p.exercises.iter())
        .map(|e| e.id.as_str());
    expand_id(id, ids)
}

fn template_id(svc: &Service, id_or_name: &str, json: bool) -> String {
    let templates = svc.templates();
    let id = expand_id(id_or_name, templates.iter().map(|t| t.id.as_str()));
    match svc.state().template(&id) {
        Some(t) => t.id.clone(),
        None => exit_not_found(&format!("No template '{id_or_name}'"), json),
    }
}

fn print_exercise_table(exercises: &[ExerciseEntry]) {
    #[derive(Tabled)]
    struct ExerciseRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Exercise")]
        name: String,
        #[tabled(rename = "Muscle")]
        muscle: String,
        #[tabled(rename = "Sets")]
        sets: String,
        #[tabled(rename = "Reps")]
        reps: String,
        #[tabled(rename = "Weight")]
        weight: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<ExerciseRow> = exercises
        .iter()
        .map(|e| ExerciseRow {
            id: short_id(&e.id).to_string(),
            name: truncate(&e.name, 30),
            muscle: e.muscle_group.clone(),
            sets: fmt_opt(e.sets),
            reps: fmt_opt(e.reps),
            weight: fmt_opt(e.weight),
            notes: truncate(&e.notes, 30),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}

pub(crate) fn cmd_workout_show(svc: &Service, date: Option<String>, json: bool) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let Some(plan) = svc.day(day).workout.as_ref() else {
        exit_not_found(&format!("No workout planned for {day}"), json);
    };
    if json {
        return print_json(plan);
    }
    let state = if plan.completed {
        "completed"
    } else {
        "planned"
    };
    println!("=== {} on {day} ({state}) ===\n", plan.name);
    if plan.exercises.is_empty() {
        println!("  No exercises yet. Add one with `daybook workout add`");
    } else {
        print_exercise_table(&plan.exercises);
    }
    Ok(())
}

pub(crate) fn cmd_workout_plan(
    svc: &mut Service,
    name: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let plan = svc.plan_workout(day, name)?;
    if json {
        return print_json(&plan);
    }
    println!("Planned '{}' for {day}", plan.name);
    Ok(())
}

pub(crate) fn cmd_workout_template(
    svc: &mut Service,
    id_or_name: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let id = template_id(svc, id_or_name, json);
    let Some(plan) = svc.apply_template(day, &id)? else {
        exit_not_found(&format!("No template '{id_or_name}'"), json);
    };
    if json {
        return print_json(&plan);
    }
    println!("Planned '{}' for {day}\n", plan.name);
    print_exercise_table(&plan.exercises);
    Ok(())
}

pub(crate) fn cmd_workout_templates(svc: &Service, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct TemplateRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Exercises")]
        exercises: String,
    }

    let templates = svc.templates();
    if json {
        return print_json(templates);
    }
    if templates.is_empty() {
        eprintln!("No templates");
        process::exit(2);
    }
    let rows: Vec<TemplateRow> = templates
        .iter()
        .map(|t| TemplateRow {
            id: short_id(&t.id).to_string(),
            name: t.name.clone(),
            exercises: truncate(
                &t.exercises
                    .iter()
                    .map(|e| e.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                70,
            ),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_workout_save_template(
    svc: &mut Service,
    name: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let Some(template) = svc.save_plan_as_template(day, name)? else {
        exit_not_found(&format!("No exercises planned for {day}"), json);
    };
    if json {
        return print_json(&template);
    }
    println!(
        "Saved template '{}' with {} exercise(s) [{}]",
        template.name,
        template.exercises.len(),
        short_id(&template.id)
    );
    Ok(())
}

pub(crate) fn cmd_workout_delete_template(
    svc: &mut Service,
    id_or_name: &str,
    json: bool,
) -> Result<()> {
    let id = template_id(svc, id_or_name, json);
    let changed = svc.delete_template(&id)?;
    report_change(changed, &id, "Deleted template", json)
}

/// Catalogue exercises are matched by id or name; anything else is added as
/// a custom exercise.
pub(crate) fn cmd_workout_add(
    svc: &mut Service,
    exercise: &str,
    muscle: Option<&str>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let catalogue_id = svc.state().library_exercise(exercise).map(|e| e.id.clone());
    let entry = match catalogue_id {
        Some(id) if muscle.is_none() => svc.add_exercise_from_library(day, &id)?,
        _ => None,
    };
    let entry = match entry {
        Some(entry) => entry,
        None => svc.add_exercise(day, exercise, muscle.unwrap_or_default())?,
    };

    if json {
        return print_json(&entry);
    }
    println!("Added {} to {day} [{}]", entry.name, short_id(&entry.id));
    Ok(())
}

pub(crate) fn cmd_workout_remove(
    svc: &mut Service,
    id: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let id = exercise_id(svc, day, id);
    let changed = svc.remove_exercise(day, &id)?;
    report_change(changed, &id, "Removed", json)
}

pub(crate) fn cmd_workout_set(
    svc: &mut Service,
    id: &str,
    field: &str,
    value: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let field = ExerciseField::parse(field)?;
    let id = exercise_id(svc, day, id);
    let changed = svc.update_exercise_field(day, &id, field, value)?;
    report_change(changed, &id, "Updated", json)
}

pub(crate) fn cmd_workout_complete(
    svc: &mut Service,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let record = svc.mark_complete(day)?;
    if json {
        return print_json(&record);
    }
    println!(
        "Completed '{}' on {day} ({} exercise(s))",
        record.name,
        record.exercises.len()
    );
    Ok(())
}

pub(crate) fn cmd_workout_undo(svc: &mut Service, date: Option<String>, json: bool) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let changed = svc.undo_complete(day)?;
    report_change(changed, &day.to_string(), "Un-completed workout for", json)
}

pub(crate) fn cmd_workout_history(svc: &Service, limit: Option<usize>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Workout")]
        name: String,
        #[tabled(rename = "Exercises")]
        exercises: usize,
    }

    let history = svc.history(limit);
    if json {
        return print_json(history);
    }
    if history.is_empty() {
        eprintln!("No completed workouts");
        process::exit(2);
    }
    let rows: Vec<HistoryRow> = history
        .iter()
        .map(|r| HistoryRow {
            id: short_id(&r.id).to_string(),
            date: r.date.to_string(),
            name: r.name.clone(),
            exercises: r.exercises.len(),
        })
        .collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_workout_delete_history(svc: &mut Service, id: &str, json: bool) -> Result<()> {
    let id = expand_id(id, svc.history(None).iter().map(|r| r.id.as_str()));
    let changed = svc.delete_history_record(&id)?;
    report_change(changed, &id, "Deleted", json)
}

pub(crate) fn cmd_workout_prs(svc: &Service, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct PrRow {
        #[tabled(rename = "Exercise")]
        name: String,
        #[tabled(rename = "Best weight")]
        weight: String,
        #[tabled(rename = "Best reps")]
        reps: String,
        #[tabled(rename = "Updated")]
        updated: String,
    }

    let records = svc.personal_records();
    if json {
        return print_json(&records);
    }
    if records.is_empty() {
        eprintln!("No personal records yet");
        process::exit(2);
    }
    let rows: Vec<PrRow> = records
        .iter()
        .map(|r| PrRow {
            name: r.name.clone(),
            weight: fmt_opt(r.best_weight),
            reps: fmt_opt(r.best_reps),
            updated: r.updated_at.format("%Y-%m-%d").to_string(),
        })
        .collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

pub(crate) fn cmd_workout_exercises(svc: &Service, muscle: Option<&str>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct CatalogueRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Exercise")]
        name: String,
        #[tabled(rename = "Muscle")]
        muscle: String,
        #[tabled(rename = "Equipment")]
        equipment: String,
    }

    let filter = muscle.map(str::to_lowercase);
    let exercises: Vec<_> = svc
        .exercises()
        .iter()
        .filter(|e| {
            filter
                .as_deref()
                .is_none_or(|m| e.muscle_group.to_lowercase().contains(m))
        })
        .collect();

    if json {
        return print_json(&exercises);
    }
    if exercises.is_empty() {
        eprintln!("No exercises match");
        process::exit(2);
    }
    let rows: Vec<CatalogueRow> = exercises
        .iter()
        .map(|e| CatalogueRow {
            id: e.id.clone(),
            name: e.name.clone(),
            muscle: e.muscle_group.clone(),
            equipment: e.equipment.clone(),
        })
        .collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}
