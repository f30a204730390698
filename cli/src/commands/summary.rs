use anyhow::Result;
use serde::Serialize;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use daybook_core::date::DateKey;

use super::Service;
use super::helpers::{no_neg_zero, print_json, resolve_day};

pub(crate) fn cmd_week(svc: &Service, date: Option<String>, json: bool) -> Result<()> {
    let anchor = resolve_day(svc, date)?;
    let summary = svc.weekly_summary(anchor);

    if json {
        return print_json(&summary);
    }

    println!(
        "=== Week {} to {} ===\n",
        summary.week_start, summary.week_end
    );
    println!("  Days closed:        {} / 7", summary.closed_days);
    println!("  Workouts completed: {}", summary.workouts_completed);
    if summary.food_days == 0 {
        println!("  Average intake:     no food logged this week");
    } else {
        let cal = no_neg_zero(summary.average_calories);
        let protein = no_neg_zero(summary.average_protein);
        println!(
            "  Average intake:     {cal:.0} kcal | P:{protein:.0}g (over {} day(s) with food)",
            summary.food_days
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct HistoryDay {
    date: DateKey,
    closed: bool,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    workout: Option<String>,
    workout_completed: bool,
    momentum: f64,
}

pub(crate) fn cmd_history(svc: &Service, days: u32, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Closed")]
        closed: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "Workout")]
        workout: String,
        #[tabled(rename = "Momentum")]
        momentum: String,
    }

    let today = DateKey::today();
    let history: Vec<HistoryDay> = (0..days)
        .map(|i| {
            let date = today.add_days(-i64::from(i));
            let record = svc.day(date);
            let totals = svc.food_totals(date, None);
            HistoryDay {
                date,
                closed: record.closed,
                calories: totals.calories,
                protein: totals.protein,
                carbs: totals.carbs,
                fat: totals.fat,
                workout: record.workout.as_ref().map(|w| w.name.clone()),
                workout_completed: record.has_completed_workout(),
                momentum: svc.momentum_score(date),
            }
        })
        .collect();

    if json {
        return print_json(&history);
    }

    if history
        .iter()
        .all(|d| !d.closed && d.workout.is_none() && d.calories <= 0.0)
    {
        eprintln!("Nothing recorded in the last {days} days");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = history
        .iter()
        .map(|d| {
            let cal = no_neg_zero(d.calories);
            let p = no_neg_zero(d.protein);
            let c = no_neg_zero(d.carbs);
            let f = no_neg_zero(d.fat);
            let momentum = d.momentum * 100.0;
            HistoryRow {
                date: d.date.to_string(),
                closed: if d.closed { "yes" } else { "" }.to_string(),
                calories: format!("{cal:.0}"),
                protein: format!("{p:.0}g"),
                carbs: format!("{c:.0}g"),
                fat: format!("{f:.0}g"),
                workout: match (&d.workout, d.workout_completed) {
                    (Some(name), true) => format!("{name} ✓"),
                    (Some(name), false) => name.clone(),
                    (None, _) => String::new(),
                },
                momentum: format!("{momentum:.0}%"),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..6)).with(Alignment::right()))
        .with(Modify::new(Columns::new(7..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
