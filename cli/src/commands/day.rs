use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use daybook_core::date::DateKey;
use daybook_core::engine::{FoodStatus, WorkoutStatus};
use daybook_core::models::{EntryStatus, MealBucket};

use super::Service;
use super::helpers::{no_neg_zero, parse_date, print_json, resolve_day, short_id};

pub(crate) fn cmd_today(svc: &Service, date: Option<String>, json: bool) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let overview = svc.overview(day);
    let streak = svc.streak(day);

    if json {
        #[derive(Serialize)]
        struct TodayView<'a> {
            #[serde(flatten)]
            overview: &'a daybook_core::engine::DayOverview,
            streak: u32,
            entries: Vec<&'a daybook_core::models::FoodEntry>,
        }
        return print_json(&TodayView {
            overview: &overview,
            streak,
            entries: svc.food_entries(day, None),
        });
    }

    let state = match svc.day(day).closed_at {
        Some(at) if overview.closed => {
            format!("closed at {}", at.with_timezone(&Local).format("%H:%M"))
        }
        _ if overview.closed => "closed".to_string(),
        _ => "open".to_string(),
    };
    println!("=== {day} ({state}) ===\n");

    let food = match overview.food {
        FoodStatus::Logged(n) => format!("logged ({n})"),
        FoodStatus::Planned(n) => format!("planned ({n})"),
        FoodStatus::NotLogged => "not logged".to_string(),
    };
    let t = &overview.totals;
    let cal = no_neg_zero(t.calories);
    let protein = no_neg_zero(t.protein);
    let cal_target = overview.calorie_target;
    let protein_target = overview.protein_target;
    let protein_line = format!("P:{protein:.0} / {protein_target:.0}g");
    println!("  Food:      {food} | {cal:.0} / {cal_target:.0} kcal | {protein_line}");

    let workout = match (&overview.workout, &overview.workout_name) {
        (WorkoutStatus::Completed, Some(name)) => format!("{name} (completed)"),
        (WorkoutStatus::Planned, Some(name)) => format!("{name} (planned)"),
        _ => "not logged".to_string(),
    };
    println!("  Workout:   {workout}");
    if overview.weigh_in_due {
        println!("  Weigh-in:  due today");
    }
    let momentum = overview.momentum * 100.0;
    println!("  Momentum:  {momentum:.0}%");
    println!("  Streak:    {streak} day(s)");
    println!("\n  {}", overview.close_hint);

    print_meals(svc, day);
    Ok(())
}

fn print_meals(svc: &Service, day: DateKey) {
    for bucket in MealBucket::ALL {
        let entries = svc.food_entries(day, Some(bucket));
        if entries.is_empty() {
            continue;
        }
        let subtotal = svc.food_totals(day, Some(bucket)).calories;
        println!(
            "\n  {} ({subtotal:.0} kcal)",
            bucket.as_str().to_uppercase()
        );
        for e in entries {
            let m = e.macros();
            let planned = if e.status == EntryStatus::Planned {
                " (planned)"
            } else {
                ""
            };
            let serving = if e.serving_label.is_empty() {
                format!("{}x", e.quantity)
            } else {
                format!("{} x {}", e.quantity, e.serving_label)
            };
            println!(
                "    [{}] {} - {serving} - {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g{planned}",
                short_id(&e.id),
                e.name,
                no_neg_zero(m.calories),
                no_neg_zero(m.protein),
                no_neg_zero(m.carbs),
                no_neg_zero(m.fat),
            );
        }
    }
}

pub(crate) fn cmd_close(svc: &mut Service, date: Option<String>, json: bool) -> Result<()> {
    let day = resolve_day(svc, date)?;
    svc.close_day(day)?;
    let streak = svc.streak(day);

    if json {
        println!(
            "{}",
            serde_json::json!({ "date": day, "closed": true, "streak": streak })
        );
    } else {
        println!("Closed {day}. Streak: {streak} day(s)");
    }
    Ok(())
}

pub(crate) fn cmd_reopen(svc: &mut Service, date: Option<String>, json: bool) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let reopened = svc.reopen_day(day)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "date": day, "closed": false, "changed": reopened })
        );
    } else if reopened {
        println!("Reopened {day}");
    } else {
        println!("{day} is already open");
    }
    Ok(())
}

pub(crate) fn cmd_streak(svc: &Service, date: Option<String>, json: bool) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let streak = svc.streak(day);

    if json {
        println!("{}", serde_json::json!({ "date": day, "streak": streak }));
    } else {
        println!("{streak} day(s) closed in a row through {day}");
    }
    Ok(())
}

pub(crate) fn cmd_select(svc: &mut Service, date: Option<String>, json: bool) -> Result<()> {
    if date.is_some() {
        svc.select_date(parse_date(date)?)?;
    }
    let selected = svc.selected_date();

    if json {
        println!("{}", serde_json::json!({ "selected_date": selected }));
    } else {
        println!("Selected date: {selected}");
    }
    Ok(())
}
