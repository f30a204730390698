use anyhow::{Result, bail};

use daybook_core::coerce;

use super::Service;
use super::helpers::print_json;

const DAY_NAMES: &[&str] = &[
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn day_name(weekday: u8) -> &'static str {
    DAY_NAMES
        .get(usize::from(weekday))
        .copied()
        .unwrap_or("Sunday")
}

/// Weekday index, 0 = Sunday.
fn parse_weekday(day: &str) -> Result<u8> {
    match day.trim().to_lowercase().as_str() {
        "sunday" | "sun" | "0" => Ok(0),
        "monday" | "mon" | "1" => Ok(1),
        "tuesday" | "tue" | "2" => Ok(2),
        "wednesday" | "wed" | "3" => Ok(3),
        "thursday" | "thu" | "4" => Ok(4),
        "friday" | "fri" | "5" => Ok(5),
        "saturday" | "sat" | "6" => Ok(6),
        _ => bail!("Invalid day: {day}. Use sunday-saturday or sun-sat"),
    }
}

pub(crate) fn cmd_settings_show(svc: &Service, json: bool) -> Result<()> {
    let settings = svc.settings();
    if json {
        return print_json(settings);
    }
    println!("Calorie target: {:.0} kcal", settings.calorie_target);
    println!("Protein target: {:.0}g", settings.protein_target);
    println!("Weigh-in day:   {}", day_name(settings.weigh_in_weekday));
    Ok(())
}

pub(crate) fn cmd_settings_set(
    svc: &mut Service,
    calories: Option<&str>,
    protein: Option<&str>,
    weigh_in_day: Option<&str>,
    json: bool,
) -> Result<()> {
    if calories.is_none() && protein.is_none() && weigh_in_day.is_none() {
        bail!("Nothing to set. Pass --calories, --protein or --weigh-in-day");
    }

    let mut settings = *svc.settings();
    if let Some(c) = calories {
        settings.calorie_target = coerce::food_number(c);
    }
    if let Some(p) = protein {
        settings.protein_target = coerce::food_number(p);
    }
    if let Some(d) = weigh_in_day {
        settings.weigh_in_weekday = parse_weekday(d)?;
    }
    svc.save_settings(settings)?;

    if json {
        return print_json(svc.settings());
    }
    cmd_settings_show(svc, false)
}

pub(crate) fn cmd_reset(svc: &mut Service, yes: bool, json: bool) -> Result<()> {
    if !yes {
        bail!("This wipes every day, library item and weigh-in. Re-run with --yes to confirm");
    }
    svc.reset()?;
    if json {
        println!("{}", serde_json::json!({ "result": "reset" }));
    } else {
        println!("All data reset");
    }
    Ok(())
}
