use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use daybook_core::coerce;
use daybook_core::date::DateKey;
use daybook_core::models::{EntryStatus, FoodEntry, ManualFood, MealBucket};

use super::Service;
use super::helpers::{
    exit_not_found, expand_id, no_neg_zero, print_json, report_change, resolve_day, short_id,
    truncate,
};

fn status(planned: bool) -> EntryStatus {
    if planned {
        EntryStatus::Planned
    } else {
        EntryStatus::Logged
    }
}

fn entry_id(svc: &Service, day: DateKey, id: &str) -> String {
    expand_id(id, svc.day(day).foods.iter().map(|e| e.id.as_str()))
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_food_add(
    svc: &mut Service,
    name: &str,
    meal: &str,
    calories: Option<&str>,
    protein: Option<&str>,
    carbs: Option<&str>,
    fat: Option<&str>,
    serving: Option<&str>,
    quantity: Option<&str>,
    from_library: bool,
    planned: bool,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let bucket = MealBucket::parse(meal)?;
    let quantity = quantity.map(coerce::food_number);

    let entry = if from_library {
        let Some(item_id) = svc.find_library_item(name).map(|i| i.id.clone()) else {
            exit_not_found(&format!("No library item named '{name}'"), json);
        };
        match svc.add_library_food(day, bucket, &item_id, quantity, serving, status(planned))? {
            Some(entry) => entry,
            None => exit_not_found(&format!("No library item named '{name}'"), json),
        }
    } else {
        if name.trim().is_empty() {
            bail!("Food name can't be empty");
        }
        let food = ManualFood::from_inputs(
            name,
            serving.unwrap_or_default(),
            calories.unwrap_or_default(),
            protein.unwrap_or_default(),
            carbs.unwrap_or_default(),
            fat.unwrap_or_default(),
        );
        svc.add_food_entry(day, bucket, food, quantity, None, status(planned))?
    };

    if json {
        return print_json(&entry);
    }
    let m = entry.macros();
    let verb = if planned { "Planned" } else { "Logged" };
    println!(
        "{verb} {} for {bucket} on {day}: {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g [{}]",
        entry.name,
        no_neg_zero(m.calories),
        no_neg_zero(m.protein),
        no_neg_zero(m.carbs),
        no_neg_zero(m.fat),
        short_id(&entry.id),
    );
    Ok(())
}

pub(crate) fn cmd_food_log(
    svc: &mut Service,
    id: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let id = entry_id(svc, day, id);
    let changed = svc.mark_logged(day, &id)?;
    report_change(changed, &id, "Marked eaten", json)
}

pub(crate) fn cmd_food_log_meal(
    svc: &mut Service,
    meal: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let bucket = MealBucket::parse(meal)?;
    let changed = svc.mark_meal_logged(day, bucket)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "date": day, "meal": bucket, "marked": changed })
        );
    } else if changed == 0 {
        println!("Nothing planned for {bucket} on {day}");
    } else {
        println!("Marked {changed} {bucket} item(s) eaten on {day}");
    }
    Ok(())
}

pub(crate) fn cmd_food_repeat(
    svc: &mut Service,
    meal: &str,
    planned: bool,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let bucket = MealBucket::parse(meal)?;
    let copies = svc.repeat_last_meal(day, bucket, status(planned))?;

    if copies.is_empty() {
        exit_not_found(&format!("No earlier {bucket} to repeat"), json);
    }
    if json {
        return print_json(&copies);
    }
    println!("Copied {} item(s) into {bucket} on {day}", copies.len());
    for e in &copies {
        println!("  [{}] {}", short_id(&e.id), e.name);
    }
    Ok(())
}

pub(crate) fn cmd_food_delete(
    svc: &mut Service,
    id: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let id = entry_id(svc, day, id);
    let changed = svc.delete_food_entry(day, &id)?;
    report_change(changed, &id, "Deleted", json)
}

pub(crate) fn cmd_food_restore(svc: &mut Service, id: &str, json: bool) -> Result<()> {
    let id = expand_id(
        id,
        svc.state()
            .days
            .values()
            .flat_map(|d| d.foods.iter())
            .filter(|e| e.is_deleted())
            .map(|e| e.id.as_str()),
    );
    let changed = svc.restore_food_entry(&id)?;
    report_change(changed, &id, "Restored", json)
}

pub(crate) fn cmd_food_list(
    svc: &Service,
    meal: Option<&str>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let bucket = meal.map(MealBucket::parse).transpose()?;
    let entries = svc.food_entries(day, bucket);

    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        exit_not_found(&format!("No food for {day}"), false);
    }
    print_entry_table(&entries);

    let t = svc.food_totals(day, bucket);
    println!(
        "  TOTAL: {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g ({} logged, {} planned)",
        no_neg_zero(t.calories),
        no_neg_zero(t.protein),
        no_neg_zero(t.carbs),
        no_neg_zero(t.fat),
        t.logged_count,
        t.planned_count,
    );
    Ok(())
}

fn print_entry_table(entries: &[&FoodEntry]) {
    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Meal")]
        meal: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Qty")]
        quantity: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "Status")]
        status: String,
    }

    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|e| {
            let m = e.macros();
            EntryRow {
                id: short_id(&e.id).to_string(),
                meal: e.bucket.to_string(),
                name: truncate(&e.name, 30),
                quantity: if e.serving_label.is_empty() {
                    format!("{}", e.quantity)
                } else {
                    format!("{} x {}", e.quantity, truncate(&e.serving_label, 15))
                },
                calories: format!("{:.0}", no_neg_zero(m.calories)),
                protein: format!("{:.1}", no_neg_zero(m.protein)),
                carbs: format!("{:.1}", no_neg_zero(m.carbs)),
                fat: format!("{:.1}", no_neg_zero(m.fat)),
                status: match e.status {
                    EntryStatus::Logged => "logged".to_string(),
                    EntryStatus::Planned => "planned".to_string(),
                },
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..8)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
