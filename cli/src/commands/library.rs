use anyhow::{Result, bail};
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use daybook_core::coerce;
use daybook_core::models::NewLibraryItem;

use super::Service;
use super::helpers::{exit_not_found, expand_id, print_json, report_change, short_id, truncate};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_library_add(
    svc: &mut Service,
    name: &str,
    serving: Option<&str>,
    quantity: Option<&str>,
    calories: Option<&str>,
    protein: Option<&str>,
    carbs: Option<&str>,
    fat: Option<&str>,
    favorite: bool,
    json: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Library item name can't be empty");
    }
    let number = |v: Option<&str>| v.map_or(0.0, coerce::food_number);
    let item = svc.add_library_item(NewLibraryItem {
        name: name.to_string(),
        serving_label: serving.unwrap_or_default().to_string(),
        default_quantity: quantity.map_or(1.0, coerce::food_number),
        calories_per_serving: number(calories),
        protein_per_serving: number(protein),
        carbs_per_serving: number(carbs),
        fat_per_serving: number(fat),
        favorite,
    })?;

    if json {
        return print_json(&item);
    }
    let star = if item.favorite { " ★" } else { "" };
    let serving = if item.serving_label.is_empty() {
        "serving"
    } else {
        &item.serving_label
    };
    println!(
        "Added {}{star} ({:.0} kcal per {serving}) [{}]",
        item.name,
        item.calories_per_serving,
        short_id(&item.id),
    );
    Ok(())
}

pub(crate) fn cmd_library_list(svc: &Service, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "★")]
        favorite: String,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Serving")]
        serving: String,
        #[tabled(rename = "Cal")]
        calories: String,
        #[tabled(rename = "P")]
        protein: String,
        #[tabled(rename = "C")]
        carbs: String,
        #[tabled(rename = "F")]
        fat: String,
    }

    let items = svc.library_items();
    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        eprintln!("Food library is empty. Add one with `daybook library add`");
        process::exit(2);
    }

    let rows: Vec<ItemRow> = items
        .iter()
        .map(|i| ItemRow {
            id: short_id(&i.id).to_string(),
            favorite: if i.favorite { "★" } else { "" }.to_string(),
            name: truncate(&i.name, 35),
            serving: format!(
                "{} x {}",
                i.default_quantity,
                truncate(&i.serving_label, 15)
            ),
            calories: format!("{:.0}", i.calories_per_serving),
            protein: format!("{:.1}", i.protein_per_serving),
            carbs: format!("{:.1}", i.carbs_per_serving),
            fat: format!("{:.1}", i.fat_per_serving),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..8)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}

fn item_id(svc: &Service, id_or_name: &str, json: bool) -> String {
    if let Some(item) = svc.find_library_item(id_or_name) {
        return item.id.clone();
    }
    let id = expand_id(
        id_or_name,
        svc.library_items().iter().map(|i| i.id.as_str()),
    );
    match svc.find_library_item(&id) {
        Some(item) => item.id.clone(),
        None => exit_not_found(&format!("No library item '{id_or_name}'"), json),
    }
}

pub(crate) fn cmd_library_favorite(
    svc: &mut Service,
    id_or_name: &str,
    off: bool,
    json: bool,
) -> Result<()> {
    let id = item_id(svc, id_or_name, json);
    let changed = svc.set_favorite(&id, !off)?;
    let done = if off { "Unstarred" } else { "Starred" };
    report_change(changed, &id, done, json)
}

pub(crate) fn cmd_library_delete(svc: &mut Service, id_or_name: &str, json: bool) -> Result<()> {
    let id = item_id(svc, id_or_name, json);
    let changed = svc.delete_library_item(&id)?;
    report_change(changed, &id, "Deleted", json)
}
