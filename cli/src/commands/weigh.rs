use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use daybook_core::date::DateKey;

use super::Service;
use super::helpers::{expand_id, print_json, report_change, resolve_day, short_id};

fn weigh_in_id(svc: &Service, id: &str) -> String {
    expand_id(id, svc.state().weigh_ins.iter().map(|w| w.id.as_str()))
}

pub(crate) fn cmd_weigh_log(
    svc: &mut Service,
    weight: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let day = resolve_day(svc, date)?;
    let Some(entry) = svc.add_weigh_in(day, weight)? else {
        anyhow::bail!("Weight must be a positive number, got {weight}");
    };
    if json {
        return print_json(&entry);
    }
    println!(
        "Logged {:.1} for {day} [{}]",
        entry.weight,
        short_id(&entry.id)
    );
    Ok(())
}

pub(crate) fn cmd_weigh_delete(svc: &mut Service, id: &str, json: bool) -> Result<()> {
    let id = weigh_in_id(svc, id);
    let changed = svc.delete_weigh_in(&id)?;
    report_change(changed, &id, "Deleted", json)
}

pub(crate) fn cmd_weigh_restore(svc: &mut Service, id: &str, json: bool) -> Result<()> {
    let id = weigh_in_id(svc, id);
    let changed = svc.restore_weigh_in(&id)?;
    report_change(changed, &id, "Restored", json)
}

pub(crate) fn cmd_weigh_list(svc: &Service, limit: Option<usize>, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct WeighRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Weight")]
        weight: String,
        #[tabled(rename = "Change")]
        change: String,
    }

    let entries = svc.weigh_ins(limit);
    if json {
        return print_json(&entries);
    }
    if entries.is_empty() {
        eprintln!("No weigh-ins recorded");
        process::exit(2);
    }

    // entries are newest first, so the change is against the next row down
    let rows: Vec<WeighRow> = entries
        .iter()
        .enumerate()
        .map(|(i, w)| WeighRow {
            id: short_id(&w.id).to_string(),
            date: w.date.to_string(),
            weight: format!("{:.1}", w.weight),
            change: entries
                .get(i + 1)
                .map_or_else(|| "-".to_string(), |prev| {
                    format!("{:+.1}", w.weight - prev.weight)
                }),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    if svc.is_weigh_in_due(DateKey::today()) {
        println!("\nWeigh-in due today");
    }
    Ok(())
}
