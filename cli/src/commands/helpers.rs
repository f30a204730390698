use anyhow::{Context, Result};
use serde::Serialize;
use std::process;

use daybook_core::date::DateKey;

use super::Service;

/// Accepts YYYY-MM-DD or today/yesterday/tomorrow; `None` means today.
pub(crate) fn parse_date(date_str: Option<String>) -> Result<DateKey> {
    let today = DateKey::today();
    match date_str {
        None => Ok(today),
        Some(s) => match s.trim().to_lowercase().as_str() {
            "today" => Ok(today),
            "yesterday" => Ok(today.add_days(-1)),
            "tomorrow" => Ok(today.add_days(1)),
            _ => DateKey::parse(&s).with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            }),
        },
    }
}

/// Like [`parse_date`], but a missing date means the selected day.
pub(crate) fn resolve_day(svc: &Service, date_str: Option<String>) -> Result<DateKey> {
    match date_str {
        None => Ok(svc.selected_date()),
        Some(_) => parse_date(date_str),
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Report a missing id and exit 2.
pub(crate) fn exit_not_found(message: &str, json: bool) -> ! {
    if json {
        println!("{}", json_error(message));
    } else {
        eprintln!("{message}");
    }
    process::exit(2);
}

/// Print the outcome of an id-addressed change, or exit 2 if nothing matched.
pub(crate) fn report_change(changed: bool, id: &str, done: &str, json: bool) -> Result<()> {
    if !changed {
        exit_not_found(&format!("Nothing to do for {id}"), json);
    }
    if json {
        println!("{}", serde_json::json!({ "id": id, "result": done }));
    } else {
        println!("{done} {id}");
    }
    Ok(())
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn fmt_opt<T: std::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let keep = max.saturating_sub(3);
        let end = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

/// First eight characters of a uuid, enough to tell rows apart in a table.
pub(crate) fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(i, _)| &id[..i])
}

/// Expand a unique id prefix (as shown in tables) to the full id. Anything
/// ambiguous or unknown is passed through unchanged.
pub(crate) fn expand_id<'a>(prefix: &str, ids: impl IntoIterator<Item = &'a str>) -> String {
    let prefix = prefix.trim();
    let mut matches = ids.into_iter().filter(|id| id.starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(id), None) if !prefix.is_empty() => id.to_string(),
        _ => prefix.to_string(),
    }
}
