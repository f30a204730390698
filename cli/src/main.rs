mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    Service, cmd_close, cmd_food_add, cmd_food_delete, cmd_food_list, cmd_food_log,
    cmd_food_log_meal, cmd_food_repeat, cmd_food_restore, cmd_history, cmd_library_add,
    cmd_library_delete, cmd_library_favorite, cmd_library_list, cmd_reopen, cmd_reset, cmd_select,
    cmd_settings_set, cmd_settings_show, cmd_streak, cmd_today, cmd_weigh_delete, cmd_weigh_list,
    cmd_weigh_log, cmd_weigh_restore, cmd_week, cmd_workout_add, cmd_workout_complete,
    cmd_workout_delete_history, cmd_workout_delete_template, cmd_workout_exercises,
    cmd_workout_history, cmd_workout_plan, cmd_workout_prs, cmd_workout_remove,
    cmd_workout_save_template, cmd_workout_set, cmd_workout_show, cmd_workout_template,
    cmd_workout_templates, cmd_workout_undo,
};
use crate::config::Config;

#[derive(Parser)]
#[command(
    name = "daybook",
    version,
    about = "Plan, log and close out your day: food, workouts and weigh-ins",
    long_about = "Plan, log and close out your day: food, workouts and weigh-ins.\n\n\
        Everything is stored locally. Close a day once something is logged to grow your streak."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard for a day
    Today {
        /// Date (YYYY-MM-DD, today, yesterday; default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Close a day once food or a workout is logged
    Close {
        /// Date (YYYY-MM-DD, today, yesterday; default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Reopen a closed day
    Reopen {
        /// Date (YYYY-MM-DD, today, yesterday; default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current streak of closed days
    Streak {
        /// Anchor date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change the selected date
    Select {
        /// New date to select; omit to print the current selection
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summary of the calendar week containing a date
    Week {
        /// Any date in the week (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-day history over the last N days
    History {
        /// Number of days to show (1-3650)
        #[arg(
            long,
            default_value_t = 7,
            value_parser = clap::value_parser!(u32).range(1..=3650)
        )]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log and plan food
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },
    /// Manage saved foods
    Library {
        #[command(subcommand)]
        command: LibraryCommands,
    },
    /// Plan, log and complete workouts
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
    /// Record body weight
    Weigh {
        #[command(subcommand)]
        command: WeighCommands,
    },
    /// Daily targets and weigh-in day
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Wipe all data and start over
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FoodCommands {
    /// Add a food entry, typed in or taken from the library
    Add {
        /// Food name (or library item name/id with --library)
        name: String,
        /// Meal: breakfast, lunch, dinner, snacks
        #[arg(short, long, default_value = "snacks")]
        meal: String,
        /// Take the food from the library
        #[arg(short, long)]
        library: bool,
        /// Calories per serving
        #[arg(long)]
        calories: Option<String>,
        /// Protein per serving (g)
        #[arg(long)]
        protein: Option<String>,
        /// Carbs per serving (g)
        #[arg(long)]
        carbs: Option<String>,
        /// Fat per serving (g)
        #[arg(long)]
        fat: Option<String>,
        /// Serving label (e.g. "1 cup")
        #[arg(long)]
        serving: Option<String>,
        /// Number of servings
        #[arg(short, long)]
        quantity: Option<String>,
        /// Add as planned instead of eaten
        #[arg(long)]
        planned: bool,
        /// Date (YYYY-MM-DD, today, yesterday; default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a planned entry as eaten
    Log {
        /// Entry ID (or unique prefix)
        id: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark every planned entry in a meal as eaten
    LogMeal {
        /// Meal: breakfast, lunch, dinner, snacks
        meal: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy the most recent earlier meal into this day
    Repeat {
        /// Meal: breakfast, lunch, dinner, snacks
        meal: String,
        /// Add the copies as planned
        #[arg(long)]
        planned: bool,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry (can be restored)
    Delete {
        /// Entry ID (or unique prefix)
        id: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore a deleted entry
    Restore {
        /// Entry ID (or unique prefix)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List entries for a day
    List {
        /// Only this meal
        #[arg(short, long)]
        meal: Option<String>,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum LibraryCommands {
    /// Save a food to the library
    Add {
        /// Food name
        name: String,
        /// Serving label (e.g. "1 cup")
        #[arg(long)]
        serving: Option<String>,
        /// Default number of servings
        #[arg(short, long)]
        quantity: Option<String>,
        /// Calories per serving
        #[arg(long)]
        calories: Option<String>,
        /// Protein per serving (g)
        #[arg(long)]
        protein: Option<String>,
        /// Carbs per serving (g)
        #[arg(long)]
        carbs: Option<String>,
        /// Fat per serving (g)
        #[arg(long)]
        fat: Option<String>,
        /// Mark as favorite
        #[arg(long)]
        favorite: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved foods, favorites first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Star (or unstar) a saved food
    Favorite {
        /// Item name or ID
        item: String,
        /// Remove the star instead
        #[arg(long)]
        off: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a saved food
    Delete {
        /// Item name or ID
        item: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WorkoutCommands {
    /// Show the workout for a day
    Show {
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start an empty workout plan
    Plan {
        /// Workout name
        #[arg(default_value = "Workout")]
        name: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Plan a workout from a template
    Template {
        /// Template name or ID
        template: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List workout templates
    Templates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save the day's plan as a template
    SaveTemplate {
        /// Template name
        name: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a template
    DeleteTemplate {
        /// Template name or ID
        template: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add an exercise (catalogue name/ID, or a custom name)
    Add {
        /// Exercise name or catalogue ID
        exercise: String,
        /// Muscle group for a custom exercise
        #[arg(long)]
        muscle: Option<String>,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove an exercise from the plan
    Remove {
        /// Exercise ID (or unique prefix)
        id: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set sets, reps, weight or notes on an exercise
    Set {
        /// Exercise ID (or unique prefix)
        id: String,
        /// Field: sets, reps, weight, notes
        field: String,
        /// New value (blank clears it)
        value: String,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark the day's workout complete
    Complete {
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Undo completing the day's workout
    Undo {
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Completed workouts, newest first
    History {
        /// Maximum number of records
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a completed workout record
    DeleteHistory {
        /// Record ID (or unique prefix)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Personal records per exercise
    Prs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse the exercise catalogue
    Exercises {
        /// Filter by muscle group
        #[arg(long)]
        muscle: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WeighCommands {
    /// Record a weigh-in
    Log {
        /// Body weight
        weight: f64,
        /// Date (default: selected day)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List weigh-ins, newest first
    List {
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a weigh-in (can be restored)
    Delete {
        /// Weigh-in ID (or unique prefix)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Restore a deleted weigh-in
    Restore {
        /// Weigh-in ID (or unique prefix)
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// Daily calorie target
        #[arg(long)]
        calories: Option<String>,
        /// Daily protein target (g)
        #[arg(long)]
        protein: Option<String>,
        /// Weigh-in day (sunday-saturday)
        #[arg(long)]
        weigh_in_day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// `RUST_LOG` wins when set and valid; otherwise warnings and errors only.
fn env_filter(spec: Option<&str>) -> EnvFilter {
    spec.filter(|s| !s.trim().is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn init_tracing() {
    let spec = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(spec.as_deref()))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = config.open_store()?;
    let mut svc = Service::load(store, config.engine)?;
    tracing::debug!(
        backend = ?config.backend,
        path = %config.data_path.display(),
        "opened store"
    );

    match cli.command {
        Commands::Today { date, json } => cmd_today(&svc, date, json),
        Commands::Close { date, json } => cmd_close(&mut svc, date, json),
        Commands::Reopen { date, json } => cmd_reopen(&mut svc, date, json),
        Commands::Streak { date, json } => cmd_streak(&svc, date, json),
        Commands::Select { date, json } => cmd_select(&mut svc, date, json),
        Commands::Week { date, json } => cmd_week(&svc, date, json),
        Commands::History { days, json } => cmd_history(&svc, days, json),
        Commands::Food { command } => match command {
            FoodCommands::Add {
                name,
                meal,
                library,
                calories,
                protein,
                carbs,
                fat,
                serving,
                quantity,
                planned,
                date,
                json,
            } => cmd_food_add(
                &mut svc,
                &name,
                &meal,
                calories.as_deref(),
                protein.as_deref(),
                carbs.as_deref(),
                fat.as_deref(),
                serving.as_deref(),
                quantity.as_deref(),
                library,
                planned,
                date,
                json,
            ),
            FoodCommands::Log { id, date, json } => cmd_food_log(&mut svc, &id, date, json),
            FoodCommands::LogMeal { meal, date, json } => {
                cmd_food_log_meal(&mut svc, &meal, date, json)
            }
            FoodCommands::Repeat {
                meal,
                planned,
                date,
                json,
            } => cmd_food_repeat(&mut svc, &meal, planned, date, json),
            FoodCommands::Delete { id, date, json } => cmd_food_delete(&mut svc, &id, date, json),
            FoodCommands::Restore { id, json } => cmd_food_restore(&mut svc, &id, json),
            FoodCommands::List { meal, date, json } => {
                cmd_food_list(&svc, meal.as_deref(), date, json)
            }
        },
        Commands::Library { command } => match command {
            LibraryCommands::Add {
                name,
                serving,
                quantity,
                calories,
                protein,
                carbs,
                fat,
                favorite,
                json,
            } => cmd_library_add(
                &mut svc,
                &name,
                serving.as_deref(),
                quantity.as_deref(),
                calories.as_deref(),
                protein.as_deref(),
                carbs.as_deref(),
                fat.as_deref(),
                favorite,
                json,
            ),
            LibraryCommands::List { json } => cmd_library_list(&svc, json),
            LibraryCommands::Favorite { item, off, json } => {
                cmd_library_favorite(&mut svc, &item, off, json)
            }
            LibraryCommands::Delete { item, json } => cmd_library_delete(&mut svc, &item, json),
        },
        Commands::Workout { command } => match command {
            WorkoutCommands::Show { date, json } => cmd_workout_show(&svc, date, json),
            WorkoutCommands::Plan { name, date, json } => {
                cmd_workout_plan(&mut svc, &name, date, json)
            }
            WorkoutCommands::Template {
                template,
                date,
                json,
            } => cmd_workout_template(&mut svc, &template, date, json),
            WorkoutCommands::Templates { json } => cmd_workout_templates(&svc, json),
            WorkoutCommands::SaveTemplate { name, date, json } => {
                cmd_workout_save_template(&mut svc, &name, date, json)
            }
            WorkoutCommands::DeleteTemplate { template, json } => {
                cmd_workout_delete_template(&mut svc, &template, json)
            }
            WorkoutCommands::Add {
                exercise,
                muscle,
                date,
                json,
            } => cmd_workout_add(&mut svc, &exercise, muscle.as_deref(), date, json),
            WorkoutCommands::Remove { id, date, json } => {
                cmd_workout_remove(&mut svc, &id, date, json)
            }
            WorkoutCommands::Set {
                id,
                field,
                value,
                date,
                json,
            } => cmd_workout_set(&mut svc, &id, &field, &value, date, json),
            WorkoutCommands::Complete { date, json } => cmd_workout_complete(&mut svc, date, json),
            WorkoutCommands::Undo { date, json } => cmd_workout_undo(&mut svc, date, json),
            WorkoutCommands::History { limit, json } => cmd_workout_history(&svc, limit, json),
            WorkoutCommands::DeleteHistory { id, json } => {
                cmd_workout_delete_history(&mut svc, &id, json)
            }
            WorkoutCommands::Prs { json } => cmd_workout_prs(&svc, json),
            WorkoutCommands::Exercises { muscle, json } => {
                cmd_workout_exercises(&svc, muscle.as_deref(), json)
            }
        },
        Commands::Weigh { command } => match command {
            WeighCommands::Log { weight, date, json } => {
                cmd_weigh_log(&mut svc, weight, date, json)
            }
            WeighCommands::List { limit, json } => cmd_weigh_list(&svc, limit, json),
            WeighCommands::Delete { id, json } => cmd_weigh_delete(&mut svc, &id, json),
            WeighCommands::Restore { id, json } => cmd_weigh_restore(&mut svc, &id, json),
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show { json } => cmd_settings_show(&svc, json),
            SettingsCommands::Set {
                calories,
                protein,
                weigh_in_day,
                json,
            } => cmd_settings_set(
                &mut svc,
                calories.as_deref(),
                protein.as_deref(),
                weigh_in_day.as_deref(),
                json,
            ),
        },
        Commands::Reset { yes, json } => cmd_reset(&mut svc, yes, json),
    }
}
