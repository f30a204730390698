mod day;
mod food;
mod helpers;
mod library;
mod settings;
mod summary;
mod weigh;
mod workout;

pub(crate) type Service = daybook_core::service::DaybookService;

pub(crate) use day::{cmd_close, cmd_reopen, cmd_select, cmd_streak, cmd_today};
pub(crate) use food::{
    cmd_food_add, cmd_food_delete, cmd_food_list, cmd_food_log, cmd_food_log_meal, cmd_food_repeat,
    cmd_food_restore,
};
pub(crate) use library::{
    cmd_library_add, cmd_library_delete, cmd_library_favorite, cmd_library_list,
};
pub(crate) use settings::{cmd_reset, cmd_settings_set, cmd_settings_show};
pub(crate) use summary::{cmd_history, cmd_week};
pub(crate) use weigh::{cmd_weigh_delete, cmd_weigh_list, cmd_weigh_log, cmd_weigh_restore};
pub(crate) use workout::{
    cmd_workout_add, cmd_workout_complete, cmd_workout_delete_history, cmd_workout_delete_template,
    cmd_workout_exercises, cmd_workout_history, cmd_workout_plan, cmd_workout_prs,
    cmd_workout_remove, cmd_workout_save_template, cmd_workout_set, cmd_workout_show,
    cmd_workout_template, cmd_workout_templates, cmd_workout_undo,
};
