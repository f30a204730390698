use thiserror::Error;

use crate::date::DateKey;

/// Conditions a caller is expected to detect and surface to the user.
///
/// Missing ids are not represented here: id-addressed mutations return
/// `false` instead, so Undo flows can replay them freely.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("{0} can't be closed yet: log food or a workout first")]
    NotClosable(DateKey),

    #[error("The workout for {0} has no exercises")]
    EmptyPlan(DateKey),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type TrackResult<T> = std::result::Result<T, TrackError>;
