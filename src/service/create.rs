/// Operation for creating new habits

use serde::Deserialize;

use crate::domain::{Frequency, Habit, Status};
use crate::service::{HabitView, ServiceError};
use crate::storage::HabitStore;

/// Parameters for creating a new habit
///
/// `status` defaults to active and `history_count` to 0 when omitted, the
/// same defaults a bare create request carries on the wire.
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub frequency: Frequency,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub history_count: u32,
}

/// Create a new habit and persist it
///
/// Always succeeds given valid input; there is no uniqueness constraint on
/// titles. The returned view carries a zero today-count - a fresh habit has
/// no progress rows yet.
pub fn create_habit<S: HabitStore>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<HabitView, ServiceError> {
    let habit = Habit::new(
        params.title,
        params.description,
        params.frequency,
        params.status,
        params.history_count,
    )?;

    storage.insert_habit(&habit)?;

    Ok(HabitView::from_habit(habit, 0))
}
