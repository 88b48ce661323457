/// Read operations: single-habit detail lookup and the habit list
///
/// Both attach today's completion count. The list resolves counts for all
/// habits with one batched query over the day's progress rows rather than
/// one lookup per habit.

use crate::domain::HabitId;
use crate::service::{today, HabitView, ServiceError};
use crate::storage::HabitStore;

/// Get one live habit with today's completion count attached
///
/// Fails with `NotFound` when the id does not exist or the habit has been
/// soft-deleted.
pub fn get_habit<S: HabitStore>(
    storage: &S,
    habit_id: &HabitId,
) -> Result<HabitView, ServiceError> {
    let habit = storage.get_habit(habit_id)?;
    let count = storage.daily_count(habit_id, today())?;

    Ok(HabitView::from_habit(habit, count))
}

/// List all live habits, most recently created first
///
/// Today's counts come from a single query keyed on the current day,
/// joined to the habits in memory.
pub fn list_habits<S: HabitStore>(storage: &S) -> Result<Vec<HabitView>, ServiceError> {
    let habits = storage.list_habits()?;
    let counts = storage.daily_counts_for_day(today())?;

    let views = habits
        .into_iter()
        .map(|habit| {
            let count = counts.get(&habit.id).copied().unwrap_or(0);
            HabitView::from_habit(habit, count)
        })
        .collect();

    Ok(views)
}
