/// Operation for recording habit completions
///
/// One call is one completion event: the lifetime counter and today's
/// progress row move together inside a single storage transaction.

use chrono::Utc;

use crate::domain::HabitId;
use crate::service::{today, HabitView, ServiceError};
use crate::storage::HabitStore;

/// Record one completion for a live habit
///
/// Fails with `NotFound` for missing or soft-deleted habits. On success the
/// habit's `history_count` has grown by exactly one and the returned view
/// carries the post-increment count for today. The storage layer performs
/// the increment and the per-day upsert as one unit of work, so concurrent
/// completions can neither duplicate the day row nor lose an increment.
pub fn complete_habit<S: HabitStore>(
    storage: &S,
    habit_id: &HabitId,
) -> Result<HabitView, ServiceError> {
    let (habit, day_count) = storage.complete_habit(habit_id, today(), Utc::now())?;

    Ok(HabitView::from_habit(habit, day_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{create_habit, delete_habit, CreateHabitParams};
    use crate::domain::{Frequency, Status};
    use crate::storage::SqliteStorage;
    use tempfile::tempdir;

    fn test_storage() -> (tempfile::TempDir, SqliteStorage) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = SqliteStorage::new(db_path).unwrap();
        (temp_dir, storage)
    }

    fn create_default(storage: &SqliteStorage) -> HabitView {
        create_habit(
            storage,
            CreateHabitParams {
                title: "Stretch".to_string(),
                description: None,
                frequency: Frequency::Daily,
                status: Status::Active,
                history_count: 0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_repeated_completions_increment_one_row() {
        let (_dir, storage) = test_storage();
        let created = create_default(&storage);

        for expected in 1..=4u32 {
            let view = complete_habit(&storage, &created.id).unwrap();
            assert_eq!(view.history_count, expected);
            assert_eq!(view.today_completions, expected);
        }

        // Exactly one progress row exists for the day
        let counts = storage.daily_counts_for_day(today()).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&created.id), Some(&4));
    }

    #[test]
    fn test_complete_refreshes_updated_at() {
        let (_dir, storage) = test_storage();
        let created = create_default(&storage);

        let view = complete_habit(&storage, &created.id).unwrap();
        assert!(view.updated_at >= created.updated_at);
        assert_eq!(view.created_at, created.created_at);
    }

    #[test]
    fn test_complete_deleted_habit_is_not_found() {
        let (_dir, storage) = test_storage();
        let created = create_default(&storage);
        complete_habit(&storage, &created.id).unwrap();
        delete_habit(&storage, &created.id).unwrap();

        let result = complete_habit(&storage, &created.id);
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));

        // The failed attempt left no partial effect behind
        let counts = storage.daily_counts_for_day(today()).unwrap();
        assert_eq!(counts.get(&created.id), Some(&1));
    }
}
