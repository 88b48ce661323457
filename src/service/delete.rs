/// Operation for soft-deleting habits

use chrono::Utc;

use crate::domain::HabitId;
use crate::service::ServiceError;
use crate::storage::HabitStore;

/// Soft-delete a live habit
///
/// Stamps `deleted_at`; the row stays in the store but is logically absent
/// from every operation afterwards, so deleting twice fails with `NotFound`
/// rather than succeeding silently. Daily progress rows are left in place,
/// orphaned by design.
pub fn delete_habit<S: HabitStore>(storage: &S, habit_id: &HabitId) -> Result<(), ServiceError> {
    storage.soft_delete_habit(habit_id, Utc::now())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{create_habit, get_habit, CreateHabitParams};
    use crate::domain::{Frequency, Status};
    use crate::storage::SqliteStorage;
    use tempfile::tempdir;

    #[test]
    fn test_delete_then_double_delete() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let storage = SqliteStorage::new(db_path).unwrap();

        let created = create_habit(
            &storage,
            CreateHabitParams {
                title: "Meditate".to_string(),
                description: None,
                frequency: Frequency::Daily,
                status: Status::Active,
                history_count: 0,
            },
        )
        .unwrap();

        // First delete succeeds
        assert!(delete_habit(&storage, &created.id).is_ok());

        // The habit is now invisible to reads
        let result = get_habit(&storage, &created.id);
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));

        // Second delete reports not-found instead of succeeding silently
        let result = delete_habit(&storage, &created.id);
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }
}
