/// Operation for partially updating existing habits
///
/// Update is a merge-patch: only fields present in the payload are applied.
/// The nullable `description` distinguishes "absent" from "explicitly null";
/// the latter clears the stored value.

use chrono::Utc;
use serde::{Deserialize, Deserializer};

use crate::domain::{Frequency, HabitId, HabitPatch, Status};
use crate::service::{today, HabitView, ServiceError};
use crate::storage::HabitStore;

/// Parameters for updating an existing habit
///
/// Deserialized from a JSON merge-patch body. A field that is absent stays
/// `None`; `description` uses the double-option encoding so `null` arrives
/// as `Some(None)`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateHabitParams {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub status: Option<Status>,
    pub history_count: Option<u32>,
}

/// Deserialize a present-but-possibly-null field into the outer `Some`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl UpdateHabitParams {
    fn into_patch(self) -> HabitPatch {
        HabitPatch {
            title: self.title,
            description: self.description,
            frequency: self.frequency,
            status: self.status,
            history_count: self.history_count,
        }
    }
}

/// Apply a merge-patch to a live habit
///
/// Fails with `NotFound` for missing or soft-deleted habits. `updated_at`
/// is refreshed even when the patch is empty. Note that `history_count`
/// can be overwritten directly through this path; it is deliberately not
/// coupled to the completion accounting.
pub fn update_habit<S: HabitStore>(
    storage: &S,
    habit_id: &HabitId,
    params: UpdateHabitParams,
) -> Result<HabitView, ServiceError> {
    let mut habit = storage.get_habit(habit_id)?;

    habit.apply_patch(params.into_patch(), Utc::now())?;
    storage.update_habit(&habit)?;

    let count = storage.daily_count(habit_id, today())?;
    Ok(HabitView::from_habit(habit, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{create_habit, CreateHabitParams};
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
                title: "Drink water".to_string(),
                description: Some("Eight glasses".to_string()),
                frequency: Frequency::Daily,
                status: Status::Active,
                history_count: 0,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_update_status_only() {
        let (_dir, storage) = test_storage();
        let created = create_default(&storage);

        let params = UpdateHabitParams {
            status: Some(Status::Paused),
            ..Default::default()
        };
        let updated = update_habit(&storage, &created.id, params).unwrap();

        assert_eq!(updated.status, Status::Paused);
        assert_eq!(updated.title, "Drink water");
        assert_eq!(updated.description, Some("Eight glasses".to_string()));
        assert_eq!(updated.frequency, Frequency::Daily);
        assert_eq!(updated.history_count, 0);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_clears_description_on_explicit_null() {
        let (_dir, storage) = test_storage();
        let created = create_default(&storage);

        // JSON null for description arrives as Some(None)
        let params: UpdateHabitParams =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(params.description, Some(None));

        let updated = update_habit(&storage, &created.id, params).unwrap();
        assert_eq!(updated.description, None);

        // Whereas a body without the field leaves it untouched
        let recreated = create_default(&storage);
        let params: UpdateHabitParams = serde_json::from_str(r#"{"title": "Tea"}"#).unwrap();
        assert_eq!(params.description, None);
        let updated = update_habit(&storage, &recreated.id, params).unwrap();
        assert_eq!(updated.description, Some("Eight glasses".to_string()));
        assert_eq!(updated.title, "Tea");
    }

    #[test]
    fn test_update_may_overwrite_history_count() {
        let (_dir, storage) = test_storage();
        let created = create_default(&storage);

        let params = UpdateHabitParams {
            history_count: Some(42),
            ..Default::default()
        };
        let updated = update_habit(&storage, &created.id, params).unwrap();
        assert_eq!(updated.history_count, 42);
    }

    #[test]
    fn test_update_nonexistent_habit() {
        let (_dir, storage) = test_storage();

        let result = update_habit(&storage, &HabitId::new(), UpdateHabitParams::default());
        assert!(matches!(result, Err(ServiceError::NotFound { .. })));
    }
}
