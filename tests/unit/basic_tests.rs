/// Basic unit tests to verify core functionality
use habit_tracker_api::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            "Test Habit".to_string(),
            Some("A test habit".to_string()),
            Frequency::Daily,
            Status::Active,
            0,
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.title, "Test Habit");
        assert_eq!(habit.created_at, habit.updated_at);
        assert!(habit.deleted_at.is_none());
    }

    #[test]
    fn test_progress_creation() {
        let habit_id = HabitId::new();
        let today = chrono::Utc::now().naive_utc().date();

        let progress = DailyProgress::new(habit_id.clone(), today);
        assert_eq!(progress.habit_id, habit_id);
        assert_eq!(progress.day, today);
        assert_eq!(progress.count, 1);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(Frequency::parse("weekly"), Some(Frequency::Weekly));
        assert_eq!(Frequency::Monthly.as_str(), "monthly");
        assert_eq!(Frequency::parse("hourly"), None);

        assert_eq!(Status::parse("archived"), Some(Status::Archived));
        assert_eq!(Status::Paused.as_str(), "paused");

        // JSON names match the stored names
        let json = serde_json::to_string(&Frequency::Daily).unwrap();
        assert_eq!(json, "\"daily\"");
        let json = serde_json::to_string(&Status::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }

    #[test]
    fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitApiServer::new(temp_file.path().to_path_buf());
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
    }
}
