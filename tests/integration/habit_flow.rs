/// End-to-end tests driving the service operations against a real
/// SQLite store.
use std::sync::Arc;
use std::thread;

use habit_tracker_api::*;
use tempfile::tempdir;

fn open_storage(dir: &tempfile::TempDir) -> SqliteStorage {
    SqliteStorage::new(dir.path().join("habits.db")).expect("Failed to open storage")
}

fn create_daily(storage: &SqliteStorage, title: &str) -> HabitView {
    create_habit(
        storage,
        CreateHabitParams {
            title: title.to_string(),
            description: None,
            frequency: Frequency::Daily,
            status: Status::Active,
            history_count: 0,
        },
    )
    .expect("Failed to create habit")
}

#[test]
fn test_full_habit_lifecycle() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir);

    // Create "Drink water": active, no completions yet
    let created = create_daily(&storage, "Drink water");
    assert_eq!(created.status, Status::Active);
    assert_eq!(created.history_count, 0);
    assert_eq!(created.today_completions, 0);

    let fetched = get_habit(&storage, &created.id).unwrap();
    assert_eq!(fetched.created_at, fetched.updated_at);

    // First completion
    let view = complete_habit(&storage, &created.id).unwrap();
    assert_eq!(view.history_count, 1);
    assert_eq!(view.today_completions, 1);

    // Second completion the same day increments the same row
    let view = complete_habit(&storage, &created.id).unwrap();
    assert_eq!(view.history_count, 2);
    assert_eq!(view.today_completions, 2);

    // Delete, then every lookup path reports not-found
    delete_habit(&storage, &created.id).unwrap();
    assert!(matches!(
        get_habit(&storage, &created.id),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        update_habit(&storage, &created.id, UpdateHabitParams::default()),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        complete_habit(&storage, &created.id),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        delete_habit(&storage, &created.id),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn test_concurrent_completions_lose_nothing() {
    let dir = tempdir().unwrap();
    let storage = Arc::new(open_storage(&dir));
    let created = create_daily(&storage, "Pushups");

    // Several threads complete the same habit on the same day at once
    let threads: Vec<_> = (0..8)
        .map(|_| {
            let storage = Arc::clone(&storage);
            let habit_id = created.id.clone();
            thread::spawn(move || {
                complete_habit(storage.as_ref(), &habit_id).expect("Completion failed")
            })
        })
        .collect();
    for handle in threads {
        handle.join().unwrap();
    }

    // No increment was lost and no duplicate day row was created
    let view = get_habit(&storage, &created.id).unwrap();
    assert_eq!(view.history_count, 8);
    assert_eq!(view.today_completions, 8);

    let counts = storage.daily_counts_for_day(today()).unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts.get(&created.id), Some(&8));
}

#[test]
fn test_soft_delete_keeps_progress_rows() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir);
    let created = create_daily(&storage, "Journal");

    complete_habit(&storage, &created.id).unwrap();
    delete_habit(&storage, &created.id).unwrap();

    // The habit is gone from the list but its progress row survives
    assert!(list_habits(&storage).unwrap().is_empty());
    let counts = storage.daily_counts_for_day(today()).unwrap();
    assert_eq!(counts.get(&created.id), Some(&1));
}

#[test]
fn test_database_persistence() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("habits.db");

    let created = {
        let storage = SqliteStorage::new(db_path.clone()).unwrap();
        let created = create_daily(&storage, "Water plants");
        complete_habit(&storage, &created.id).unwrap();
        created
    };

    // Reopen the same database file and find the habit intact
    let storage = SqliteStorage::new(db_path).unwrap();
    let fetched = get_habit(&storage, &created.id).unwrap();
    assert_eq!(fetched.title, "Water plants");
    assert_eq!(fetched.history_count, 1);
    assert_eq!(fetched.today_completions, 1);
}

#[test]
fn test_create_defaults_from_wire() {
    let dir = tempdir().unwrap();
    let storage = open_storage(&dir);

    // A minimal JSON body gets the documented defaults
    let params: CreateHabitParams =
        serde_json::from_str(r#"{"title": "Drink water", "frequency": "daily"}"#).unwrap();
    let created = create_habit(&storage, params).unwrap();

    assert_eq!(created.status, Status::Active);
    assert_eq!(created.history_count, 0);
    assert_eq!(created.description, None);
}
