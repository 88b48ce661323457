/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a recurring
/// intention a client wants to track, along with the merge-patch type used
/// by the update operation.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{DomainError, Frequency, HabitId, Status};

/// Maximum accepted length for a habit title
pub const MAX_TITLE_LEN: usize = 150;

/// A habit is a recurring intention with a frequency and lifecycle status
///
/// This is the core entity in the system. `history_count` is the running
/// total of completions since creation; per-day counts live in
/// [`DailyProgress`](crate::domain::DailyProgress) rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, generated at creation and immutable
    pub id: HabitId,
    /// Display title (e.g., "Drink water")
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// How often this habit is intended to be performed
    pub frequency: Frequency,
    /// Lifecycle status (active, paused, archived)
    pub status: Status,
    /// Total lifetime completions
    pub history_count: u32,
    /// When this habit was created (never changes)
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation (update, complete, delete)
    pub updated_at: DateTime<Utc>,
    /// Set on soft-delete; a non-null value means the habit is logically absent
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Partial field set applied by the update operation
///
/// `None` means the field was absent from the payload and is left untouched.
/// For the nullable `description`, `Some(None)` is an explicit null that
/// clears the field - distinguishable from absence.
#[derive(Debug, Clone, Default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub frequency: Option<Frequency>,
    pub status: Option<Status>,
    pub history_count: Option<u32>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// `created_at` and `updated_at` are both set to the same instant.
    pub fn new(
        title: String,
        description: Option<String>,
        frequency: Frequency,
        status: Status,
        history_count: u32,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;

        let now = Utc::now();
        Ok(Self {
            id: HabitId::new(),
            title,
            description,
            frequency,
            status,
            history_count,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Create a habit from existing data (used when loading from the database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer when loading rows.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        title: String,
        description: Option<String>,
        frequency: Frequency,
        status: Status,
        history_count: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            frequency,
            status,
            history_count,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    /// Apply a merge-patch to this habit
    ///
    /// Only fields present in the patch are changed; `updated_at` is always
    /// refreshed to `now`, even for an empty patch. `created_at`, `id` and
    /// `deleted_at` are never touched by this path.
    pub fn apply_patch(&mut self, patch: HabitPatch, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(ref new_title) = patch.title {
            Self::validate_title(new_title)?;
        }

        if let Some(new_title) = patch.title {
            self.title = new_title;
        }
        if let Some(new_description) = patch.description {
            self.description = new_description;
        }
        if let Some(new_frequency) = patch.frequency {
            self.frequency = new_frequency;
        }
        if let Some(new_status) = patch.status {
            self.status = new_status;
        }
        if let Some(new_history_count) = patch.history_count {
            self.history_count = new_history_count;
        }
        self.updated_at = now;

        Ok(())
    }

    /// Whether this habit has been soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Validate a habit title according to business rules
    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidTitle(
                "Habit title cannot be empty".to_string(),
            ));
        }

        if trimmed.len() > MAX_TITLE_LEN {
            return Err(DomainError::InvalidTitle(format!(
                "Habit title cannot be longer than {} characters",
                MAX_TITLE_LEN
            )));
        }

        Ok(())
    }
}
