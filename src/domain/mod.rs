/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, DailyProgress) and the
/// shared identifier and enum types. These represent the fundamental
/// concepts in the habit tracking system.

pub mod habit;
pub mod progress;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use progress::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
///
/// Enum values never reach the domain malformed - they are rejected during
/// request decoding - so the only rule enforced here is the title bound.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid habit title: {0}")]
    InvalidTitle(String),
}
