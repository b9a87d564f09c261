// src/models/progress.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'user_progress' ledger: one row per (user, lesson),
/// upserted on every progress report. `chapter_id` and `domain` are
/// denormalized from the lesson at write time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserProgress {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub chapter_id: i64,
    pub domain: String,
    pub completed: bool,
    pub watched_duration: i64,
    pub last_watched: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for reporting lesson progress.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub watched_duration: i64,
}

/// Resume pointer: the most recently watched lesson in a domain.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastWatched {
    pub chapter_id: Option<i64>,
    pub lesson_id: Option<i64>,
    pub chapter_number: i64,
    pub lesson_number: i64,
    pub completed: bool,
}
