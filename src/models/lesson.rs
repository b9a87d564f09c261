// src/models/lesson.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'lessons' table. A lesson belongs to exactly one chapter;
/// `lesson_number` is 1-based and unique within its chapter.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Lesson {
    pub id: i64,
    pub chapter_id: i64,
    pub domain: String,
    pub lesson_number: i64,
    pub title: String,
    pub video_url: String,
    pub video_id: String,
    pub duration: Option<String>,
    pub description: Option<String>,
}
