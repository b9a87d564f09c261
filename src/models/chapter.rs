// src/models/chapter.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'chapters' table. Static reference data per domain;
/// `chapter_number` is 1-based and unique within a domain.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub domain: String,
    pub chapter_number: i64,
    pub title: String,
    pub description: Option<String>,
    pub total_lessons: i64,
}
