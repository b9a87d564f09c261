// src/unlock.rs

//! Sequential unlock evaluator.
//!
//! Pure projection from curriculum reference data plus a user's progress
//! rows to per-chapter and per-lesson unlock state. Recomputed on every
//! read; nothing here touches the database or caches across requests.
//!
//! Rules:
//! * Chapter 1 of a domain is always unlocked. Chapter K>1 unlocks once
//!   every lesson of chapter K-1 has a completed progress row.
//! * The first lesson of a chapter is always unlocked. Lesson i>0 unlocks
//!   once lesson i-1 is completed.
//! * A missing progress row means "not completed", never an error.
//! * A chapter with zero lessons is trivially complete (progress 100) and
//!   never blocks the chapter after it.

use serde::Serialize;

use crate::models::{chapter::Chapter, lesson::Lesson, progress::UserProgress};
use crate::scoring::percentage;

/// Unlock/progress projection for one chapter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterStatus {
    pub id: i64,
    pub domain: String,
    pub chapter_number: i64,
    pub title: String,
    pub description: Option<String>,
    pub total_lessons: i64,
    pub progress: i64,
    pub completed_lessons: i64,
    pub is_completed: bool,
    pub is_unlocked: bool,
}

/// Unlock/progress projection for one lesson.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonStatus {
    pub id: i64,
    pub chapter_id: i64,
    pub domain: String,
    pub lesson_number: i64,
    pub title: String,
    pub video_url: String,
    pub video_id: String,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub completed: bool,
    pub watched_duration: i64,
    pub last_watched: Option<chrono::DateTime<chrono::Utc>>,
    pub is_unlocked: bool,
}

fn completed_in_chapter(progress: &[UserProgress], chapter_id: i64) -> i64 {
    progress
        .iter()
        .filter(|p| p.chapter_id == chapter_id && p.completed)
        .count() as i64
}

/// Projects unlock state for all chapters of a domain.
///
/// `chapters` must belong to a single domain; they are sorted by
/// `chapter_number` here so callers need no particular query order.
/// `progress` is the user's ledger rows for that domain, in any order.
pub fn chapter_statuses(chapters: &[Chapter], progress: &[UserProgress]) -> Vec<ChapterStatus> {
    let mut ordered: Vec<&Chapter> = chapters.iter().collect();
    ordered.sort_by_key(|c| c.chapter_number);

    let mut statuses = Vec::with_capacity(ordered.len());
    let mut previous_complete = true; // chapter 1 has no gate

    for chapter in ordered {
        let completed_lessons =
            completed_in_chapter(progress, chapter.id).min(chapter.total_lessons);
        let is_completed = completed_lessons >= chapter.total_lessons;
        let progress_percent = if chapter.total_lessons == 0 {
            100
        } else {
            percentage(completed_lessons as usize, chapter.total_lessons as usize)
        };

        statuses.push(ChapterStatus {
            id: chapter.id,
            domain: chapter.domain.clone(),
            chapter_number: chapter.chapter_number,
            title: chapter.title.clone(),
            description: chapter.description.clone(),
            total_lessons: chapter.total_lessons,
            progress: progress_percent,
            completed_lessons,
            is_completed,
            is_unlocked: previous_complete,
        });

        previous_complete = is_completed;
    }

    statuses
}

/// Projects unlock state for the lessons of one chapter.
///
/// `lessons` must belong to a single chapter; sorted by `lesson_number`
/// here. `progress` may be scoped to the chapter or the whole domain.
pub fn lesson_statuses(lessons: &[Lesson], progress: &[UserProgress]) -> Vec<LessonStatus> {
    let mut ordered: Vec<&Lesson> = lessons.iter().collect();
    ordered.sort_by_key(|l| l.lesson_number);

    let mut statuses = Vec::with_capacity(ordered.len());
    let mut previous_completed = true; // first lesson has no gate

    for lesson in ordered {
        let row = progress.iter().find(|p| p.lesson_id == lesson.id);
        let completed = row.map(|p| p.completed).unwrap_or(false);

        statuses.push(LessonStatus {
            id: lesson.id,
            chapter_id: lesson.chapter_id,
            domain: lesson.domain.clone(),
            lesson_number: lesson.lesson_number,
            title: lesson.title.clone(),
            video_url: lesson.video_url.clone(),
            video_id: lesson.video_id.clone(),
            duration: lesson.duration.clone(),
            description: lesson.description.clone(),
            completed,
            watched_duration: row.map(|p| p.watched_duration).unwrap_or(0),
            last_watched: row.and_then(|p| p.last_watched),
            is_unlocked: previous_completed,
        });

        previous_completed = completed;
    }

    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: i64, number: i64, total_lessons: i64) -> Chapter {
        Chapter {
            id,
            domain: "MLOps".to_string(),
            chapter_number: number,
            title: format!("Chapter {}", number),
            description: None,
            total_lessons,
        }
    }

    fn lesson(id: i64, chapter_id: i64, number: i64) -> Lesson {
        Lesson {
            id,
            chapter_id,
            domain: "MLOps".to_string(),
            lesson_number: number,
            title: format!("Lesson {}", number),
            video_url: "https://youtube.com/watch?v=abc".to_string(),
            video_id: "abc".to_string(),
            duration: Some("10 min".to_string()),
            description: None,
        }
    }

    fn done(user_id: i64, lesson_id: i64, chapter_id: i64) -> UserProgress {
        UserProgress {
            id: lesson_id,
            user_id,
            lesson_id,
            chapter_id,
            domain: "MLOps".to_string(),
            completed: true,
            watched_duration: 600,
            last_watched: None,
        }
    }

    #[test]
    fn first_chapter_always_unlocked() {
        let chapters = vec![chapter(1, 1, 3), chapter(2, 2, 3)];
        let statuses = chapter_statuses(&chapters, &[]);
        assert!(statuses[0].is_unlocked);
        assert!(!statuses[1].is_unlocked);
        assert_eq!(statuses[0].progress, 0);
        assert_eq!(statuses[0].completed_lessons, 0);
    }

    #[test]
    fn chapter_unlocks_only_when_previous_fully_complete() {
        let chapters = vec![chapter(1, 1, 2), chapter(2, 2, 1)];

        let partial = vec![done(7, 10, 1)];
        let statuses = chapter_statuses(&chapters, &partial);
        assert!(!statuses[1].is_unlocked);
        assert_eq!(statuses[0].progress, 50);

        let full = vec![done(7, 10, 1), done(7, 11, 1)];
        let statuses = chapter_statuses(&chapters, &full);
        assert!(statuses[1].is_unlocked);
        assert!(statuses[0].is_completed);
        assert_eq!(statuses[0].progress, 100);
    }

    #[test]
    fn incomplete_rows_do_not_count() {
        let chapters = vec![chapter(1, 1, 1), chapter(2, 2, 1)];
        let mut row = done(7, 10, 1);
        row.completed = false;
        let statuses = chapter_statuses(&chapters, &[row]);
        assert!(!statuses[0].is_completed);
        assert!(!statuses[1].is_unlocked);
    }

    #[test]
    fn zero_lesson_chapter_is_trivially_complete() {
        let chapters = vec![chapter(1, 1, 0), chapter(2, 2, 2)];
        let statuses = chapter_statuses(&chapters, &[]);
        assert!(statuses[0].is_completed);
        assert_eq!(statuses[0].progress, 100);
        // ...and it never blocks the chapter after it.
        assert!(statuses[1].is_unlocked);
    }

    #[test]
    fn projection_independent_of_row_order() {
        let chapters = vec![chapter(1, 1, 2), chapter(2, 2, 2)];
        let mut rows = vec![done(7, 11, 1), done(7, 10, 1)];
        let forward = chapter_statuses(&chapters, &rows);
        rows.reverse();
        let backward = chapter_statuses(&chapters, &rows);
        assert_eq!(forward[1].is_unlocked, backward[1].is_unlocked);
        assert_eq!(forward[0].completed_lessons, backward[0].completed_lessons);
    }

    #[test]
    fn chapters_sorted_by_number_not_input_order() {
        let chapters = vec![chapter(2, 2, 1), chapter(1, 1, 1)];
        let statuses = chapter_statuses(&chapters, &[]);
        assert_eq!(statuses[0].chapter_number, 1);
        assert!(statuses[0].is_unlocked);
        assert!(!statuses[1].is_unlocked);
    }

    #[test]
    fn first_lesson_always_unlocked() {
        let lessons = vec![lesson(10, 1, 1), lesson(11, 1, 2)];
        let statuses = lesson_statuses(&lessons, &[]);
        assert!(statuses[0].is_unlocked);
        assert!(!statuses[1].is_unlocked);
        assert!(!statuses[0].completed);
        assert_eq!(statuses[0].watched_duration, 0);
    }

    #[test]
    fn lesson_unlocks_when_previous_completed() {
        let lessons = vec![lesson(10, 1, 1), lesson(11, 1, 2), lesson(12, 1, 3)];
        let rows = vec![done(7, 10, 1)];
        let statuses = lesson_statuses(&lessons, &rows);
        assert!(statuses[0].completed);
        assert!(statuses[1].is_unlocked);
        assert!(!statuses[2].is_unlocked);
    }

    #[test]
    fn lesson_progress_fields_carried_through() {
        let lessons = vec![lesson(10, 1, 1)];
        let rows = vec![done(7, 10, 1)];
        let statuses = lesson_statuses(&lessons, &rows);
        assert_eq!(statuses[0].watched_duration, 600);
        assert!(statuses[0].completed);
    }
}
