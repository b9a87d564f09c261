// src/handlers/learning.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        chapter::Chapter,
        lesson::Lesson,
        progress::{LastWatched, UpdateProgressRequest, UserProgress},
    },
    unlock,
    utils::jwt::Claims,
};

/// Normalizes client-supplied domain casing ("mlops" → "MLOps").
/// Unknown domains pass through unchanged and simply match no chapters;
/// ambiguous input degrades to "locked", never to access.
fn normalize_domain(domain: &str) -> String {
    match domain.to_lowercase().as_str() {
        "mlops" => "MLOps".to_string(),
        "aiops" => "AIOps".to_string(),
        "devops" => "DevOps".to_string(),
        _ => domain.to_string(),
    }
}

async fn domain_progress(
    pool: &SqlitePool,
    user_id: i64,
    domain: &str,
) -> Result<Vec<UserProgress>, AppError> {
    Ok(sqlx::query_as::<_, UserProgress>(
        "SELECT * FROM user_progress WHERE user_id = ? AND domain = ?",
    )
    .bind(user_id)
    .bind(domain)
    .fetch_all(pool)
    .await?)
}

/// Chapters of a domain annotated with the user's progress and unlock
/// state. Recomputed from the ledger on every call; nothing is cached.
pub async fn list_chapters(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(domain): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let domain = normalize_domain(&domain);

    let chapters = sqlx::query_as::<_, Chapter>(
        "SELECT * FROM chapters WHERE domain = ? ORDER BY chapter_number",
    )
    .bind(&domain)
    .fetch_all(&pool)
    .await?;

    let progress = domain_progress(&pool, user_id, &domain).await?;

    Ok(Json(unlock::chapter_statuses(&chapters, &progress)))
}

/// Lessons of one chapter (addressed by chapter NUMBER, not database id)
/// annotated with per-lesson progress and sequential unlock state.
pub async fn list_chapter_lessons(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path((domain, chapter_number)): Path<(String, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let domain = normalize_domain(&domain);

    let chapter = sqlx::query_as::<_, Chapter>(
        "SELECT * FROM chapters WHERE domain = ? AND chapter_number = ?",
    )
    .bind(&domain)
    .bind(chapter_number)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!(
            "Chapter {} not found for domain {}",
            chapter_number, domain
        ))
    })?;

    let lessons = sqlx::query_as::<_, Lesson>(
        "SELECT * FROM lessons WHERE chapter_id = ? ORDER BY lesson_number",
    )
    .bind(chapter.id)
    .fetch_all(&pool)
    .await?;

    let progress = sqlx::query_as::<_, UserProgress>(
        "SELECT * FROM user_progress WHERE user_id = ? AND chapter_id = ?",
    )
    .bind(user_id)
    .bind(chapter.id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(unlock::lesson_statuses(&lessons, &progress)))
}

/// Ledger write: upserts the (user, lesson) progress row.
///
/// `chapter_id` and `domain` are denormalized from the lesson here, at the
/// single write path, so they cannot drift from the lesson's true chapter.
/// `completed` is monotonic: once true it stays true, while
/// `watched_duration`/`last_watched` are last-writer-wins. Unlock state is
/// not computed here; reads derive it lazily from the ledger.
pub async fn update_progress(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<i64>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    if payload.watched_duration < 0 {
        return Err(AppError::BadRequest(
            "watchedDuration must not be negative".to_string(),
        ));
    }

    let lesson = sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = ?")
        .bind(lesson_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO user_progress
            (user_id, lesson_id, chapter_id, domain, completed, watched_duration, last_watched)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id, lesson_id) DO UPDATE SET
            completed = (user_progress.completed OR excluded.completed),
            watched_duration = excluded.watched_duration,
            last_watched = excluded.last_watched
        "#,
    )
    .bind(user_id)
    .bind(lesson.id)
    .bind(lesson.chapter_id)
    .bind(&lesson.domain)
    .bind(payload.completed)
    .bind(payload.watched_duration)
    .bind(chrono::Utc::now())
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to upsert progress row: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "message": "Progress updated successfully" })))
}

#[derive(sqlx::FromRow)]
struct LastWatchedRow {
    chapter_id: i64,
    lesson_id: i64,
    chapter_number: i64,
    lesson_number: i64,
    completed: bool,
}

/// Resume pointer: the most recently watched lesson in a domain, falling
/// back to the domain's first chapter (or chapter 1 / lesson 1) when the
/// user has no progress yet.
pub async fn last_watched(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(domain): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let domain = normalize_domain(&domain);

    let row = sqlx::query_as::<_, LastWatchedRow>(
        r#"
        SELECT up.chapter_id, up.lesson_id, up.completed,
               c.chapter_number, l.lesson_number
        FROM user_progress up
        JOIN lessons l ON up.lesson_id = l.id
        JOIN chapters c ON up.chapter_id = c.id
        WHERE up.user_id = ? AND up.domain = ?
        ORDER BY up.last_watched DESC, up.id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(&domain)
    .fetch_optional(&pool)
    .await?;

    if let Some(row) = row {
        return Ok(Json(LastWatched {
            chapter_id: Some(row.chapter_id),
            lesson_id: Some(row.lesson_id),
            chapter_number: row.chapter_number,
            lesson_number: row.lesson_number,
            completed: row.completed,
        }));
    }

    // No progress yet: resume at the domain's first chapter.
    let first_chapter = sqlx::query_as::<_, Chapter>(
        "SELECT * FROM chapters WHERE domain = ? ORDER BY chapter_number LIMIT 1",
    )
    .bind(&domain)
    .fetch_optional(&pool)
    .await?;

    Ok(Json(LastWatched {
        chapter_id: first_chapter.as_ref().map(|c| c.id),
        lesson_id: None,
        chapter_number: first_chapter.map(|c| c.chapter_number).unwrap_or(1),
        lesson_number: 1,
        completed: false,
    }))
}
