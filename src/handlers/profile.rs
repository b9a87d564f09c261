// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        assessment::Assessment,
        user::{MeResponse, UpdateDetailsRequest, User},
    },
    utils::jwt::Claims,
};

pub(crate) async fn fetch_user(pool: &SqlitePool, user_id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))
}

/// Get the current user's profile, fresh from the database.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, claims.user_id()?).await?;
    Ok(Json(MeResponse::from(user)))
}

/// Profile-completion step: role, experience bracket and domain of
/// interest. Sets `profile_completed` so login routes past this step.
pub async fn update_details(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateDetailsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    let updated = sqlx::query(
        r#"
        UPDATE users
        SET current_role = ?, years_experience = ?, interest = ?, profile_completed = 1
        WHERE id = ?
        "#,
    )
    .bind(&payload.current_role)
    .bind(&payload.years_experience)
    .bind(&payload.interest)
    .bind(user_id)
    .execute(&pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({ "message": "Profile updated successfully" })))
}

/// Dashboard summary: profile plus the latest assessment result, if any.
pub async fn get_dashboard(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = fetch_user(&pool, user_id).await?;

    let latest = sqlx::query_as::<_, Assessment>(
        r#"
        SELECT * FROM assessments
        WHERE user_id = ?
        ORDER BY completed_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?;

    let assessment_results = match latest {
        Some(a) => json!({
            "totalScore": a.total_score,
            "mcqScore": a.mcq_score,
            "codingScore": a.coding_score,
            "completedAt": a.completed_at,
            "status": "completed"
        }),
        None => json!({
            "status": if user.assessment_completed { "completed" } else { "pending" }
        }),
    };

    Ok(Json(json!({
        "user": {
            "id": user.id,
            "username": user.username,
            "fullName": user.full_name,
            "email": user.email,
            "currentRole": user.current_role,
            "interest": user.interest,
        },
        "assessmentResults": assessment_results
    })))
}
