// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it. Returns 201 Created
/// with the user (password excluded) and the next onboarding step.
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password, full_name, email)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .bind(&payload.full_name)
    .bind(&payload.email)
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("Username or email already exists".to_string())
        }
        _ => {
            tracing::error!("Failed to register user: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "user": user,
            "redirectTo": "/basic-details"
        })),
    ))
}

/// Authenticates a user and returns a JWT token.
///
/// The response carries the profile/assessment completion flags plus the
/// next route, so the client can resume onboarding where the user left off.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(&payload.username)
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or(AppError::AuthError("User not found".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;

    let (redirect_to, message) = if !user.profile_completed {
        ("/basic-details", "Please complete your profile to continue.")
    } else if !user.assessment_completed {
        (
            "/assessment",
            "Please complete your assessment to access the dashboard.",
        )
    } else {
        ("/dashboard", "Welcome back to your dashboard!")
    };

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "user": {
            "id": user.id,
            "username": user.username,
            "fullName": user.full_name,
            "email": user.email,
            "profileCompleted": user.profile_completed,
            "assessmentCompleted": user.assessment_completed,
        },
        "redirectTo": redirect_to,
        "message": message
    })))
}
