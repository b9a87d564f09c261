// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username.
    pub username: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub full_name: String,

    /// Unique email address.
    pub email: String,

    pub current_role: Option<String>,

    /// Free-form bracket such as "0-1", "2-5", "5-10", "10+".
    /// Drives the experience level used to pick assessment questions.
    pub years_experience: Option<String>,

    /// Curriculum domain of interest ("AIOps" or "MLOps").
    pub interest: Option<String>,

    /// Completion gates: profile first, then assessment, then dashboard.
    pub profile_completed: bool,
    pub assessment_completed: bool,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Profile data returned to the current user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub current_role: Option<String>,
    pub years_experience: Option<String>,
    pub interest: Option<String>,
    pub profile_completed: bool,
    pub assessment_completed: bool,
}

impl From<User> for MeResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            full_name: u.full_name,
            email: u.email,
            current_role: u.current_role,
            years_experience: u.years_experience,
            interest: u.interest,
            profile_completed: u.profile_completed,
            assessment_completed: u.assessment_completed,
        }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for the profile-completion step after signup.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsRequest {
    #[validate(length(min = 1, max = 100))]
    pub current_role: String,
    #[validate(length(min = 1, max = 20))]
    pub years_experience: String,
    #[validate(length(min = 1, max = 50))]
    pub interest: String,
}
