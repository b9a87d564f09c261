// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'mcq_questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct McqQuestion {
    pub id: i64,

    /// The text content of the question.
    pub question: String,

    /// Ordered list of answer options, stored as a JSON array.
    pub options: Json<Vec<String>>,

    /// The correct option string. Matched by strict string equality.
    pub correct_answer: String,

    pub category: String,

    /// Curriculum domain ("AIOps", "MLOps", "DevOps").
    pub domain: String,

    /// 'beginner', 'intermediate' or 'advanced'.
    pub experience_level: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending an MCQ to the client (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicMcqQuestion {
    pub id: i64,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub category: String,
}

impl From<McqQuestion> for PublicMcqQuestion {
    fn from(q: McqQuestion) -> Self {
        Self {
            id: q.id,
            question: q.question,
            options: q.options,
            category: q.category,
        }
    }
}

/// A single grading case for a code question: the candidate's function is
/// invoked with `input` (a literal expression) and its printed output is
/// compared against `expected_output`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    #[serde(alias = "expected")]
    pub expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Represents the 'code_questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CodeQuestion {
    pub id: i64,
    pub title: String,
    pub description: String,

    /// Default execution language ("python", "javascript", ...).
    pub language: String,

    pub domain: String,
    pub experience_level: String,
    pub category: String,

    pub starter_code: Option<String>,

    /// Grading cases, stored as a JSON array.
    pub test_cases: Json<Vec<TestCase>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a code question to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCodeQuestion {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub language: String,
    pub starter_code: Option<String>,
    pub test_cases: Json<Vec<TestCase>>,
}

impl From<CodeQuestion> for PublicCodeQuestion {
    fn from(q: CodeQuestion) -> Self {
        Self {
            id: q.id,
            title: q.title,
            description: q.description,
            language: q.language,
            starter_code: q.starter_code,
            test_cases: q.test_cases,
        }
    }
}
