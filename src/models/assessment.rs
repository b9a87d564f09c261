// src/models/assessment.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

use crate::models::question::TestCase;

/// Represents the 'assessments' table: one append-only row per submission.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub user_id: i64,

    /// Percentage scores. `coding_score` is NULL when the coding part could
    /// not be graded (no code question or no test cases).
    pub mcq_score: i64,
    pub coding_score: Option<i64>,
    pub total_score: i64,

    /// Raw answer map plus correct/total counts, kept for the review page.
    pub mcq_breakdown: Json<McqBreakdown>,

    /// Per-test-case pass/fail detail, kept so results can be reconstructed
    /// without re-running code.
    pub test_case_results: Json<Vec<TestCaseResult>>,

    pub code_answer: Option<String>,
    pub code_language: Option<String>,
    pub time_spent: Option<i64>,

    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Stored alongside the aggregate scores so the review page can show
/// which options the user picked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McqBreakdown {
    pub correct: usize,
    pub total: usize,
    pub answers: HashMap<i64, String>,
}

/// Outcome of one grading case, recorded for every case regardless of result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    /// 1-based case number.
    pub test_case: usize,
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// DTO for submitting a completed assessment.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    /// Key: MCQ question id. Value: the option string the user picked.
    #[serde(default)]
    pub mcq_answers: HashMap<i64, String>,
    pub code_answer: Option<String>,
    pub code_question_id: Option<i64>,
    pub code_language: Option<String>,
    pub time_spent: Option<i64>,
}

/// DTO for the ad-hoc "run my code against these cases" endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunCodeTestsRequest {
    pub language: String,
    pub code: String,
    pub test_cases: Vec<TestCase>,
}

/// Per-question MCQ review entry for the results page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McqReview {
    pub id: i64,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub correct_answer: String,
    pub user_answer: Option<String>,
    pub is_correct: bool,
}
