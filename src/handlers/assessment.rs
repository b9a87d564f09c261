// src/handlers/assessment.rs

use std::collections::HashMap;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::{Sqlite, SqlitePool, types::Json as SqlJson};

use crate::{
    config::MCQ_POOL_SIZE,
    error::AppError,
    feedback::{FeedbackClient, FeedbackInput},
    handlers::profile::fetch_user,
    harness::Language,
    models::{
        assessment::{
            Assessment, McqBreakdown, McqReview, RunCodeTestsRequest, SubmitAssessmentRequest,
            TestCaseResult,
        },
        question::{CodeQuestion, McqQuestion, PublicCodeQuestion, PublicMcqQuestion},
    },
    sandbox::SandboxClient,
    scoring::{CodingGrade, blend, grade_mcq, percentage},
    utils::jwt::Claims,
};

/// Question pool shared by every user regardless of interest domain.
const ROLE_DOMAIN: &str = "DevOps";

/// Maps the profile's free-form experience bracket to a question level.
fn experience_level(years_experience: Option<&str>) -> &'static str {
    match years_experience {
        Some(y) if y.contains("10+") => "advanced",
        Some(y) if y.contains("2-5") || y.contains("5-10") => "intermediate",
        _ => "beginner",
    }
}

/// Draws up to `MCQ_POOL_SIZE` questions for a domain, preferring the
/// user's experience level and topping up domain-wide when the level-
/// filtered bank is short.
async fn draw_mcq_pool(
    pool: &SqlitePool,
    domain: &str,
    level: &str,
) -> Result<Vec<McqQuestion>, AppError> {
    let mut picked = sqlx::query_as::<_, McqQuestion>(
        r#"
        SELECT * FROM mcq_questions
        WHERE domain = ? AND experience_level = ?
        ORDER BY RANDOM()
        LIMIT ?
        "#,
    )
    .bind(domain)
    .bind(level)
    .bind(MCQ_POOL_SIZE)
    .fetch_all(pool)
    .await?;

    if (picked.len() as i64) < MCQ_POOL_SIZE {
        let fill = sqlx::query_as::<_, McqQuestion>(
            r#"
            SELECT * FROM mcq_questions
            WHERE domain = ?
            ORDER BY RANDOM()
            LIMIT ?
            "#,
        )
        .bind(domain)
        .bind(MCQ_POOL_SIZE)
        .fetch_all(pool)
        .await?;

        for q in fill {
            if picked.len() as i64 >= MCQ_POOL_SIZE {
                break;
            }
            if !picked.iter().any(|p| p.id == q.id) {
                picked.push(q);
            }
        }
    }

    Ok(picked)
}

/// Assembles the assessment paper: up to 10 MCQs from the user's interest
/// domain, up to 10 from the shared DevOps pool, and one code question.
/// Correct answers stay server-side (public DTOs only).
pub async fn get_questions(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = fetch_user(&pool, claims.user_id()?).await?;

    let interest = user.interest.as_deref().unwrap_or("AIOps");
    let level = experience_level(user.years_experience.as_deref());

    let mut mcqs = draw_mcq_pool(&pool, interest, level).await?;
    mcqs.extend(draw_mcq_pool(&pool, ROLE_DOMAIN, level).await?);

    let code_question = match sqlx::query_as::<_, CodeQuestion>(
        r#"
        SELECT * FROM code_questions
        WHERE domain = ? AND experience_level = ?
        ORDER BY RANDOM()
        LIMIT 1
        "#,
    )
    .bind(interest)
    .bind(level)
    .fetch_optional(&pool)
    .await?
    {
        Some(q) => Some(q),
        None => {
            // Level-filtered bank may be empty; fall back to domain only.
            sqlx::query_as::<_, CodeQuestion>(
                "SELECT * FROM code_questions WHERE domain = ? ORDER BY RANDOM() LIMIT 1",
            )
            .bind(interest)
            .fetch_optional(&pool)
            .await?
        }
    };

    tracing::info!(
        "assessment paper for user {}: {} MCQs ({} / {}), code question: {}",
        user.id,
        mcqs.len(),
        interest,
        level,
        code_question.is_some()
    );

    Ok(Json(json!({
        "mcqQuestions": mcqs.into_iter().map(PublicMcqQuestion::from).collect::<Vec<_>>(),
        "codeQuestion": code_question.map(PublicCodeQuestion::from),
    })))
}

/// Ad-hoc run of submitted code against caller-supplied test cases,
/// used by the editor's "run tests" button. Nothing is persisted.
pub async fn run_code_tests(
    State(sandbox): State<SandboxClient>,
    Json(payload): Json<RunCodeTestsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.test_cases.is_empty() {
        return Err(AppError::BadRequest("No test cases provided".to_string()));
    }

    let language = Language::parse(&payload.language);
    let run = sandbox
        .run_test_cases(language, &payload.code, &payload.test_cases)
        .await;

    Ok(Json(json!({
        "output": run.output,
        "testResults": run.results,
        "passed": run.passed,
        "total": run.total,
    })))
}

/// Helper struct for fetching MCQ answer keys.
#[derive(sqlx::FromRow)]
struct AnswerKey {
    id: i64,
    correct_answer: String,
}

async fn fetch_answer_key(
    pool: &SqlitePool,
    question_ids: &[i64],
) -> Result<HashMap<i64, String>, AppError> {
    if question_ids.is_empty() {
        return Ok(HashMap::new());
    }

    // Dynamic IN clause to fetch the stored correct answers.
    let mut query_builder = sqlx::QueryBuilder::<Sqlite>::new(
        "SELECT id, correct_answer FROM mcq_questions WHERE id IN (",
    );

    let mut separated = query_builder.separated(",");
    for id in question_ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");

    let keys: Vec<AnswerKey> = query_builder.build_query_as().fetch_all(pool).await?;

    Ok(keys.into_iter().map(|k| (k.id, k.correct_answer)).collect())
}

/// Submits a completed assessment.
///
/// Grades the MCQ half against the stored answer key, runs the code half
/// against the question's test cases in the sandbox (per-case failures are
/// localized, never cascading), persists one append-only result row with
/// the full breakdown, and marks the user's assessment complete. The
/// completion flag is set even when scoring degraded; only a persistence
/// failure aborts the submission.
pub async fn submit(
    State(pool): State<SqlitePool>,
    State(sandbox): State<SandboxClient>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let has_code = payload
        .code_answer
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());

    if payload.mcq_answers.is_empty() && !has_code {
        return Err(AppError::BadRequest("Empty submission".to_string()));
    }

    // MCQ half.
    let question_ids: Vec<i64> = payload.mcq_answers.keys().copied().collect();
    let answer_key = fetch_answer_key(&pool, &question_ids).await?;

    if let Some(unknown) = question_ids.iter().find(|id| !answer_key.contains_key(id)) {
        return Err(AppError::BadRequest(format!(
            "Unknown question id: {}",
            unknown
        )));
    }

    let (correct, total) = grade_mcq(&payload.mcq_answers, &answer_key);
    let mcq_score = percentage(correct, total);

    // Coding half. Submissions without runnable test cases stay ungraded
    // rather than receiving a fabricated score.
    let mut coding = CodingGrade::Ungraded;
    let mut test_case_results: Vec<TestCaseResult> = Vec::new();
    let mut code_language_used = payload.code_language.clone();

    if has_code {
        if let Some(code_question_id) = payload.code_question_id {
            let question = sqlx::query_as::<_, CodeQuestion>(
                "SELECT * FROM code_questions WHERE id = ?",
            )
            .bind(code_question_id)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Unknown code question id: {}", code_question_id))
            })?;

            let cases = &question.test_cases.0;
            if !cases.is_empty() {
                let language_name = payload
                    .code_language
                    .clone()
                    .unwrap_or_else(|| question.language.clone());
                let language = Language::parse(&language_name);
                code_language_used = Some(language_name);

                let code = payload.code_answer.as_deref().unwrap_or_default();
                let run = sandbox.run_test_cases(language, code, cases).await;

                coding = CodingGrade::Graded(percentage(run.passed, run.total));
                test_case_results = run.results;

                tracing::info!(
                    "code evaluation for user {}: {}/{} cases passed",
                    user_id,
                    run.passed,
                    run.total
                );
            }
        }
    }

    let total_score = blend(mcq_score, coding);

    let breakdown = McqBreakdown {
        correct,
        total,
        answers: payload.mcq_answers.clone(),
    };

    sqlx::query(
        r#"
        INSERT INTO assessments
            (user_id, mcq_score, coding_score, total_score, mcq_breakdown,
             test_case_results, code_answer, code_language, time_spent)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(mcq_score)
    .bind(coding.score())
    .bind(total_score)
    .bind(SqlJson(&breakdown))
    .bind(SqlJson(&test_case_results))
    .bind(&payload.code_answer)
    .bind(&code_language_used)
    .bind(payload.time_spent)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to persist assessment: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    sqlx::query("UPDATE users SET assessment_completed = 1 WHERE id = ?")
        .bind(user_id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({
        "message": "Assessment submitted successfully",
        "mcqScore": mcq_score,
        "codingScore": coding.score(),
        "totalScore": total_score,
    })))
}

/// Latest assessment with the full per-question and per-case review, plus
/// generated feedback (fallback text when the LLM is unavailable).
pub async fn get_results(
    State(pool): State<SqlitePool>,
    State(feedback_client): State<FeedbackClient>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let result = sqlx::query_as::<_, Assessment>(
        r#"
        SELECT * FROM assessments
        WHERE user_id = ?
        ORDER BY completed_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("No assessment found".to_string()))?;

    let breakdown = &result.mcq_breakdown.0;
    let answered_ids: Vec<i64> = breakdown.answers.keys().copied().collect();

    let mcq_details = if answered_ids.is_empty() {
        Vec::new()
    } else {
        let mut query_builder =
            sqlx::QueryBuilder::<Sqlite>::new("SELECT * FROM mcq_questions WHERE id IN (");
        let mut separated = query_builder.separated(",");
        for id in &answered_ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let questions: Vec<McqQuestion> = query_builder.build_query_as().fetch_all(&pool).await?;

        questions
            .into_iter()
            .map(|q| {
                let user_answer = breakdown.answers.get(&q.id).cloned();
                let is_correct = user_answer.as_deref() == Some(q.correct_answer.as_str());
                McqReview {
                    id: q.id,
                    question: q.question,
                    options: q.options,
                    correct_answer: q.correct_answer,
                    user_answer,
                    is_correct,
                }
            })
            .collect()
    };

    let user = fetch_user(&pool, user_id).await?;
    let feedback = feedback_client
        .generate(&FeedbackInput {
            mcq_score: result.mcq_score,
            coding_score: result.coding_score,
            total_score: result.total_score,
            interest: user.interest,
            years_experience: user.years_experience,
            current_role: user.current_role,
        })
        .await;

    Ok(Json(json!({
        "mcqScore": result.mcq_score,
        "codingScore": result.coding_score,
        "codingGraded": result.coding_score.is_some(),
        "totalScore": result.total_score,
        "mcqCorrect": breakdown.correct,
        "mcqTotal": breakdown.total,
        "mcqDetails": mcq_details,
        "testCaseResults": result.test_case_results.0,
        "feedback": feedback,
        "completedAt": result.completed_at,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_level_from_years_bracket() {
        assert_eq!(experience_level(None), "beginner");
        assert_eq!(experience_level(Some("0-1")), "beginner");
        assert_eq!(experience_level(Some("2-5")), "intermediate");
        assert_eq!(experience_level(Some("5-10")), "intermediate");
        assert_eq!(experience_level(Some("10+")), "advanced");
    }
}
