// tests/common/mod.rs

#![allow(dead_code)]

use axum::{Json, Router, http::StatusCode, routing::post};
use serde_json::{Value, json};
use skillpath_backend::{
    config::Config, feedback::FeedbackClient, routes, sandbox::SandboxClient, state::AppState,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port against an in-memory database, wired to
/// the given sandbox execute URL. Feedback runs in fallback mode so no test
/// ever talks to a real LLM.
pub async fn spawn_app(sandbox_url: &str) -> TestApp {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        sandbox_url: sandbox_url.to_string(),
        openai_api_key: None,
        openai_base_url: "http://127.0.0.1:1/v1".to_string(),
        openai_model: "gpt-4o".to_string(),
    };

    let state = AppState {
        pool: pool.clone(),
        config,
        sandbox: SandboxClient::new(sandbox_url),
        feedback: FeedbackClient::disabled(),
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        pool,
        client: reqwest::Client::new(),
    }
}

fn extract_call_arg<'a>(content: &'a str, func: &str) -> Option<&'a str> {
    let start = content.find(func)? + func.len();
    let end = content[start..].find(')')? + start;
    Some(&content[start..end])
}

/// Fake Piston: reads the test-case expression off the harness's
/// `result = <expr>` line and answers with canned stage output.
///
/// * `echo(X)`   → stdout "X"
/// * `fail(X)`   → stdout "unexpected"
/// * `noisy(X)`  → stdout "X" but nonempty stderr
/// * `explode(X)`→ HTTP 500 (simulated sandbox outage)
async fn mock_execute(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    let content = body["files"][0]["content"].as_str().unwrap_or_default();
    let expr = content
        .lines()
        .find_map(|l| l.trim().strip_prefix("result = "))
        .unwrap_or_default();

    if expr.starts_with("explode(") {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if let Some(arg) = extract_call_arg(expr, "noisy(") {
        return Ok(Json(json!({
            "run": { "stdout": format!("{}\n", arg), "stderr": "RuntimeWarning: noisy", "code": 0 }
        })));
    }
    if expr.starts_with("fail(") {
        return Ok(Json(json!({
            "run": { "stdout": "unexpected\n", "stderr": "", "code": 0 }
        })));
    }
    if let Some(arg) = extract_call_arg(expr, "echo(") {
        return Ok(Json(json!({
            "run": { "stdout": format!("{}\n", arg), "stderr": "", "code": 0 }
        })));
    }

    Ok(Json(json!({ "run": { "stdout": "", "stderr": "", "code": 0 } })))
}

/// Spawns the fake sandbox and returns its execute URL.
pub async fn spawn_mock_sandbox() -> String {
    let app = Router::new().route("/execute", post(mock_execute));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock sandbox port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}/execute", port)
}

/// Registers a fresh user and returns (token, username).
pub async fn register_and_login(app: &TestApp) -> (String, String) {
    let username = format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let res = app
        .client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({
            "username": username,
            "password": password,
            "fullName": "Test User",
            "email": format!("{}@example.com", username),
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(res.status().as_u16(), 201);

    let login: Value = app
        .client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let token = login["token"].as_str().expect("Token not found").to_string();
    (token, username)
}

/// Completes the profile step so assessment questions can be drawn.
pub async fn complete_profile(app: &TestApp, token: &str, interest: &str, years: &str) {
    let res = app
        .client
        .post(format!("{}/api/user/details", app.address))
        .bearer_auth(token)
        .json(&json!({
            "currentRole": "Engineer",
            "yearsExperience": years,
            "interest": interest,
        }))
        .send()
        .await
        .expect("Update details failed");
    assert_eq!(res.status().as_u16(), 200);
}

pub async fn seed_chapter(
    pool: &SqlitePool,
    domain: &str,
    number: i64,
    total_lessons: i64,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO chapters (domain, chapter_number, title, description, total_lessons)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(domain)
    .bind(number)
    .bind(format!("Chapter {}", number))
    .bind("Seeded for tests")
    .bind(total_lessons)
    .fetch_one(pool)
    .await
    .expect("Failed to seed chapter")
}

pub async fn seed_lesson(pool: &SqlitePool, chapter_id: i64, domain: &str, number: i64) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO lessons
            (chapter_id, domain, lesson_number, title, video_url, video_id, duration, description)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(chapter_id)
    .bind(domain)
    .bind(number)
    .bind(format!("Lesson {}", number))
    .bind("https://www.youtube.com/watch?v=test")
    .bind("test")
    .bind("10 min")
    .bind("Seeded for tests")
    .fetch_one(pool)
    .await
    .expect("Failed to seed lesson")
}

pub async fn seed_mcq(pool: &SqlitePool, domain: &str, level: &str, correct: &str) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO mcq_questions
            (question, options, correct_answer, category, domain, experience_level)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind("Which option is correct?")
    .bind(r#"["A","B","C","D"]"#)
    .bind(correct)
    .bind("Fundamentals")
    .bind(domain)
    .bind(level)
    .fetch_one(pool)
    .await
    .expect("Failed to seed MCQ question")
}

pub async fn seed_code_question(
    pool: &SqlitePool,
    domain: &str,
    level: &str,
    test_cases: &str,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO code_questions
            (title, description, language, domain, experience_level, category, starter_code, test_cases)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind("Echo")
    .bind("Implement echo(x) returning x.")
    .bind("python")
    .bind(domain)
    .bind(level)
    .bind("Fundamentals")
    .bind("def echo(x):\n    return x\n")
    .bind(test_cases)
    .fetch_one(pool)
    .await
    .expect("Failed to seed code question")
}

/// Reports lesson progress and asserts the write succeeded.
pub async fn post_progress(
    app: &TestApp,
    token: &str,
    lesson_id: i64,
    completed: bool,
    watched: i64,
) {
    let res = app
        .client
        .post(format!(
            "{}/api/learning/lessons/{}/progress",
            app.address, lesson_id
        ))
        .bearer_auth(token)
        .json(&json!({ "completed": completed, "watchedDuration": watched }))
        .send()
        .await
        .expect("Progress post failed");
    assert_eq!(res.status().as_u16(), 200);
}
