// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Per-call budgets passed to the code-execution sandbox (milliseconds).
pub const SANDBOX_COMPILE_TIMEOUT_MS: u64 = 10_000;
pub const SANDBOX_RUN_TIMEOUT_MS: u64 = 3_000;

/// Outer HTTP timeout for a single sandbox call. Covers sandbox-side
/// queueing on top of the compile/run budgets above.
pub const SANDBOX_HTTP_TIMEOUT_MS: u64 = 15_000;

/// How many MCQs are drawn from each of the two question pools
/// (the user's interest domain and the shared DevOps pool).
pub const MCQ_POOL_SIZE: i64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,

    /// Base URL of the Piston-style execute endpoint.
    pub sandbox_url: String,

    /// OpenAI-style completions endpoint for assessment feedback.
    /// Feedback degrades to canned text when the key is absent.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:skillpath.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86_400);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let sandbox_url = env::var("SANDBOX_URL")
            .unwrap_or_else(|_| "https://emkc.org/api/v2/piston/execute".to_string());

        let openai_api_key = env::var("OPENAI_API_KEY").ok();
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            sandbox_url,
            openai_api_key,
            openai_base_url,
            openai_model,
        }
    }
}
