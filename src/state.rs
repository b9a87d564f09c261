use crate::config::Config;
use crate::feedback::FeedbackClient;
use crate::sandbox::SandboxClient;
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub sandbox: SandboxClient,
    pub feedback: FeedbackClient,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SandboxClient {
    fn from_ref(state: &AppState) -> Self {
        state.sandbox.clone()
    }
}

impl FromRef<AppState> for FeedbackClient {
    fn from_ref(state: &AppState) -> Self {
        state.feedback.clone()
    }
}
