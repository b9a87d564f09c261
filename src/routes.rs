// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{assessment, auth, learning, profile},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public auth routes; everything else behind the JWT middleware.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, sandbox and feedback clients).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let assessment_routes = Router::new()
        .route("/questions", get(assessment::get_questions))
        .route("/run-code-tests", post(assessment::run_code_tests))
        .route("/submit", post(assessment::submit))
        .route("/results", get(assessment::get_results));

    let learning_routes = Router::new()
        .route("/{domain}/chapters", get(learning::list_chapters))
        .route(
            "/{domain}/chapters/number/{chapter_number}/lessons",
            get(learning::list_chapter_lessons),
        )
        .route(
            "/lessons/{lesson_id}/progress",
            post(learning::update_progress),
        )
        .route("/{domain}/last-watched", get(learning::last_watched));

    let protected_routes = Router::new()
        .route("/user", get(profile::get_me))
        .route("/user/details", post(profile::update_details))
        .route("/dashboard", get(profile::get_dashboard))
        .nest("/assessment", assessment_routes)
        .nest("/learning", learning_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
