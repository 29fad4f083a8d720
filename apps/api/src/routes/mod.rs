pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route("/api/v1/matching/score", post(handlers::handle_score))
        .route("/api/v1/matching/match", post(handlers::handle_match))
        .route(
            "/api/v1/matching/jobs/:id/candidates",
            get(handlers::handle_job_candidates),
        )
        .route(
            "/api/v1/matching/jobs/:id/candidates/top",
            get(handlers::handle_top_job_candidates),
        )
        .route(
            "/api/v1/matching/candidates/:id/jobs",
            get(handlers::handle_candidate_jobs),
        )
        .route(
            "/api/v1/matching/candidates/:id/jobs/recommended",
            get(handlers::handle_recommended_jobs),
        )
        .with_state(state)
}
