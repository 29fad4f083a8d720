//! Axum route handlers for the Matching API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::engine::{MatchEngine, MatchResult};
use crate::matching::models::{CandidateProfile, JobRequirement, ValidationError};
use crate::matching::ranking::rank;
use crate::matching::store;
use crate::matching::weights::MatchWeights;
use crate::models::candidate::CandidateRow;
use crate::models::job::JobPostingRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub candidate: CandidateProfile,
    pub job: JobRequirement,
    /// Per-request override of the configured weight table.
    #[serde(default)]
    pub weights: Option<MatchWeights>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub match_score: f64,
    pub match_percentage: f64,
    pub match_details: MatchResult,
}

fn default_create_profile() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    #[serde(default = "default_create_profile")]
    pub create_profile: bool,
}

#[derive(Debug, Serialize)]
pub struct MatchSummary {
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub candidate_name: String,
    pub job_title: String,
    pub job_client: String,
    pub match_score: f64,
    pub match_percentage: f64,
    pub match_details: MatchResult,
}

impl MatchSummary {
    fn new(candidate: &CandidateRow, job: &JobPostingRow, result: MatchResult) -> Self {
        Self {
            candidate_id: candidate.id,
            job_id: job.id,
            candidate_name: candidate.full_name.clone(),
            job_title: job.title.clone(),
            job_client: job.client.clone(),
            match_score: round3(result.overall_score),
            match_percentage: result.match_percentage(),
            match_details: result,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    #[serde(flatten)]
    pub summary: MatchSummary,
    pub profile_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RankQuery {
    pub min_score: Option<f64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub min_score: Option<f64>,
    pub top_n: Option<i64>,
}

/// Resolved ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RankParams {
    min_score: f64,
    limit: usize,
}

impl RankParams {
    fn resolve(
        min_score: Option<f64>,
        limit: Option<i64>,
        default_min_score: f64,
        default_limit: i64,
        max_limit: i64,
    ) -> Result<Self, AppError> {
        let min_score = min_score.unwrap_or(default_min_score);
        if !(0.0..=1.0).contains(&min_score) {
            return Err(AppError::Validation(
                "min_score must be between 0.0 and 1.0".to_string(),
            ));
        }
        let limit = limit.unwrap_or(default_limit);
        if !(1..=max_limit).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {max_limit}"
            )));
        }
        Ok(Self {
            min_score,
            limit: limit as usize,
        })
    }

    fn from_rank_query(q: &RankQuery) -> Result<Self, AppError> {
        Self::resolve(q.min_score, q.limit, 0.0, 50, 500)
    }

    fn from_top_query(q: &TopQuery) -> Result<Self, AppError> {
        Self::resolve(q.min_score, q.top_n, 0.5, 10, 100)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn stored_record_error(kind: &str, id: Uuid, err: ValidationError) -> AppError {
    AppError::UnprocessableEntity(format!("{kind} {id} cannot be matched: {err}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/matching/score
///
/// Scores an inline candidate against an inline job. Nothing is read or stored.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let custom;
    let engine: &MatchEngine = match request.weights {
        Some(weights) => {
            custom = MatchEngine::new(weights)?;
            &custom
        }
        None => state.engine.as_ref(),
    };

    let result = engine.try_score(&request.candidate, &request.job)?;

    Ok(Json(ScoreResponse {
        match_score: round3(result.overall_score),
        match_percentage: result.match_percentage(),
        match_details: result,
    }))
}

/// POST /api/v1/matching/match
///
/// Matches a stored candidate to a stored job and, unless `create_profile` is
/// false, records the result on their profile.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let candidate_row = store::get_candidate(&state.db, request.candidate_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Candidate {} not found", request.candidate_id))
        })?;
    let job_row = store::get_job_posting(&state.db, request.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {} not found", request.job_id)))?;

    let candidate = candidate_row
        .to_profile()
        .map_err(|e| stored_record_error("Candidate", candidate_row.id, e))?;
    let job = job_row
        .to_requirement()
        .map_err(|e| stored_record_error("Job posting", job_row.id, e))?;

    let result = state.engine.score(&candidate, &job);

    let profile_id = if request.create_profile {
        let profile = store::upsert_profile(&state.db, &candidate_row, &job_row, &result).await?;
        Some(profile.id)
    } else {
        None
    };

    info!(
        "Matched candidate {} to job {}: score={:.3}",
        candidate_row.id, job_row.id, result.overall_score
    );

    Ok(Json(MatchResponse {
        summary: MatchSummary::new(&candidate_row, &job_row, result),
        profile_id,
    }))
}

/// GET /api/v1/matching/jobs/:id/candidates
pub async fn handle_job_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    let params = RankParams::from_rank_query(&query)?;
    Ok(Json(rank_candidates_for_job(&state, job_id, params).await?))
}

/// GET /api/v1/matching/jobs/:id/candidates/top
///
/// Shortlist variant: fewer results and a 0.5 default floor.
pub async fn handle_top_job_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    let params = RankParams::from_top_query(&query)?;
    Ok(Json(rank_candidates_for_job(&state, job_id, params).await?))
}

/// GET /api/v1/matching/candidates/:id/jobs
pub async fn handle_candidate_jobs(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    let params = RankParams::from_rank_query(&query)?;
    Ok(Json(rank_jobs_for_candidate(&state, candidate_id, params).await?))
}

/// GET /api/v1/matching/candidates/:id/jobs/recommended
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    let params = RankParams::from_top_query(&query)?;
    Ok(Json(rank_jobs_for_candidate(&state, candidate_id, params).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking pipelines
// ────────────────────────────────────────────────────────────────────────────

fn scan_limit(state: &AppState, params: RankParams) -> i64 {
    (params.limit as i64).saturating_mul(state.config.scan_multiplier)
}

async fn rank_candidates_for_job(
    state: &AppState,
    job_id: Uuid,
    params: RankParams,
) -> Result<Vec<MatchSummary>, AppError> {
    let job_row = store::get_job_posting(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job posting {job_id} not found")))?;
    let job = job_row
        .to_requirement()
        .map_err(|e| stored_record_error("Job posting", job_row.id, e))?;

    let rows = store::list_active_candidates(&state.db, scan_limit(state, params)).await?;
    let scanned = rows.len();
    let candidates: Vec<(CandidateRow, CandidateProfile)> = rows
        .into_iter()
        .filter_map(|row| match row.to_profile() {
            Ok(profile) => Some((row, profile)),
            Err(e) => {
                warn!("Skipping candidate {} for job {job_id}: {e}", row.id);
                None
            }
        })
        .collect();

    let engine = state.engine.clone();
    let ranked = tokio::task::spawn_blocking(move || {
        rank(candidates, params.min_score, params.limit, |(_, c)| {
            engine.score(c, &job)
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Ranking task failed: {e}")))?;

    info!(
        "Ranked candidates for job {job_id}: scanned={scanned} returned={}",
        ranked.len()
    );

    Ok(ranked
        .into_iter()
        .map(|r| MatchSummary::new(&r.item.0, &job_row, r.result))
        .collect())
}

async fn rank_jobs_for_candidate(
    state: &AppState,
    candidate_id: Uuid,
    params: RankParams,
) -> Result<Vec<MatchSummary>, AppError> {
    let candidate_row = store::get_candidate(&state.db, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;
    let candidate = candidate_row
        .to_profile()
        .map_err(|e| stored_record_error("Candidate", candidate_row.id, e))?;

    let rows = store::list_active_jobs(&state.db, scan_limit(state, params)).await?;
    let scanned = rows.len();
    let jobs: Vec<(JobPostingRow, JobRequirement)> = rows
        .into_iter()
        .filter_map(|row| match row.to_requirement() {
            Ok(job) => Some((row, job)),
            Err(e) => {
                warn!("Skipping job {} for candidate {candidate_id}: {e}", row.id);
                None
            }
        })
        .collect();

    let engine = state.engine.clone();
    let ranked = tokio::task::spawn_blocking(move || {
        rank(jobs, params.min_score, params.limit, |(_, j)| {
            engine.score(&candidate, j)
        })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Ranking task failed: {e}")))?;

    info!(
        "Ranked jobs for candidate {candidate_id}: scanned={scanned} returned={}",
        ranked.len()
    );

    Ok(ranked
        .into_iter()
        .map(|r| MatchSummary::new(&candidate_row, &r.item.0, r.result))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_query_defaults() {
        let params = RankParams::from_rank_query(&RankQuery {
            min_score: None,
            limit: None,
        })
        .unwrap();
        assert_eq!(
            params,
            RankParams {
                min_score: 0.0,
                limit: 50
            }
        );
    }

    #[test]
    fn test_top_query_defaults() {
        let params = RankParams::from_top_query(&TopQuery {
            min_score: None,
            top_n: None,
        })
        .unwrap();
        assert_eq!(
            params,
            RankParams {
                min_score: 0.5,
                limit: 10
            }
        );
    }

    #[test]
    fn test_out_of_range_params_rejected() {
        assert!(RankParams::resolve(Some(1.5), None, 0.0, 50, 500).is_err());
        assert!(RankParams::resolve(Some(-0.1), None, 0.0, 50, 500).is_err());
        assert!(RankParams::resolve(None, Some(0), 0.0, 50, 500).is_err());
        assert!(RankParams::resolve(None, Some(101), 0.5, 10, 100).is_err());
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.82549), 0.825);
        assert_eq!(round3(1.0), 1.0);
    }
}
