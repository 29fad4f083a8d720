use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::matching::engine::MatchResult;
use crate::models::candidate::CandidateRow;
use crate::models::job::JobPostingRow;
use crate::models::profile::CandidateProfileRow;

pub async fn get_candidate(pool: &PgPool, id: Uuid) -> Result<Option<CandidateRow>> {
    Ok(
        sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_job_posting(pool: &PgPool, id: Uuid) -> Result<Option<JobPostingRow>> {
    Ok(
        sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Active candidates, oldest first, capped at `limit`.
pub async fn list_active_candidates(pool: &PgPool, limit: i64) -> Result<Vec<CandidateRow>> {
    Ok(sqlx::query_as::<_, CandidateRow>(
        "SELECT * FROM candidates WHERE status = 'active' ORDER BY created_at, id LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Active job postings, oldest first, capped at `limit`.
pub async fn list_active_jobs(pool: &PgPool, limit: i64) -> Result<Vec<JobPostingRow>> {
    Ok(sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE status = 'active' ORDER BY created_at, id LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Creates or refreshes the candidate/job profile with the latest match.
pub async fn upsert_profile(
    pool: &PgPool,
    candidate: &CandidateRow,
    job: &JobPostingRow,
    result: &MatchResult,
) -> Result<CandidateProfileRow> {
    let details = serde_json::to_value(result).context("Failed to serialize match result")?;
    let profile_name = format!("{} - {} at {}", candidate.full_name, job.title, job.client);

    let row = sqlx::query_as::<_, CandidateProfileRow>(
        r#"
        INSERT INTO candidate_profiles
            (candidate_id, job_posting_id, profile_name, company_name, role_title,
             match_score, match_details, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'active')
        ON CONFLICT (candidate_id, job_posting_id) DO UPDATE
        SET match_score = EXCLUDED.match_score,
            match_details = EXCLUDED.match_details,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(candidate.id)
    .bind(job.id)
    .bind(&profile_name)
    .bind(&job.client)
    .bind(&job.title)
    .bind(result.overall_score)
    .bind(&details)
    .fetch_one(pool)
    .await?;

    info!(
        "Stored profile {} for candidate {} and job {} (score {:.3})",
        row.id, candidate.id, job.id, result.overall_score
    );
    Ok(row)
}
