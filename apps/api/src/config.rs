use anyhow::{Context, Result};

use crate::matching::weights::MatchWeights;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Ranking endpoints scan `limit * scan_multiplier` active rows before filtering.
    pub scan_multiplier: i64,
    pub match_weights: MatchWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scan_multiplier: std::env::var("MATCH_SCAN_MULTIPLIER")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .context("MATCH_SCAN_MULTIPLIER must be a positive integer")?,
            match_weights: match std::env::var("MATCH_WEIGHTS") {
                Ok(raw) => parse_weights(&raw)?,
                Err(_) => MatchWeights::default(),
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses a `MATCH_WEIGHTS` JSON override and checks it still sums to 1.0.
fn parse_weights(raw: &str) -> Result<MatchWeights> {
    let weights: MatchWeights =
        serde_json::from_str(raw).context("MATCH_WEIGHTS must be a JSON weight table")?;
    weights
        .validate()
        .context("MATCH_WEIGHTS failed validation")?;
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weights_accepts_full_table() {
        let raw = r#"{
            "must_have_skills": 0.4,
            "nice_to_have_skills": 0.1,
            "experience": 0.2,
            "location": 0.1,
            "salary": 0.1,
            "right_to_work": 0.1
        }"#;
        let weights = parse_weights(raw).unwrap();
        assert!((weights.must_have_skills - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_weights_rejects_bad_sum() {
        let raw = r#"{
            "must_have_skills": 0.9,
            "nice_to_have_skills": 0.1,
            "experience": 0.2,
            "location": 0.1,
            "salary": 0.1,
            "right_to_work": 0.1
        }"#;
        assert!(parse_weights(raw).is_err());
    }

    #[test]
    fn test_parse_weights_rejects_garbage() {
        assert!(parse_weights("not json").is_err());
    }
}
