use serde::{Deserialize, Serialize};

use crate::matching::models::{CandidateLocation, JobLocation, WorkMode};
use crate::matching::weights::LocationWeights;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationScore {
    pub score: f64,
    pub right_to_work: bool,
    pub country_match: bool,
    pub city_match: bool,
    pub remote_compatibility: f64,
}

fn same_place(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// True when `country` appears in the candidate's right-to-work list.
pub fn has_right_to_work(right_to_work: &[String], country: &str) -> bool {
    right_to_work.iter().any(|c| same_place(c, country))
}

/// How well a candidate's stated preference fits the job's location policy.
pub fn remote_compatibility(policy: WorkMode, preference: WorkMode) -> f64 {
    match (policy, preference) {
        (WorkMode::Remote, _) => 1.0,
        (WorkMode::Hybrid, WorkMode::Remote | WorkMode::Hybrid) => 1.0,
        (WorkMode::Hybrid, WorkMode::Onsite) => 0.5,
        (WorkMode::Onsite, WorkMode::Onsite | WorkMode::Hybrid) => 1.0,
        (WorkMode::Onsite, WorkMode::Remote) => 0.0,
    }
}

pub fn score_location(
    candidate: &CandidateLocation,
    right_to_work: &[String],
    job: &JobLocation,
    policy: WorkMode,
    weights: &LocationWeights,
) -> LocationScore {
    let rtw = has_right_to_work(right_to_work, &job.country);
    let country_match = same_place(&candidate.country, &job.country);
    let city_match = country_match
        && matches!(
            (&candidate.city, &job.city),
            (Some(a), Some(b)) if same_place(a, b)
        );
    // City match is reported only; the country component is already at its cap.
    let country_component = if country_match { 1.0 } else { 0.0 };
    let remote = remote_compatibility(policy, candidate.remote_preference);

    let rtw_component = if rtw { 1.0 } else { 0.0 };
    let score = weights.right_to_work * rtw_component
        + weights.country * country_component
        + weights.remote * remote;

    LocationScore {
        score: score.clamp(0.0, 1.0),
        right_to_work: rtw,
        country_match,
        city_match,
        remote_compatibility: remote,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(country: &str, city: Option<&str>, pref: WorkMode) -> CandidateLocation {
        CandidateLocation {
            city: city.map(str::to_string),
            country: country.to_string(),
            remote_preference: pref,
        }
    }

    fn job(country: &str, city: Option<&str>) -> JobLocation {
        JobLocation {
            city: city.map(str::to_string),
            country: country.to_string(),
        }
    }

    fn rtw(countries: &[&str]) -> Vec<String> {
        countries.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_full_match_scores_one() {
        let result = score_location(
            &candidate("UK", Some("London"), WorkMode::Hybrid),
            &rtw(&["UK"]),
            &job("uk", Some("london")),
            WorkMode::Hybrid,
            &LocationWeights::default(),
        );
        assert!((result.score - 1.0).abs() < 1e-12);
        assert!(result.city_match);
    }

    #[test]
    fn test_city_match_does_not_exceed_one() {
        let with_city = score_location(
            &candidate("UK", Some("London"), WorkMode::Onsite),
            &rtw(&["UK"]),
            &job("UK", Some("London")),
            WorkMode::Onsite,
            &LocationWeights::default(),
        );
        let without_city = score_location(
            &candidate("UK", Some("Leeds"), WorkMode::Onsite),
            &rtw(&["UK"]),
            &job("UK", Some("London")),
            WorkMode::Onsite,
            &LocationWeights::default(),
        );
        assert_eq!(with_city.score, without_city.score);
    }

    #[test]
    fn test_different_country_without_rtw() {
        let result = score_location(
            &candidate("FR", None, WorkMode::Remote),
            &rtw(&["FR"]),
            &job("UK", None),
            WorkMode::Remote,
            &LocationWeights::default(),
        );
        // Only the remote component applies.
        assert!((result.score - 0.3).abs() < 1e-12);
        assert!(!result.right_to_work);
        assert!(!result.country_match);
    }

    #[test]
    fn test_remote_policy_accepts_any_preference() {
        for pref in [WorkMode::Onsite, WorkMode::Hybrid, WorkMode::Remote] {
            assert_eq!(remote_compatibility(WorkMode::Remote, pref), 1.0);
        }
    }

    #[test]
    fn test_hybrid_policy_table() {
        assert_eq!(remote_compatibility(WorkMode::Hybrid, WorkMode::Remote), 1.0);
        assert_eq!(remote_compatibility(WorkMode::Hybrid, WorkMode::Hybrid), 1.0);
        assert_eq!(remote_compatibility(WorkMode::Hybrid, WorkMode::Onsite), 0.5);
    }

    #[test]
    fn test_onsite_policy_table() {
        assert_eq!(remote_compatibility(WorkMode::Onsite, WorkMode::Onsite), 1.0);
        assert_eq!(remote_compatibility(WorkMode::Onsite, WorkMode::Hybrid), 1.0);
        assert_eq!(remote_compatibility(WorkMode::Onsite, WorkMode::Remote), 0.0);
    }

    #[test]
    fn test_right_to_work_is_case_insensitive() {
        assert!(has_right_to_work(&rtw(&["gb", " us "]), "US"));
        assert!(!has_right_to_work(&rtw(&[]), "US"));
    }
}
