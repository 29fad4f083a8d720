//! Matching engine: weighted multi-factor fit between one candidate and one job.
//!
//! `overall_score = Σ factor_score × weight`, clamped to [0, 1]. Every factor
//! score lands in [0, 1]; unknown inputs score 1.0 rather than being guessed.
//! The engine holds no mutable state and can be shared freely across threads.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matching::experience::{score_experience, ExperienceScore};
use crate::matching::location::{has_right_to_work, score_location, LocationScore};
use crate::matching::models::{CandidateProfile, JobRequirement, ValidationError};
use crate::matching::salary::{score_salary, SalaryScore};
use crate::matching::skills::{score_skill_list, SkillPool, SkillScore};
use crate::matching::weights::{LocationWeights, MatchWeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    MustHaveSkills,
    NiceToHaveSkills,
    Experience,
    Location,
    Salary,
    RightToWork,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::MustHaveSkills,
        Factor::NiceToHaveSkills,
        Factor::Experience,
        Factor::Location,
        Factor::Salary,
        Factor::RightToWork,
    ];

    pub fn weight(&self, weights: &MatchWeights) -> f64 {
        match self {
            Factor::MustHaveSkills => weights.must_have_skills,
            Factor::NiceToHaveSkills => weights.nice_to_have_skills,
            Factor::Experience => weights.experience,
            Factor::Location => weights.location,
            Factor::Salary => weights.salary,
            Factor::RightToWork => weights.right_to_work,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetails {
    pub must_have_skills: SkillScore,
    pub nice_to_have_skills: SkillScore,
    pub experience: ExperienceScore,
    pub location: LocationScore,
    pub salary: SalaryScore,
    pub right_to_work: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub overall_score: f64,
    /// Raw per-factor scores in [0, 1].
    pub factor_scores: BTreeMap<Factor, f64>,
    /// Weighted contribution of each factor; sums to `overall_score`.
    pub breakdown: BTreeMap<Factor, f64>,
    pub weights: MatchWeights,
    pub details: MatchDetails,
}

impl MatchResult {
    pub fn match_percentage(&self) -> f64 {
        (self.overall_score * 1000.0).round() / 10.0
    }
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    weights: MatchWeights,
    location_weights: LocationWeights,
    /// Pinned "today" for experience spans; `None` reads the clock per call.
    as_of: Option<NaiveDate>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self {
            weights: MatchWeights::default(),
            location_weights: LocationWeights::default(),
            as_of: None,
        }
    }
}

impl MatchEngine {
    pub fn new(weights: MatchWeights) -> Result<Self, ValidationError> {
        weights.validate()?;
        Ok(Self {
            weights,
            ..Self::default()
        })
    }

    #[allow(dead_code)]
    pub fn with_reference_date(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    fn reference_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Validates both records, then scores them.
    pub fn try_score(
        &self,
        candidate: &CandidateProfile,
        job: &JobRequirement,
    ) -> Result<MatchResult, ValidationError> {
        candidate.validate()?;
        job.validate()?;
        Ok(self.score(candidate, job))
    }

    /// Scores a candidate against a job. Inputs are assumed validated.
    pub fn score(&self, candidate: &CandidateProfile, job: &JobRequirement) -> MatchResult {
        let pool = SkillPool::from_candidate(candidate);
        let must_have = score_skill_list(&job.must_have_skills, &pool);
        let nice_to_have = score_skill_list(&job.nice_to_have_skills, &pool);

        let experience = score_experience(
            job.years_experience_min,
            &candidate.experience,
            self.reference_date(),
        );

        let location = score_location(
            &candidate.location,
            &candidate.right_to_work,
            &job.primary_location,
            job.location_policy,
            &self.location_weights,
        );

        let salary = score_salary(
            candidate.target_compensation.as_ref(),
            job.salary_band.as_ref(),
        );

        let right_to_work =
            has_right_to_work(&candidate.right_to_work, &job.primary_location.country);

        let factor_scores: BTreeMap<Factor, f64> = Factor::ALL
            .iter()
            .map(|factor| {
                let score = match factor {
                    Factor::MustHaveSkills => must_have.score,
                    Factor::NiceToHaveSkills => nice_to_have.score,
                    Factor::Experience => experience.score,
                    Factor::Location => location.score,
                    Factor::Salary => salary.score,
                    Factor::RightToWork => {
                        if right_to_work {
                            1.0
                        } else {
                            0.0
                        }
                    }
                };
                (*factor, score)
            })
            .collect();

        let breakdown: BTreeMap<Factor, f64> = factor_scores
            .iter()
            .map(|(factor, score)| (*factor, score * factor.weight(&self.weights)))
            .collect();

        let overall_score = breakdown.values().sum::<f64>().clamp(0.0, 1.0);

        debug!(
            candidate = %candidate.name,
            overall_score,
            must_have = must_have.score,
            must_have_matched = must_have.matched().count(),
            must_have_missing = must_have.unmatched().count(),
            experience_years = experience.years_actual,
            salary_outcome = ?salary.outcome,
            "Scored candidate against job"
        );

        MatchResult {
            overall_score,
            factor_scores,
            breakdown,
            weights: self.weights,
            details: MatchDetails {
                must_have_skills: must_have,
                nice_to_have_skills: nice_to_have,
                experience,
                location,
                salary,
                right_to_work,
            },
        }
    }
}
