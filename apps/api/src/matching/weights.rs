use serde::{Deserialize, Serialize};

use crate::matching::models::ValidationError;

const SUM_TOLERANCE: f64 = 1e-6;

/// Top-level factor weights. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchWeights {
    pub must_have_skills: f64,
    pub nice_to_have_skills: f64,
    pub experience: f64,
    pub location: f64,
    pub salary: f64,
    pub right_to_work: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            must_have_skills: 0.35,
            nice_to_have_skills: 0.10,
            experience: 0.20,
            location: 0.15,
            salary: 0.10,
            right_to_work: 0.10,
        }
    }
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.must_have_skills
            + self.nice_to_have_skills
            + self.experience
            + self.location
            + self.salary
            + self.right_to_work
    }

    fn values(&self) -> [(&'static str, f64); 6] {
        [
            ("must_have_skills", self.must_have_skills),
            ("nice_to_have_skills", self.nice_to_have_skills),
            ("experience", self.experience),
            ("location", self.location),
            ("salary", self.salary),
            ("right_to_work", self.right_to_work),
        ]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in self.values() {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidWeights(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(ValidationError::InvalidWeights(format!(
                "weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Split of the location factor into its three components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationWeights {
    pub right_to_work: f64,
    pub country: f64,
    pub remote: f64,
}

impl Default for LocationWeights {
    fn default() -> Self {
        Self {
            right_to_work: 0.3,
            country: 0.4,
            remote: 0.3,
        }
    }
}

impl LocationWeights {
    #[cfg(test)]
    pub fn sum(&self) -> f64 {
        self.right_to_work + self.country + self.remote
    }
}
