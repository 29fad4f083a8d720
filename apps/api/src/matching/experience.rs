use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::matching::models::ExperienceItem;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceScore {
    pub score: f64,
    pub years_required: Option<f64>,
    pub years_actual: f64,
}

/// Sums the span of every entry in years. Overlapping entries are counted twice,
/// as stated. Entries without an end date run until `as_of`.
pub fn total_years(experience: &[ExperienceItem], as_of: NaiveDate) -> f64 {
    experience
        .iter()
        .map(|item| {
            let end = item.end_date.unwrap_or(as_of);
            let days = (end - item.start_date).num_days().max(0);
            days as f64 / DAYS_PER_YEAR
        })
        .sum()
}

/// Unset (or zero) minimum scores 1.0; otherwise 1.0 / 0.8 / 0.6 bands, then a
/// straight ratio.
pub fn score_experience(
    years_required: Option<f64>,
    experience: &[ExperienceItem],
    as_of: NaiveDate,
) -> ExperienceScore {
    let years_actual = total_years(experience, as_of);

    let score = match years_required {
        Some(required) if required > 0.0 => {
            if years_actual >= required {
                1.0
            } else if years_actual >= required * 0.8 {
                0.8
            } else if years_actual >= required * 0.6 {
                0.6
            } else {
                (years_actual / required).max(0.0)
            }
        }
        _ => 1.0,
    };

    ExperienceScore {
        score,
        years_required,
        years_actual,
    }
}
