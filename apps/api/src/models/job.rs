use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::models::{
    CompensationRange, JobLocation, JobRequirement, PayPeriod, SkillRequirement,
    ValidationError, WorkMode,
};
use crate::models::decode_column;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub title: String,
    pub client: String,
    pub location_policy: Option<String>,
    pub primary_location_city: Option<String>,
    pub primary_location_country: Option<String>,
    pub salary_band_min: Option<f64>,
    pub salary_band_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary_period: Option<String>,
    pub requirements: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shape of the `requirements` JSONB column written by the JD normalizer.
#[derive(Debug, Default, Deserialize)]
struct RequirementsColumn {
    #[serde(default, alias = "must_haves")]
    must_have_skills: Vec<SkillRequirement>,
    #[serde(default, alias = "nice_to_haves")]
    nice_to_have_skills: Vec<SkillRequirement>,
    #[serde(default)]
    years_experience_min: Option<f64>,
}

impl JobPostingRow {
    pub fn to_requirement(&self) -> Result<JobRequirement, ValidationError> {
        let country = self
            .primary_location_country
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or(ValidationError::MissingField("primary_location_country"))?;

        let location_policy = self
            .location_policy
            .as_deref()
            .ok_or(ValidationError::MissingField("location_policy"))?
            .parse::<WorkMode>()
            .map_err(|reason| ValidationError::Malformed {
                field: "location_policy",
                reason,
            })?;

        let requirements: RequirementsColumn = match &self.requirements {
            Value::Null => RequirementsColumn::default(),
            value => decode_column("requirements", value)?,
        };

        let salary_band = if self.salary_band_min.is_some() || self.salary_band_max.is_some() {
            let period = match self.salary_period.as_deref() {
                Some(raw) => raw
                    .parse::<PayPeriod>()
                    .map_err(|reason| ValidationError::Malformed {
                        field: "salary_period",
                        reason,
                    })?,
                None => PayPeriod::default(),
            };
            Some(CompensationRange {
                min: self.salary_band_min,
                max: self.salary_band_max,
                currency: self.salary_currency.clone().unwrap_or_default(),
                period,
            })
        } else {
            None
        };

        let requirement = JobRequirement {
            must_have_skills: requirements.must_have_skills,
            nice_to_have_skills: requirements.nice_to_have_skills,
            years_experience_min: requirements.years_experience_min,
            location_policy,
            primary_location: JobLocation {
                city: self.primary_location_city.clone(),
                country,
            },
            salary_band,
        };
        requirement.validate()?;
        Ok(requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> JobPostingRow {
        JobPostingRow {
            id: Uuid::new_v4(),
            title: "Senior Backend Engineer".to_string(),
            client: "Fintech Ltd".to_string(),
            location_policy: Some("hybrid".to_string()),
            primary_location_city: Some("London".to_string()),
            primary_location_country: Some("UK".to_string()),
            salary_band_min: Some(70_000.0),
            salary_band_max: Some(90_000.0),
            salary_currency: Some("GBP".to_string()),
            salary_period: Some("year".to_string()),
            requirements: json!({
                "must_haves": [{"name": "Node.js & TypeScript", "weight": 0.6}, {"name": "AWS"}],
                "nice_to_haves": [{"name": "Terraform"}],
                "years_experience_min": 5
            }),
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_converts_to_requirement() {
        let req = row().to_requirement().unwrap();
        assert_eq!(req.must_have_skills.len(), 2);
        assert_eq!(req.must_have_skills[0].weight, Some(0.6));
        assert_eq!(req.nice_to_have_skills[0].name, "Terraform");
        assert_eq!(req.years_experience_min, Some(5.0));
        assert_eq!(req.location_policy, WorkMode::Hybrid);
        let band = req.salary_band.unwrap();
        assert_eq!(band.min, Some(70_000.0));
        assert_eq!(band.period, PayPeriod::Year);
    }

    #[test]
    fn test_no_salary_columns_means_no_band() {
        let mut r = row();
        r.salary_band_min = None;
        r.salary_band_max = None;
        assert!(r.to_requirement().unwrap().salary_band.is_none());
    }

    #[test]
    fn test_band_without_currency_is_rejected() {
        let mut r = row();
        r.salary_currency = None;
        assert_eq!(
            r.to_requirement(),
            Err(ValidationError::MissingField("salary_band"))
        );
    }

    #[test]
    fn test_missing_policy_is_rejected() {
        let mut r = row();
        r.location_policy = None;
        assert_eq!(
            r.to_requirement(),
            Err(ValidationError::MissingField("location_policy"))
        );
    }

    #[test]
    fn test_empty_requirements_column() {
        let mut r = row();
        r.requirements = json!({});
        let req = r.to_requirement().unwrap();
        assert!(req.must_have_skills.is_empty());
        assert!(req.years_experience_min.is_none());
    }
}
