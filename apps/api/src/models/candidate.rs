use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::matching::models::{
    CandidateLocation, CandidateProfile, CompensationRange, ExperienceItem, Skill,
    ValidationError, WorkMode,
};
use crate::models::decode_column;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    pub remote_preference: Option<String>,
    pub right_to_work: Vec<String>,
    pub target_compensation: Option<Value>,
    pub experience: Value,
    pub skills: Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateRow {
    /// Builds the matching input for this row. Fails if the row lacks fields the
    /// scorer needs or its JSON columns do not decode.
    pub fn to_profile(&self) -> Result<CandidateProfile, ValidationError> {
        let country = self
            .location_country
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or(ValidationError::MissingField("location_country"))?;

        let remote_preference = self
            .remote_preference
            .as_deref()
            .ok_or(ValidationError::MissingField("remote_preference"))?
            .parse::<WorkMode>()
            .map_err(|reason| ValidationError::Malformed {
                field: "remote_preference",
                reason,
            })?;

        let skills: Vec<Skill> = decode_column("skills", &self.skills)?;
        let experience: Vec<ExperienceItem> = decode_column("experience", &self.experience)?;
        let target_compensation: Option<CompensationRange> = match &self.target_compensation {
            Some(Value::Null) | None => None,
            Some(value) => Some(decode_column("target_compensation", value)?),
        };

        let profile = CandidateProfile {
            name: self.full_name.clone(),
            email: self.email.clone(),
            skills,
            experience,
            location: CandidateLocation {
                city: self.location_city.clone(),
                country,
                remote_preference,
            },
            right_to_work: self.right_to_work.clone(),
            target_compensation,
        };
        profile.validate()?;
        Ok(profile)
    }
}
