//! Typed inputs for the matching engine.
//!
//! Candidate and job records arrive from the ingestion layer as JSON. Everything
//! the scorer reads is an explicit field here, and `validate()` rejects shapes the
//! scorer cannot reason about before any scoring happens.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("skill requirement '{name}' has invalid weight {weight}")]
    InvalidSkillWeight { name: String, weight: f64 },

    #[error("experience at '{employer}' ends ({end}) before it starts ({start})")]
    EndBeforeStart {
        employer: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("field '{field}' must be a finite non-negative number, got {value}")]
    NegativeValue { field: &'static str, value: f64 },

    #[error("range '{field}' has min {min} greater than max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("invalid weight table: {0}")]
    InvalidWeights(String),

    #[error("malformed field '{field}': {reason}")]
    Malformed { field: &'static str, reason: String },
}

fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

fn require_non_negative(value: f64, field: &'static str) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeValue { field, value })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Work arrangement, used for both the candidate's preference and the job's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum WorkMode {
    Onsite,
    Hybrid,
    Remote,
}

impl std::str::FromStr for WorkMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "onsite" | "on-site" | "on_site" | "office" => Ok(WorkMode::Onsite),
            "hybrid" => Ok(WorkMode::Hybrid),
            "remote" => Ok(WorkMode::Remote),
            other => Err(format!("unknown work mode '{other}'")),
        }
    }
}

impl TryFrom<String> for WorkMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Pay period of a compensation figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PayPeriod {
    Hour,
    Day,
    Week,
    Month,
    #[default]
    Year,
}

impl PayPeriod {
    /// Multiplier that converts an amount in this period to a yearly amount.
    pub fn annual_factor(&self) -> f64 {
        match self {
            PayPeriod::Hour => 2080.0,
            PayPeriod::Day => 260.0,
            PayPeriod::Week => 52.0,
            PayPeriod::Month => 12.0,
            PayPeriod::Year => 1.0,
        }
    }
}

impl std::str::FromStr for PayPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hour" | "hourly" => Ok(PayPeriod::Hour),
            "day" | "daily" => Ok(PayPeriod::Day),
            "week" | "weekly" => Ok(PayPeriod::Week),
            "month" | "monthly" => Ok(PayPeriod::Month),
            "year" | "yearly" | "annual" | "annum" => Ok(PayPeriod::Year),
            other => Err(format!("unknown pay period '{other}'")),
        }
    }
}

impl TryFrom<String> for PayPeriod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRange {
    #[serde(default, alias = "base_min")]
    pub min: Option<f64>,
    #[serde(default, alias = "base_max")]
    pub max: Option<f64>,
    pub currency: String,
    #[serde(default)]
    pub period: PayPeriod,
}

impl CompensationRange {
    /// A range with neither bound says nothing about pay.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn validate(&self, field: &'static str) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Ok(());
        }
        require_text(&self.currency, field)?;
        if let Some(min) = self.min {
            require_non_negative(min, field)?;
        }
        if let Some(max) = self.max {
            require_non_negative(max, field)?;
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ValidationError::InvertedRange { field, min, max });
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate side
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "company")]
    pub employer: String,
    #[serde(deserialize_with = "partial_date::deserialize")]
    pub start_date: NaiveDate,
    #[serde(default, deserialize_with = "partial_date::deserialize_option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLocation {
    #[serde(default)]
    pub city: Option<String>,
    pub country: String,
    pub remote_preference: WorkMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    pub location: CandidateLocation,
    #[serde(default)]
    pub right_to_work: Vec<String>,
    #[serde(default)]
    pub target_compensation: Option<CompensationRange>,
}

impl CandidateProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")?;
        require_text(&self.location.country, "location.country")?;

        for item in &self.experience {
            if let Some(end) = item.end_date {
                if end < item.start_date {
                    return Err(ValidationError::EndBeforeStart {
                        employer: item.employer.clone(),
                        start: item.start_date,
                        end,
                    });
                }
            }
        }

        if let Some(target) = &self.target_compensation {
            target.validate("target_compensation")?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job side
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLocation {
    #[serde(default)]
    pub city: Option<String>,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default, alias = "must_haves")]
    pub must_have_skills: Vec<SkillRequirement>,
    #[serde(default, alias = "nice_to_haves")]
    pub nice_to_have_skills: Vec<SkillRequirement>,
    #[serde(default)]
    pub years_experience_min: Option<f64>,
    pub location_policy: WorkMode,
    pub primary_location: JobLocation,
    #[serde(default)]
    pub salary_band: Option<CompensationRange>,
}

impl JobRequirement {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.primary_location.country, "primary_location.country")?;

        for (field, list) in [
            ("must_have_skills.name", &self.must_have_skills),
            ("nice_to_have_skills.name", &self.nice_to_have_skills),
        ] {
            for req in list {
                require_text(&req.name, field)?;
                if let Some(weight) = req.weight {
                    if !weight.is_finite() || weight < 0.0 {
                        return Err(ValidationError::InvalidSkillWeight {
                            name: req.name.clone(),
                            weight,
                        });
                    }
                }
            }
        }

        if let Some(years) = self.years_experience_min {
            require_non_negative(years, "years_experience_min")?;
        }
        if let Some(band) = &self.salary_band {
            band.validate("salary_band")?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial dates ("2021-03-15", "2021-03", "2021")
// ────────────────────────────────────────────────────────────────────────────

pub(crate) mod partial_date {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer};

    /// Parses a full, year-month or year-only date. Missing parts default to the first.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        let mut parts = raw.split('-');
        let year: i32 = parts.next()?.trim().parse().ok()?;
        let month: u32 = match parts.next() {
            Some(m) => m.trim().parse().ok()?,
            None => 1,
        };
        if parts.next().is_some() {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    fn is_open_ended(raw: &str) -> bool {
        matches!(
            raw.trim().to_lowercase().as_str(),
            "" | "present" | "current" | "now"
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if is_open_ended(&raw) => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'"))),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_dates_parse() {
        assert_eq!(partial_date::parse("2021-03-15"), Some(date(2021, 3, 15)));
        assert_eq!(partial_date::parse("2021-03"), Some(date(2021, 3, 1)));
        assert_eq!(partial_date::parse("2021"), Some(date(2021, 1, 1)));
        assert_eq!(partial_date::parse("2021-13"), None);
        assert_eq!(partial_date::parse("soon"), None);
    }

    #[test]
    fn test_candidate_deserializes_from_parser_shape() {
        let value = json!({
            "full_name": "Grace Hopper",
            "skills": [{"name": "COBOL", "category": "language"}],
            "experience": [{
                "title": "Engineer",
                "company": "Navy",
                "start_date": "2019-06",
                "end_date": "present",
                "is_current": true,
                "technologies": ["UNIVAC"]
            }],
            "location": {"country": "US", "remote_preference": "On-Site"},
            "right_to_work": ["US"],
            "target_compensation": {"base_min": 90000, "base_max": 110000, "currency": "USD", "period": "annual"}
        });
        let candidate: CandidateProfile = serde_json::from_value(value).unwrap();
        assert_eq!(candidate.name, "Grace Hopper");
        assert_eq!(candidate.location.remote_preference, WorkMode::Onsite);
        assert_eq!(candidate.experience[0].employer, "Navy");
        assert_eq!(candidate.experience[0].start_date, date(2019, 6, 1));
        assert_eq!(candidate.experience[0].end_date, None);
        let target = candidate.target_compensation.unwrap();
        assert_eq!(target.min, Some(90000.0));
        assert_eq!(target.period, PayPeriod::Year);
    }

    #[test]
    fn test_unknown_work_mode_rejected() {
        let result: Result<WorkMode, _> = serde_json::from_value(json!("sometimes"));
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_fixtures_pass() {
        assert!(candidate(&["Rust"]).validate().is_ok());
        assert!(job(&["Rust"]).validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut c = candidate(&[]);
        c.name = "  ".to_string();
        assert_eq!(c.validate(), Err(ValidationError::MissingField("name")));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut c = candidate(&[]);
        c.experience.push(ExperienceItem {
            title: "Dev".to_string(),
            employer: "Acme".to_string(),
            start_date: date(2022, 1, 1),
            end_date: Some(date(2021, 1, 1)),
            is_current: false,
            technologies: vec![],
        });
        assert!(matches!(
            c.validate(),
            Err(ValidationError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_negative_skill_weight_rejected() {
        let mut j = job(&[]);
        j.must_have_skills.push(SkillRequirement {
            name: "Go".to_string(),
            weight: Some(-1.0),
        });
        assert!(matches!(
            j.validate(),
            Err(ValidationError::InvalidSkillWeight { .. })
        ));
    }

    #[test]
    fn test_negative_years_rejected() {
        let mut j = job(&[]);
        j.years_experience_min = Some(-2.0);
        assert!(matches!(
            j.validate(),
            Err(ValidationError::NegativeValue { .. })
        ));
    }

    #[test]
    fn test_inverted_salary_band_rejected() {
        let mut j = job(&[]);
        j.salary_band = Some(range(Some(80_000.0), Some(60_000.0), "GBP"));
        assert!(matches!(
            j.validate(),
            Err(ValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_empty_salary_band_needs_no_currency() {
        let mut j = job(&[]);
        j.salary_band = Some(range(None, None, ""));
        assert!(j.validate().is_ok());
    }
}
