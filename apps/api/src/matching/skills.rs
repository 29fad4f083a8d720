//! Skill sub-scorer: exact / partial / no match per requirement, averaged per list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::matching::models::{CandidateProfile, SkillRequirement};

/// A partial match needs this share of the smaller token set in common.
const PARTIAL_OVERLAP_RATIO: f64 = 0.5;

/// Whole-name aliases applied after lowercasing.
const SKILL_ALIASES: &[(&str, &str)] = &[
    ("node", "node.js"),
    ("nodejs", "node.js"),
    ("node js", "node.js"),
    ("js", "javascript"),
    ("reactjs", "react"),
    ("react.js", "react"),
    ("vuejs", "vue"),
    ("vue.js", "vue"),
    ("postgres", "postgresql"),
    ("golang", "go"),
    ("k8s", "kubernetes"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Partial,
    None,
}

impl MatchType {
    pub fn score(&self) -> f64 {
        match self {
            MatchType::Exact => 1.0,
            MatchType::Partial => 0.5,
            MatchType::None => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub requirement: String,
    pub match_type: MatchType,
    pub score: f64,
    /// Candidate skill or technology that satisfied the requirement.
    pub evidence: Option<String>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScore {
    pub score: f64,
    pub matches: Vec<SkillMatch>,
}

impl SkillScore {
    pub fn matched(&self) -> impl Iterator<Item = &SkillMatch> {
        self.matches
            .iter()
            .filter(|m| m.match_type != MatchType::None)
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &SkillMatch> {
        self.matches
            .iter()
            .filter(|m| m.match_type == MatchType::None)
    }
}

/// Lowercases, trims and collapses whitespace, then resolves known aliases.
pub fn normalize_skill(name: &str) -> String {
    let collapsed = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    SKILL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == collapsed)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(collapsed)
}

/// Splits a normalized name on non-alphanumeric boundaries.
pub fn tokenize(normalized: &str) -> BTreeSet<String> {
    normalized
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone)]
struct PoolEntry {
    original: String,
    normalized: String,
    tokens: BTreeSet<String>,
}

impl PoolEntry {
    fn new(original: &str) -> Self {
        let normalized = normalize_skill(original);
        let tokens = tokenize(&normalized);
        Self {
            original: original.trim().to_string(),
            normalized,
            tokens,
        }
    }
}

/// Everything a candidate can be matched on: declared skills first, then
/// technologies pulled from their experience.
#[derive(Debug, Clone, Default)]
pub struct SkillPool {
    entries: Vec<PoolEntry>,
}

impl SkillPool {
    pub fn from_candidate(candidate: &CandidateProfile) -> Self {
        let mut pool = SkillPool::default();
        for skill in &candidate.skills {
            pool.push(&skill.name);
        }
        for item in &candidate.experience {
            for tech in &item.technologies {
                pool.push(tech);
            }
        }
        pool
    }

    fn push(&mut self, name: &str) {
        let entry = PoolEntry::new(name);
        if entry.normalized.is_empty()
            || self.entries.iter().any(|e| e.normalized == entry.normalized)
        {
            return;
        }
        self.entries.push(entry);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Best match for one requirement. Exact beats partial regardless of pool order.
    pub fn match_requirement(&self, requirement: &str) -> (MatchType, Option<String>) {
        let wanted = PoolEntry::new(requirement);

        if let Some(hit) = self
            .entries
            .iter()
            .find(|e| e.normalized == wanted.normalized)
        {
            return (MatchType::Exact, Some(hit.original.clone()));
        }

        if let Some(hit) = self
            .entries
            .iter()
            .find(|e| tokens_overlap(&wanted.tokens, &e.tokens))
        {
            return (MatchType::Partial, Some(hit.original.clone()));
        }

        (MatchType::None, None)
    }
}

fn tokens_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return false;
    }
    let shared = a.intersection(b).count();
    shared > 0 && shared as f64 >= PARTIAL_OVERLAP_RATIO * smaller as f64
}

/// Unset weights take the mean of the supplied ones; with none supplied every
/// requirement counts equally.
fn resolve_weights(requirements: &[SkillRequirement]) -> Vec<f64> {
    let supplied: Vec<f64> = requirements.iter().filter_map(|r| r.weight).collect();
    if supplied.is_empty() {
        return vec![1.0; requirements.len()];
    }
    let n = supplied.len() as f64;
    let fallback: f64 = supplied.iter().map(|w| w / n).sum();
    requirements
        .iter()
        .map(|r| r.weight.unwrap_or(fallback))
        .collect()
}

/// Scores a requirement list against the pool. An empty list scores 1.0.
pub fn score_skill_list(requirements: &[SkillRequirement], pool: &SkillPool) -> SkillScore {
    if requirements.is_empty() {
        return SkillScore {
            score: 1.0,
            matches: vec![],
        };
    }

    let weights = resolve_weights(requirements);
    let matches: Vec<SkillMatch> = requirements
        .iter()
        .zip(weights)
        .map(|(req, weight)| {
            let (match_type, evidence) = pool.match_requirement(&req.name);
            SkillMatch {
                requirement: req.name.clone(),
                match_type,
                score: match_type.score(),
                evidence,
                weight,
            }
        })
        .collect();

    // Scaled by the largest weight so the sums stay finite for any finite input.
    let max_weight = matches.iter().map(|m| m.weight).fold(0.0_f64, f64::max);
    let score = if max_weight > 0.0 && max_weight.is_finite() {
        let total_weight: f64 = matches.iter().map(|m| m.weight / max_weight).sum();
        matches
            .iter()
            .map(|m| m.score * (m.weight / max_weight))
            .sum::<f64>()
            / total_weight
    } else {
        matches.iter().map(|m| m.score).sum::<f64>() / matches.len() as f64
    };

    SkillScore {
        score: score.clamp(0.0, 1.0),
        matches,
    }
}
