//! Salary sub-scorer: candidate target range vs the job's salary band.
//!
//! Both ranges are annualized before comparison. Missing bounds are filled as
//! follows: a candidate bound mirrors the other bound, a missing job minimum is
//! 0 and a missing job maximum is unbounded.

use serde::{Deserialize, Serialize};

use crate::matching::models::CompensationRange;

const CURRENCY_MISMATCH_SCORE: f64 = 0.3;
const BELOW_BAND_SCORE: f64 = 0.7;
/// Above the band, the score falls from 0.5 to 0.0 over this share of the band width.
const ABOVE_BAND_DECAY_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryOutcome {
    Unknown,
    CurrencyMismatch,
    WithinBand,
    PartialOverlap,
    AboveBand,
    BelowBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryScore {
    pub score: f64,
    pub outcome: SalaryOutcome,
    /// Share of the candidate range covered by the band (overlap case only).
    pub overlap_ratio: Option<f64>,
}

impl SalaryScore {
    fn fixed(score: f64, outcome: SalaryOutcome) -> Self {
        Self {
            score,
            outcome,
            overlap_ratio: None,
        }
    }
}

fn usable(range: Option<&CompensationRange>) -> Option<&CompensationRange> {
    range.filter(|r| !r.is_empty())
}

fn candidate_bounds(range: &CompensationRange) -> (f64, f64) {
    let factor = range.period.annual_factor();
    let lo = range.min.or(range.max).unwrap_or(0.0) * factor;
    let hi = range.max.or(range.min).unwrap_or(0.0) * factor;
    (lo, hi)
}

fn band_bounds(range: &CompensationRange) -> (f64, f64) {
    let factor = range.period.annual_factor();
    let lo = range.min.unwrap_or(0.0) * factor;
    let hi = range.max.map(|m| m * factor).unwrap_or(f64::INFINITY);
    (lo, hi)
}

pub fn score_salary(
    target: Option<&CompensationRange>,
    band: Option<&CompensationRange>,
) -> SalaryScore {
    let (target, band) = match (usable(target), usable(band)) {
        (Some(t), Some(b)) => (t, b),
        _ => return SalaryScore::fixed(1.0, SalaryOutcome::Unknown),
    };

    if !target
        .currency
        .trim()
        .eq_ignore_ascii_case(band.currency.trim())
    {
        return SalaryScore::fixed(CURRENCY_MISMATCH_SCORE, SalaryOutcome::CurrencyMismatch);
    }

    let (c_lo, c_hi) = candidate_bounds(target);
    let (j_lo, j_hi) = band_bounds(band);

    if c_lo >= j_lo && c_hi <= j_hi {
        return SalaryScore::fixed(1.0, SalaryOutcome::WithinBand);
    }

    if c_lo <= j_hi && c_hi >= j_lo {
        // Not fully inside, so the candidate range has positive width here.
        let covered = c_hi.min(j_hi) - c_lo.max(j_lo);
        let ratio = (covered / (c_hi - c_lo)).clamp(0.0, 1.0);
        return SalaryScore {
            score: 0.5 + 0.5 * ratio,
            outcome: SalaryOutcome::PartialOverlap,
            overlap_ratio: Some(ratio),
        };
    }

    if c_lo > j_hi {
        let width = j_hi - j_lo;
        let reference = if width > 0.0 { width } else { j_hi };
        let span = ABOVE_BAND_DECAY_FRACTION * reference;
        let score = if span > 0.0 {
            0.5 * (1.0 - (c_lo - j_hi) / span)
        } else {
            0.0
        };
        return SalaryScore::fixed(score.clamp(0.0, 0.5), SalaryOutcome::AboveBand);
    }

    SalaryScore::fixed(BELOW_BAND_SCORE, SalaryOutcome::BelowBand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::models::fixtures::range;
    use crate::matching::models::PayPeriod;

    fn gbp(min: f64, max: f64) -> CompensationRange {
        range(Some(min), Some(max), "GBP")
    }

    #[test]
    fn test_missing_side_scores_one() {
        let band = gbp(50_000.0, 70_000.0);
        assert_eq!(score_salary(None, Some(&band)).score, 1.0);
        assert_eq!(score_salary(Some(&band), None).score, 1.0);
        let empty = range(None, None, "GBP");
        let result = score_salary(Some(&empty), Some(&band));
        assert_eq!(result.outcome, SalaryOutcome::Unknown);
    }

    #[test]
    fn test_currency_mismatch_short_circuits() {
        let target = range(Some(55_000.0), Some(60_000.0), "EUR");
        let result = score_salary(Some(&target), Some(&gbp(50_000.0, 70_000.0)));
        assert_eq!(result.score, 0.3);
        assert_eq!(result.outcome, SalaryOutcome::CurrencyMismatch);
    }

    #[test]
    fn test_within_band() {
        let result = score_salary(
            Some(&gbp(55_000.0, 65_000.0)),
            Some(&gbp(50_000.0, 70_000.0)),
        );
        assert_eq!(result.score, 1.0);
        assert_eq!(result.outcome, SalaryOutcome::WithinBand);
    }

    #[test]
    fn test_partial_overlap_is_proportional() {
        // Candidate 60k-80k, band 50k-70k: half of the candidate range is covered.
        let result = score_salary(
            Some(&gbp(60_000.0, 80_000.0)),
            Some(&gbp(50_000.0, 70_000.0)),
        );
        assert_eq!(result.outcome, SalaryOutcome::PartialOverlap);
        assert!((result.score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_far_above_band_is_lower_than_near_above() {
        let band = gbp(50_000.0, 70_000.0);
        let double = score_salary(Some(&gbp(140_000.0, 150_000.0)), Some(&band));
        let near = score_salary(Some(&gbp(72_000.0, 77_000.0)), Some(&band));

        assert_eq!(double.outcome, SalaryOutcome::AboveBand);
        assert!(double.score >= 0.0 && double.score < 0.5);
        assert!(near.score < 0.5);
        assert!(double.score < near.score);
        // Gap of 2k over a 10k decay span.
        assert!((near.score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_below_band_is_fixed() {
        let band = gbp(50_000.0, 70_000.0);
        let slightly = score_salary(Some(&gbp(40_000.0, 45_000.0)), Some(&band));
        let far = score_salary(Some(&gbp(10_000.0, 12_000.0)), Some(&band));
        assert_eq!(slightly.score, 0.7);
        assert_eq!(far.score, 0.7);
        assert_eq!(far.outcome, SalaryOutcome::BelowBand);
    }

    #[test]
    fn test_open_ended_band_has_no_ceiling() {
        let band = range(Some(50_000.0), None, "GBP");
        let result = score_salary(Some(&gbp(90_000.0, 120_000.0)), Some(&band));
        assert_eq!(result.outcome, SalaryOutcome::WithinBand);
    }

    #[test]
    fn test_periods_are_annualized() {
        let mut target = range(Some(5_000.0), Some(5_500.0), "GBP");
        target.period = PayPeriod::Month;
        let result = score_salary(Some(&target), Some(&gbp(55_000.0, 70_000.0)));
        assert_eq!(result.outcome, SalaryOutcome::WithinBand);
    }

    #[test]
    fn test_point_band_decays_against_ceiling() {
        let band = gbp(60_000.0, 60_000.0);
        let result = score_salary(Some(&gbp(66_000.0, 66_000.0)), Some(&band));
        // Gap 6k over a 30k span.
        assert!((result.score - 0.4).abs() < 1e-12);
    }
}
