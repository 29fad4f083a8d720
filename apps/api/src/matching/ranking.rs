use crate::matching::engine::MatchResult;

/// A scored item, ready to be returned in ranked order.
#[derive(Debug, Clone)]
pub struct Ranked<T> {
    pub item: T,
    pub result: MatchResult,
}

/// Scores every item, drops those under `min_score`, and returns the best `limit`
/// highest first. Ties keep input order.
pub fn rank<T, F>(items: Vec<T>, min_score: f64, limit: usize, score: F) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> MatchResult,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .map(|item| {
            let result = score(&item);
            Ranked { item, result }
        })
        .filter(|r| r.result.overall_score >= min_score)
        .collect();

    ranked.sort_by(|a, b| b.result.overall_score.total_cmp(&a.result.overall_score));
    ranked.truncate(limit);
    ranked
}
