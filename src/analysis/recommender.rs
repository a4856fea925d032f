use super::dataset::MatchQuery;
use super::estimator::WinProbabilityEstimator;
use super::role::Role;

pub const DEFAULT_RECOMMEND_MIN_SAMPLES: usize = 5;
pub const DEFAULT_TOP_K: usize = 10;

/// Probability at or below which a pick counts as an underdog.
const UNDERDOG_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct PickRecommendation {
    pub champion_name: String,
    pub win_probability: f64,
    pub games: usize,
}

pub struct PickRecommender;

impl PickRecommender {
    /// Every candidate for `role`, scored by filling it into `query`, best first.
    /// Ties keep first-appearance order.
    pub fn rank_candidates(
        estimator: &WinProbabilityEstimator,
        query: &MatchQuery,
        role: Role,
        min_samples: usize,
    ) -> Vec<PickRecommendation> {
        let mut rankings: Vec<PickRecommendation> = estimator
            .candidates(role, min_samples)
            .map(|(champion, games)| {
                let hypothetical = query.clone().with(role, champion);
                PickRecommendation {
                    champion_name: champion.to_string(),
                    win_probability: estimator.estimate_win_probability(&hypothetical, min_samples),
                    games,
                }
            })
            .collect();

        rankings.sort_by(|a, b| {
            b.win_probability
                .partial_cmp(&a.win_probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        rankings
    }

    /// Returns the underdog picks (probability <= 0.5) when there are fewer
    /// than `top_k` of them, otherwise the `top_k` best-ranked picks.
    pub fn recommend_for_role(
        estimator: &WinProbabilityEstimator,
        query: &MatchQuery,
        role: Role,
        min_samples: usize,
        top_k: usize,
    ) -> Vec<PickRecommendation> {
        let mut rankings = Self::rank_candidates(estimator, query, role, min_samples);

        let underdogs: Vec<PickRecommendation> = rankings
            .iter()
            .filter(|r| r.win_probability <= UNDERDOG_THRESHOLD)
            .cloned()
            .collect();

        if underdogs.len() < top_k {
            return underdogs;
        }

        rankings.truncate(top_k);
        rankings
    }
}
