use super::champion_stats::ChampionStatsTracker;
use super::dataset::{MatchDataset, MatchQuery};
use super::role::Role;
use crate::error::AppError;
use tracing::debug;

pub const DEFAULT_MIN_SAMPLES: usize = 3;

/// One filled role that passed the sample-size gate.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub role: Role,
    pub champion: String,
    pub games: usize,
    pub p_given_win: f64,
    pub p_given_loss: f64,
}

/// Naive-Bayes style win estimate over an immutable match history.
///
/// Roles are treated as independent: each filled role multiplies the win and
/// loss scores by the champion's empirical frequency in that role among won
/// and lost rows respectively.
#[derive(Debug, Clone)]
pub struct WinProbabilityEstimator {
    stats: ChampionStatsTracker,
}

impl WinProbabilityEstimator {
    pub fn new(dataset: &MatchDataset) -> Result<Self, AppError> {
        let stats = ChampionStatsTracker::from_dataset(dataset);

        if stats.rows_with_flag(true) == 0 || stats.rows_with_flag(false) == 0 {
            return Err(AppError::DataUnavailable(format!(
                "need both won and lost rows (have {} won, {} lost)",
                stats.rows_with_flag(true),
                stats.rows_with_flag(false)
            )));
        }

        debug!(
            rows = dataset.len(),
            wins = stats.rows_with_flag(true),
            "Aggregated match history"
        );

        Ok(WinProbabilityEstimator { stats })
    }

    pub fn stats(&self) -> &ChampionStatsTracker {
        &self.stats
    }

    /// count(role = champion, win = flag) / count(win = flag)
    pub fn conditional_probability(&self, role: Role, champion: &str, win: bool) -> f64 {
        let matching = self.stats.get_champion(role, champion).for_flag(win);
        matching as f64 / self.stats.rows_with_flag(win) as f64
    }

    pub fn occurrence_count(&self, role: Role, champion: &str) -> usize {
        self.stats.get_champion(role, champion).games()
    }

    /// Filled roles whose champion has been seen at least `min_samples` times.
    pub fn evidence(&self, query: &MatchQuery, min_samples: usize) -> Vec<Evidence> {
        query
            .filled()
            .filter_map(|(role, champion)| {
                let games = self.occurrence_count(role, champion);
                if games < min_samples {
                    return None;
                }
                Some(Evidence {
                    role,
                    champion: champion.to_string(),
                    games,
                    p_given_win: self.conditional_probability(role, champion, true),
                    p_given_loss: self.conditional_probability(role, champion, false),
                })
            })
            .collect()
    }

    /// Starts from an even prior and folds in every gated role. When both
    /// products collapse to zero the result is 0, not 0.5.
    pub fn estimate_win_probability(&self, query: &MatchQuery, min_samples: usize) -> f64 {
        let (win, lose) = self
            .evidence(query, min_samples)
            .iter()
            .fold((0.5, 0.5), |(win, lose), e| {
                (win * e.p_given_win, lose * e.p_given_loss)
            });

        if win + lose == 0.0 {
            return 0.0;
        }
        win / (win + lose)
    }

    /// Champions seen in `role` at least `min_samples` times, first-seen first.
    pub fn candidates(&self, role: Role, min_samples: usize) -> impl Iterator<Item = (&str, usize)> {
        self.stats
            .champions(role)
            .map(|(name, counts)| (name, counts.games()))
            .filter(move |(_, games)| *games >= min_samples)
    }
}
