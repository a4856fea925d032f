use super::dataset::MatchDataset;
use super::role::{Role, ROLE_COUNT};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PickCounts {
    pub wins: usize,
    pub losses: usize,
}

impl PickCounts {
    pub fn games(&self) -> usize {
        self.wins + self.losses
    }

    pub fn for_flag(&self, win: bool) -> usize {
        if win {
            self.wins
        } else {
            self.losses
        }
    }
}

/// Counts for every champion seen in one role, remembering first-appearance
/// order so candidate listings are stable.
#[derive(Debug, Clone, Default)]
struct RoleColumn {
    order: Vec<String>,
    counts: HashMap<String, PickCounts>,
}

/// Per-(role, champion, win flag) counts built in a single pass over a dataset.
#[derive(Debug, Clone)]
pub struct ChampionStatsTracker {
    columns: [RoleColumn; ROLE_COUNT],
    total_wins: usize,
    total_losses: usize,
}

impl ChampionStatsTracker {
    pub fn new() -> Self {
        ChampionStatsTracker {
            columns: std::array::from_fn(|_| RoleColumn::default()),
            total_wins: 0,
            total_losses: 0,
        }
    }

    pub fn from_dataset(dataset: &MatchDataset) -> Self {
        let mut tracker = Self::new();
        for record in dataset.records() {
            for (role, champion) in record.picks() {
                tracker.add_pick(role, champion, record.win);
            }
            if record.win {
                tracker.total_wins += 1;
            } else {
                tracker.total_losses += 1;
            }
        }
        tracker
    }

    fn add_pick(&mut self, role: Role, champion: &str, won: bool) {
        let column = &mut self.columns[role.index()];
        if !column.counts.contains_key(champion) {
            column.order.push(champion.to_string());
        }
        let entry = column.counts.entry(champion.to_string()).or_default();

        if won {
            entry.wins += 1;
        } else {
            entry.losses += 1;
        }
    }

    pub fn get_champion(&self, role: Role, champion: &str) -> PickCounts {
        self.columns[role.index()]
            .counts
            .get(champion)
            .copied()
            .unwrap_or_default()
    }

    /// Champions seen in `role`, in order of first appearance.
    pub fn champions(&self, role: Role) -> impl Iterator<Item = (&str, PickCounts)> {
        let column = &self.columns[role.index()];
        column.order.iter().map(move |name| {
            (
                name.as_str(),
                column.counts.get(name).copied().unwrap_or_default(),
            )
        })
    }

    pub fn rows_with_flag(&self, win: bool) -> usize {
        if win {
            self.total_wins
        } else {
            self.total_losses
        }
    }
}

impl Default for ChampionStatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
