use super::role::{Role, LANES_PER_TEAM, ROLE_COUNT};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// One collected match: slots 0..5 hold the winning team's champions in lane
/// order, slots 5..10 the losing team's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub id: String,
    pub game_time: i64,
    pub game_duration: i64,
    pub champions: [String; ROLE_COUNT],
}

impl RawMatch {
    pub fn winners(&self) -> &[String] {
        &self.champions[..LANES_PER_TEAM]
    }

    pub fn losers(&self) -> &[String] {
        &self.champions[LANES_PER_TEAM..]
    }
}

/// A fully assigned match seen from team 1.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    picks: [String; ROLE_COUNT],
    pub win: bool,
}

impl MatchRecord {
    pub fn pick(&self, role: Role) -> &str {
        &self.picks[role.index()]
    }

    pub fn picks(&self) -> impl Iterator<Item = (Role, &str)> {
        Role::ALL.iter().map(move |role| (*role, self.pick(*role)))
    }
}

/// Historical matches, each raw match stored once per team perspective.
#[derive(Debug, Clone, Default)]
pub struct MatchDataset {
    records: Vec<MatchRecord>,
}

impl MatchDataset {
    /// Emits the raw order as a win row, then the team-swapped order as a
    /// loss row, for every match.
    pub fn from_raw(matches: &[RawMatch]) -> Self {
        let mut records = Vec::with_capacity(matches.len() * 2);

        for raw in matches {
            records.push(MatchRecord {
                picks: raw.champions.clone(),
                win: true,
            });
            records.push(MatchRecord {
                picks: std::array::from_fn(|idx| raw.champions[Role::ALL[idx].mirror().index()].clone()),
                win: false,
            });
        }

        MatchDataset { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn wins(&self) -> usize {
        self.records.iter().filter(|r| r.win).count()
    }

    pub fn losses(&self) -> usize {
        self.records.len() - self.wins()
    }
}

/// A hypothetical match with some roles left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    picks: [Option<String>; ROLE_COUNT],
}

impl MatchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `(role, champion)` string pairs. Unknown role names are rejected
    /// before any estimation runs.
    pub fn from_pairs<I, R, C>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (R, C)>,
        R: AsRef<str>,
        C: AsRef<str>,
    {
        let mut query = MatchQuery::new();
        for (role, champion) in pairs {
            let role: Role = role.as_ref().parse()?;
            query.set(role, champion.as_ref());
        }
        Ok(query)
    }

    /// Assigns `champion` to `role`; an empty name blanks the role.
    pub fn set(&mut self, role: Role, champion: &str) {
        let champion = champion.trim();
        self.picks[role.index()] = if champion.is_empty() {
            None
        } else {
            Some(champion.to_string())
        };
    }

    pub fn with(mut self, role: Role, champion: &str) -> Self {
        self.set(role, champion);
        self
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        self.picks[role.index()].as_deref()
    }

    /// Filled roles in slot order.
    pub fn filled(&self) -> impl Iterator<Item = (Role, &str)> {
        Role::ALL
            .iter()
            .filter_map(move |role| self.get(*role).map(|champion| (*role, champion)))
    }
}
