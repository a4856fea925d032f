use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

pub const ROLE_COUNT: usize = 10;
pub const LANES_PER_TEAM: usize = 5;

/// One of the five positions on a team, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    Top,
    Jungle,
    Middle,
    Bottom,
    Support,
}

impl Lane {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Maps the match-v5 `teamPosition` value. Empty or unknown positions
    /// (remakes, early surrenders) yield `None`.
    pub fn from_team_position(position: &str) -> Option<Lane> {
        match position {
            "TOP" => Some(Lane::Top),
            "JUNGLE" => Some(Lane::Jungle),
            "MIDDLE" => Some(Lane::Middle),
            "BOTTOM" => Some(Lane::Bottom),
            "UTILITY" => Some(Lane::Support),
            _ => None,
        }
    }

    fn short_name(self) -> &'static str {
        match self {
            Lane::Top => "top",
            Lane::Jungle => "jg",
            Lane::Middle => "mid",
            Lane::Bottom => "adc",
            Lane::Support => "sp",
        }
    }
}

/// A lane on a specific team. Team 1 is the perspective team whose win flag
/// a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role {
    team: u8,
    lane: Lane,
}

impl Role {
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::ally(Lane::Top),
        Role::ally(Lane::Jungle),
        Role::ally(Lane::Middle),
        Role::ally(Lane::Bottom),
        Role::ally(Lane::Support),
        Role::enemy(Lane::Top),
        Role::enemy(Lane::Jungle),
        Role::enemy(Lane::Middle),
        Role::enemy(Lane::Bottom),
        Role::enemy(Lane::Support),
    ];

    pub const fn ally(lane: Lane) -> Self {
        Role { team: 1, lane }
    }

    pub const fn enemy(lane: Lane) -> Self {
        Role { team: 2, lane }
    }

    /// Column position in a record: ally lanes 0..5, enemy lanes 5..10.
    pub fn index(self) -> usize {
        (self.team as usize - 1) * LANES_PER_TEAM + self.lane.index()
    }

    /// The same lane on the other team.
    pub fn mirror(self) -> Self {
        Role {
            team: 3 - self.team,
            lane: self.lane,
        }
    }

    pub fn name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.lane.short_name(), self.team)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.name() == wanted)
            .ok_or_else(|| AppError::UnknownRole(s.to_string()))
    }
}
