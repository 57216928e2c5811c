use super::protocol::EngineCommand;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_SKILL: u8 = 20;

/// 難易度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Casual,
    #[default]
    Intermediate,
    Advanced,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Casual,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Master,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Casual => "casual",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Master => "master",
        }
    }

    pub fn profile(self) -> StrengthProfile {
        let (skill, depth) = match self {
            Difficulty::Beginner => (1, 1),
            Difficulty::Casual => (4, 3),
            Difficulty::Intermediate => (8, 6),
            Difficulty::Advanced => (13, 10),
            Difficulty::Master => (20, 15),
        };
        StrengthProfile::new(skill, depth)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown difficulty '{}'", s))
    }
}

/// Engine settings for one tier. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthProfile {
    pub skill: u8,
    pub depth: u32,
    /// `UCI_Elo` target; `None` leaves the engine unrestricted.
    pub elo_limit: Option<u32>,
}

impl StrengthProfile {
    pub fn new(skill: u8, depth: u32) -> Self {
        let skill = skill.min(MAX_SKILL);
        StrengthProfile {
            skill,
            depth: depth.max(1),
            elo_limit: elo_for_skill(skill),
        }
    }

    /// Same depth, different skill.
    pub fn with_skill(self, skill: u8) -> Self {
        StrengthProfile::new(skill, self.depth)
    }

    /// `setoption` lines that apply this profile.
    pub fn option_commands(&self) -> Vec<EngineCommand> {
        let mut commands = vec![EngineCommand::set_option("Skill Level", self.skill)];
        if let Some(elo) = self.elo_limit {
            commands.push(EngineCommand::set_option("UCI_LimitStrength", "true"));
            commands.push(EngineCommand::set_option("UCI_Elo", elo));
        } else {
            commands.push(EngineCommand::set_option("UCI_LimitStrength", "false"));
        }
        commands
    }
}

/// ≤5: 800 + skill×100, 6..=10: 1300 + skill×50, above: unlimited.
pub fn elo_for_skill(skill: u8) -> Option<u32> {
    let skill = skill as u32;
    match skill {
        0..=5 => Some(800 + skill * 100),
        6..=10 => Some(1300 + skill * 50),
        _ => None,
    }
}
