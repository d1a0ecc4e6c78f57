use crate::skills::{SkillId, SkillProgress};

use super::player::PlayerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A player gained or lost experience in a skill.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperienceChanged {
    pub player: PlayerId,
    pub skill: Option<SkillId>,
    /// The player's standing in `skill` before `experience` is applied.
    pub account: Option<SkillProgress>,
    pub experience: i64,
}

/// A player's level in a skill changed.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelChanged {
    pub player: PlayerId,
    pub skill: Option<SkillId>,
    pub level: u32,
    /// Experience carried into `level`.
    pub remaining_experience: i64,
    pub direction: Direction,
}

impl LevelChanged {
    pub fn is_level_up(&self) -> bool {
        self.direction == Direction::Up
    }
}

/// Everything the host tells the effects server about.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Join(PlayerId),
    Leave(PlayerId),
    Experience(ExperienceChanged),
    Level(LevelChanged),
}

impl From<ExperienceChanged> for Event {
    fn from(event: ExperienceChanged) -> Self {
        Self::Experience(event)
    }
}

impl From<LevelChanged> for Event {
    fn from(event: LevelChanged) -> Self {
        Self::Level(event)
    }
}
