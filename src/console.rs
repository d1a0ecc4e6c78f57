//! Stand-in for a game host: reads commands from stdin, keeps everyone's
//! skill accounts and turns commands into the events a real server would
//! emit.

use std::collections::HashMap;
use std::io::BufRead;

use log::error;
use tokio::sync::mpsc;

use crate::error::CommandError;
use crate::server::event::{Direction, Event, ExperienceChanged, LevelChanged};
use crate::server::player::PlayerId;
use crate::skills::{SkillId, SkillProgress, SkillService};

pub const USAGE: &str = "commands:
  join <player>
  leave <player>
  exp <player> <skill> <amount>
  level <player> <skill> <level>
  stop";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join(PlayerId),
    Leave(PlayerId),
    Exp {
        player: PlayerId,
        skill: SkillId,
        amount: i64,
    },
    Level {
        player: PlayerId,
        skill: SkillId,
        level: u32,
    },
    Help,
    Stop,
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut args = line.split_whitespace();
    let Some(name) = args.next() else {
        return Ok(Command::Help);
    };
    let args: Vec<&str> = args.collect();

    match (name.to_lowercase().as_str(), args.as_slice()) {
        ("join", [player]) => Ok(Command::Join(PlayerId::from(*player))),
        ("join", _) => Err(CommandError::Usage("join <player>")),
        ("leave", [player]) => Ok(Command::Leave(PlayerId::from(*player))),
        ("leave", _) => Err(CommandError::Usage("leave <player>")),
        ("exp", [player, skill, amount]) => Ok(Command::Exp {
            player: PlayerId::from(*player),
            skill: skill.to_lowercase(),
            amount: number(amount)?,
        }),
        ("exp", _) => Err(CommandError::Usage("exp <player> <skill> <amount>")),
        ("level", [player, skill, level]) => Ok(Command::Level {
            player: PlayerId::from(*player),
            skill: skill.to_lowercase(),
            level: number(level)?,
        }),
        ("level", _) => Err(CommandError::Usage("level <player> <skill> <level>")),
        ("help" | "?", _) => Ok(Command::Help),
        ("stop" | "exit" | "quit", _) => Ok(Command::Stop),
        (other, _) => Err(CommandError::Unknown(other.to_string())),
    }
}

fn number<T: std::str::FromStr>(s: &str) -> Result<T, CommandError> {
    s.parse()
        .map_err(|_| CommandError::InvalidNumber(s.to_string()))
}

/// Everyone's skill standings, advanced the way the leveling system would.
pub struct Console<K> {
    skills: K,
    accounts: HashMap<PlayerId, HashMap<SkillId, SkillProgress>>,
}

impl<K: SkillService> Console<K> {
    pub fn new(skills: K) -> Self {
        Self {
            skills,
            accounts: HashMap::new(),
        }
    }

    pub fn progress(&self, player: &PlayerId, skill: &str) -> SkillProgress {
        self.accounts
            .get(player)
            .and_then(|skills| skills.get(skill))
            .copied()
            .unwrap_or_default()
    }

    /// Applies `command` and returns the events it caused, in order.
    pub fn execute(&mut self, command: Command) -> Vec<Event> {
        match command {
            Command::Join(player) => vec![Event::Join(player)],
            Command::Leave(player) => vec![Event::Leave(player)],
            Command::Exp {
                player,
                skill,
                amount,
            } => self.gain(player, skill, amount),
            Command::Level {
                player,
                skill,
                level,
            } => self.set_level(player, skill, level),
            Command::Help | Command::Stop => Vec::new(),
        }
    }

    fn gain(&mut self, player: PlayerId, skill: SkillId, amount: i64) -> Vec<Event> {
        let before = self.progress(&player, &skill);
        let mut events = vec![Event::from(ExperienceChanged {
            player: player.clone(),
            skill: Some(skill.clone()),
            account: Some(before),
            experience: amount,
        })];

        // Unknown skills have no account to advance
        if !self.skills.contains(&skill) {
            return events;
        }

        let mut after = before;
        after.experience = after.experience.saturating_add(amount).max(0);
        loop {
            let threshold = self.skills.level_experience(after.level);
            if threshold <= 0 || after.experience < threshold {
                break;
            }
            after.experience -= threshold;
            after.level += 1;
            events.push(Event::from(LevelChanged {
                player: player.clone(),
                skill: Some(skill.clone()),
                level: after.level,
                remaining_experience: after.experience,
                direction: Direction::Up,
            }));
        }

        self.store(player, skill, after);
        events
    }

    fn set_level(&mut self, player: PlayerId, skill: SkillId, level: u32) -> Vec<Event> {
        let before = self.progress(&player, &skill);
        let direction = match level.cmp(&before.level) {
            std::cmp::Ordering::Greater => Direction::Up,
            std::cmp::Ordering::Less => Direction::Down,
            std::cmp::Ordering::Equal => return Vec::new(),
        };

        if self.skills.contains(&skill) {
            self.store(
                player.clone(),
                skill.clone(),
                SkillProgress {
                    level,
                    experience: 0,
                },
            );
        }

        vec![Event::from(LevelChanged {
            player,
            skill: Some(skill),
            level,
            remaining_experience: 0,
            direction,
        })]
    }

    fn store(&mut self, player: PlayerId, skill: SkillId, progress: SkillProgress) {
        self.accounts
            .entry(player)
            .or_default()
            .insert(skill, progress);
    }
}

/// Reads stdin on its own thread so a pending read never holds up runtime
/// shutdown. The channel closes at end of input.
pub fn spawn_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read console input: {}", e);
                    break;
                }
            }
        }
    });

    rx
}
