use log::{trace, warn};
use tokio::time::Instant;

use crate::config::EffectsConfig;
use crate::effects::{Celebration, EffectSink};
use crate::error::Ignored;
use crate::skills::SkillService;

use super::event::{ExperienceChanged, LevelChanged};
use super::indicator::progress;
use super::player::PlayerId;
use super::registry::IndicatorRegistry;

/// Turns skill events into indicator updates, sounds and celebrations.
pub struct EventReactor<K> {
    config: EffectsConfig,
    skills: K,
}

impl<K: SkillService> EventReactor<K> {
    pub fn new(config: EffectsConfig, skills: K) -> Self {
        Self { config, skills }
    }

    /// Shows the player's progress through their current level, counting
    /// the experience being added.
    pub fn on_experience_changed(
        &self,
        registry: &mut IndicatorRegistry,
        sink: &dyn EffectSink,
        event: &ExperienceChanged,
        now: Instant,
    ) -> Result<(), Ignored> {
        if !self.config.indicator {
            return Err(Ignored::FeatureDisabled);
        }

        let skill_id = event
            .skill
            .as_deref()
            .ok_or(Ignored::MissingContext("skill"))?;
        let account = event.account.ok_or(Ignored::MissingContext("account"))?;
        let skill = self
            .skills
            .skill(skill_id)
            .ok_or_else(|| Ignored::UnknownSkill(skill_id.to_string()))?;

        // Threshold of the level the player is in before the change
        let threshold = self.skills.level_experience(account.level);
        let percent = progress(account.experience.saturating_add(event.experience), threshold);

        show(registry, sink, &event.player, &skill.name, percent, now)
    }

    /// Shows the experience carried into the new level, then plays the
    /// level-up effects. The effects do not depend on the indicator.
    pub fn on_level_changed(
        &self,
        registry: &mut IndicatorRegistry,
        sink: &dyn EffectSink,
        event: &LevelChanged,
        now: Instant,
    ) -> Result<(), Ignored> {
        let skill_id = event
            .skill
            .as_deref()
            .ok_or(Ignored::MissingContext("skill"))?;
        let skill = self
            .skills
            .skill(skill_id)
            .ok_or_else(|| Ignored::UnknownSkill(skill_id.to_string()))?;

        if self.config.indicator {
            let threshold = self.skills.level_experience(event.level);
            let percent = progress(event.remaining_experience, threshold);
            if let Err(reason) = show(registry, sink, &event.player, &skill.name, percent, now) {
                trace!("Level change not shown to {}: {}", event.player, reason);
            }
        }

        if !event.is_level_up() {
            return Ok(());
        }

        if self.config.level_up_sound {
            if let Err(e) = sink.play_level_up_sound(&event.player) {
                warn!("Failed to play level-up sound for {}: {}", event.player, e);
            }
        }

        // A negative interval counts the same as its magnitude
        let interval = self.config.celebration_interval.unsigned_abs();
        if interval != 0 && event.level % interval == 0 {
            let celebration = Celebration::for_skill(skill.color);
            if let Err(e) = sink.launch_celebration(&event.player, celebration) {
                warn!("Failed to launch celebration for {}: {}", event.player, e);
            }
        }

        Ok(())
    }
}

fn show(
    registry: &mut IndicatorRegistry,
    sink: &dyn EffectSink,
    player: &PlayerId,
    label: &str,
    percent: f32,
    now: Instant,
) -> Result<(), Ignored> {
    let (key, indicator) = registry
        .get_mut(player)
        .ok_or_else(|| Ignored::NoIndicator(player.clone()))?;

    indicator.show(label, percent);
    if let Err(e) = sink.update_indicator(key, indicator) {
        warn!("Failed to update indicator for {}: {}", player, e);
    }

    registry.touch(player, now);
    Ok(())
}
