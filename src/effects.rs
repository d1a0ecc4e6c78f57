//! Rendering seam to the host engine. Every call is fire-and-forget: a
//! failure is logged by the caller and never undoes the state change.

use log::{debug, info};

use crate::error::SinkError;
use crate::server::indicator::{Indicator, IndicatorKey};
use crate::server::player::PlayerId;
use crate::skills::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectShape {
    Ball,
}

/// A one-shot firework launched from the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Celebration {
    pub color: Color,
    pub shape: EffectShape,
    pub trail: bool,
}

impl Celebration {
    pub fn for_skill(color: Color) -> Self {
        Self {
            color,
            shape: EffectShape::Ball,
            trail: true,
        }
    }
}

pub trait EffectSink: Send {
    /// Creates `indicator` and attaches it to `player`.
    fn create_indicator(
        &self,
        player: &PlayerId,
        key: IndicatorKey,
        indicator: &Indicator,
    ) -> Result<(), SinkError>;

    fn update_indicator(&self, key: IndicatorKey, indicator: &Indicator) -> Result<(), SinkError>;

    /// Detaches the indicator from its player and discards it.
    fn destroy_indicator(&self, key: IndicatorKey) -> Result<(), SinkError>;

    /// Plays the level-up sound at the player's position.
    fn play_level_up_sound(&self, player: &PlayerId) -> Result<(), SinkError>;

    fn launch_celebration(
        &self,
        player: &PlayerId,
        celebration: Celebration,
    ) -> Result<(), SinkError>;
}

/// Writes every effect to the log. Used by the standalone server, which has
/// no clients to render to.
pub struct LogSink;

impl EffectSink for LogSink {
    fn create_indicator(
        &self,
        player: &PlayerId,
        key: IndicatorKey,
        _indicator: &Indicator,
    ) -> Result<(), SinkError> {
        debug!("Created indicator {:?} for {}", key, player);
        Ok(())
    }

    fn update_indicator(&self, key: IndicatorKey, indicator: &Indicator) -> Result<(), SinkError> {
        if indicator.visible {
            info!(
                "[{:?}] {} {:.0}%",
                key,
                indicator.label,
                indicator.percent() * 100.0
            );
        } else {
            debug!("[{:?}] hidden", key);
        }
        Ok(())
    }

    fn destroy_indicator(&self, key: IndicatorKey) -> Result<(), SinkError> {
        debug!("Destroyed indicator {:?}", key);
        Ok(())
    }

    fn play_level_up_sound(&self, player: &PlayerId) -> Result<(), SinkError> {
        info!("*ding* ({})", player);
        Ok(())
    }

    fn launch_celebration(
        &self,
        player: &PlayerId,
        celebration: Celebration,
    ) -> Result<(), SinkError> {
        let Color { r, g, b } = celebration.color;
        info!(
            "Firework for {}: {:?} #{:02x}{:02x}{:02x}",
            player, celebration.shape, r, g, b
        );
        Ok(())
    }
}
