use std::sync::{Arc, Mutex};

use crate::effects::{Celebration, EffectSink};
use crate::error::SinkError;
use crate::server::indicator::{Indicator, IndicatorKey};
use crate::server::player::PlayerId;
use crate::skills::{Color, SkillCatalog};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Rendered {
    Created(PlayerId, IndicatorKey),
    Updated(IndicatorKey, Indicator),
    Destroyed(IndicatorKey),
    Sound(PlayerId),
    Celebration(PlayerId, Celebration),
}

/// Remembers every call. Clones share the same log.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    log: Arc<Mutex<Vec<Rendered>>>,
    broken: Arc<Mutex<Vec<IndicatorKey>>>,
    offline: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub(crate) fn take(&self) -> Vec<Rendered> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }

    /// Makes every update of `key` fail. Failed calls are still recorded.
    pub(crate) fn break_indicator(&self, key: IndicatorKey) {
        self.broken.lock().unwrap().push(key);
    }

    /// Makes every sound fail as if the player had left. Failed calls are
    /// still recorded.
    pub(crate) fn go_offline(&self) {
        *self.offline.lock().unwrap() = true;
    }

    fn record(&self, rendered: Rendered) {
        self.log.lock().unwrap().push(rendered);
    }
}

impl EffectSink for RecordingSink {
    fn create_indicator(
        &self,
        player: &PlayerId,
        key: IndicatorKey,
        _indicator: &Indicator,
    ) -> Result<(), SinkError> {
        self.record(Rendered::Created(player.clone(), key));
        Ok(())
    }

    fn update_indicator(&self, key: IndicatorKey, indicator: &Indicator) -> Result<(), SinkError> {
        self.record(Rendered::Updated(key, indicator.clone()));
        if self.broken.lock().unwrap().contains(&key) {
            return Err(SinkError::Detached(key));
        }
        Ok(())
    }

    fn destroy_indicator(&self, key: IndicatorKey) -> Result<(), SinkError> {
        self.record(Rendered::Destroyed(key));
        Ok(())
    }

    fn play_level_up_sound(&self, player: &PlayerId) -> Result<(), SinkError> {
        self.record(Rendered::Sound(player.clone()));
        if *self.offline.lock().unwrap() {
            return Err(SinkError::PlayerOffline(player.clone()));
        }
        Ok(())
    }

    fn launch_celebration(
        &self,
        player: &PlayerId,
        celebration: Celebration,
    ) -> Result<(), SinkError> {
        self.record(Rendered::Celebration(player.clone(), celebration));
        Ok(())
    }
}

pub(crate) const MINING_COLOR: Color = Color::rgb(0x55, 0x55, 0x55);

/// Level 4 needs 100 experience, level 5 needs 120, level 10 needs 220.
pub(crate) fn catalog() -> SkillCatalog {
    SkillCatalog::new(20, 20).with_skill("mining", "Mining", MINING_COLOR)
}
