use std::collections::HashMap;
use std::time::Duration;

use log::warn;
use slotmap::DenseSlotMap;
use tokio::time::Instant;

use super::indicator::{Indicator, IndicatorKey};
use super::player::PlayerId;

struct Entry {
    player: PlayerId,
    indicator: Indicator,
    last_update: Option<Instant>,
}

/// Result of registering a joining player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connect {
    /// Indicators are turned off; nothing was created.
    Disabled,
    Created(IndicatorKey),
    /// The player was already registered. The old indicator has been dropped
    /// and must be destroyed by the caller.
    Replaced {
        old: IndicatorKey,
        new: IndicatorKey,
    },
}

/// Owns every connected player's indicator and when it was last written.
pub struct IndicatorRegistry {
    enabled: bool,

    indicators: DenseSlotMap<IndicatorKey, Entry>,
    players: HashMap<PlayerId, IndicatorKey>,
}

impl IndicatorRegistry {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            indicators: DenseSlotMap::with_key(),
            players: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn on_player_connect(&mut self, player: PlayerId) -> Connect {
        if !self.enabled {
            return Connect::Disabled;
        }

        let old = self.remove(&player);
        if old.is_some() {
            warn!("Player {} connected twice, replacing their indicator", player);
        }

        let key = self.indicators.insert(Entry {
            player: player.clone(),
            indicator: Indicator::new(),
            last_update: None,
        });
        self.players.insert(player, key);

        match old {
            Some(old) => Connect::Replaced { old, new: key },
            None => Connect::Created(key),
        }
    }

    /// Drops the player's indicator, returning its key if there was one.
    pub fn on_player_disconnect(&mut self, player: &PlayerId) -> Option<IndicatorKey> {
        self.remove(player)
    }

    fn remove(&mut self, player: &PlayerId) -> Option<IndicatorKey> {
        let key = self.players.remove(player)?;
        self.indicators.remove(key);
        Some(key)
    }

    pub fn key(&self, player: &PlayerId) -> Option<IndicatorKey> {
        self.players.get(player).copied()
    }

    pub fn get(&self, player: &PlayerId) -> Option<&Indicator> {
        let key = self.players.get(player)?;
        self.indicators.get(*key).map(|entry| &entry.indicator)
    }

    pub fn get_mut(&mut self, player: &PlayerId) -> Option<(IndicatorKey, &mut Indicator)> {
        let key = *self.players.get(player)?;
        self.indicators
            .get_mut(key)
            .map(|entry| (key, &mut entry.indicator))
    }

    pub fn last_update(&self, player: &PlayerId) -> Option<Instant> {
        let key = self.players.get(player)?;
        self.indicators.get(*key)?.last_update
    }

    pub fn touch(&mut self, player: &PlayerId, now: Instant) {
        if let Some(entry) = self
            .players
            .get(player)
            .and_then(|key| self.indicators.get_mut(*key))
        {
            entry.last_update = Some(now);
        }
    }

    /// Calls `f` for every indicator last written more than `threshold`
    /// before `now`. Indicators that were never written are never stale.
    pub fn for_each_stale<F>(&mut self, threshold: Duration, now: Instant, mut f: F)
    where
        F: FnMut(&PlayerId, IndicatorKey, &mut Indicator),
    {
        for (key, entry) in self.indicators.iter_mut() {
            let stale = match entry.last_update {
                Some(last) => now.saturating_duration_since(last) > threshold,
                None => false,
            };
            if stale {
                f(&entry.player, key, &mut entry.indicator);
            }
        }
    }

    /// Removes every entry, yielding the keys so the indicators can be torn
    /// down.
    pub fn drain(&mut self) -> Vec<(PlayerId, IndicatorKey)> {
        self.players.clear();
        self.indicators
            .drain()
            .map(|(key, entry)| (entry.player, key))
            .collect()
    }
}
