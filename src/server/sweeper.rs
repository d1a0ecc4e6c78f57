use std::time::Duration;

use log::{trace, warn};
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::config::EffectsConfig;
use crate::effects::EffectSink;

use super::registry::IndicatorRegistry;

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5);
pub const STALE_AFTER: Duration = Duration::from_secs(10);

/// Hides indicators nobody has updated for a while.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweeper {
    interval: Duration,
    threshold: Duration,
}

impl Sweeper {
    pub fn new(interval: Duration, threshold: Duration) -> Self {
        Self {
            interval,
            threshold,
        }
    }

    /// The sweeper to run for `config`, or none when indicators are off.
    pub fn for_config(config: &EffectsConfig) -> Option<Self> {
        config
            .indicator
            .then(|| Self::new(SWEEP_INTERVAL, STALE_AFTER))
    }

    pub(crate) fn timer(&self) -> Interval {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    /// Hides every stale, visible indicator. Returns how many were hidden.
    /// Entries stay registered so a later update shows them again.
    pub fn sweep(
        &self,
        registry: &mut IndicatorRegistry,
        sink: &dyn EffectSink,
        now: Instant,
    ) -> usize {
        let mut hidden = 0;
        registry.for_each_stale(self.threshold, now, |player, key, indicator| {
            if !indicator.visible {
                return;
            }
            indicator.visible = false;
            hidden += 1;

            // One bad indicator must not stop the rest of the sweep
            if let Err(e) = sink.update_indicator(key, indicator) {
                warn!("Failed to hide indicator for {}: {}", player, e);
            }
        });

        if hidden > 0 {
            trace!("Sweep hid {} indicator(s)", hidden);
        }
        hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::player::PlayerId;
    use crate::testing::{RecordingSink, Rendered};

    fn shown(registry: &mut IndicatorRegistry, name: &str, at: Instant) -> PlayerId {
        let player = PlayerId::from(name);
        registry.on_player_connect(player.clone());
        registry.get_mut(&player).unwrap().1.show("Mining", 0.5);
        registry.touch(&player, at);
        player
    }

    #[test]
    fn no_sweeper_when_indicators_are_disabled() {
        let mut config = EffectsConfig::default();
        assert!(Sweeper::for_config(&config).is_some());

        config.indicator = false;
        assert!(Sweeper::for_config(&config).is_none());
    }

    #[test]
    fn default_timings() {
        assert_eq!(
            Sweeper::for_config(&EffectsConfig::default()),
            Some(Sweeper::new(Duration::from_secs(5), Duration::from_secs(10)))
        );
    }

    #[test]
    fn sweep_hides_exactly_the_stale_indicators() {
        let sweeper = Sweeper::new(SWEEP_INTERVAL, STALE_AFTER);
        let mut registry = IndicatorRegistry::new(true);
        let sink = RecordingSink::default();

        let start = Instant::now();
        let old = shown(&mut registry, "old", start);
        let fresh = shown(&mut registry, "fresh", start + Duration::from_secs(5));

        let hidden = sweeper.sweep(&mut registry, &sink, start + Duration::from_secs(12));
        assert_eq!(hidden, 1);
        assert!(!registry.get(&old).unwrap().visible);
        assert!(registry.get(&fresh).unwrap().visible);

        // Hidden, not removed
        assert_eq!(registry.len(), 2);
        let old_key = registry.key(&old).unwrap();
        assert!(matches!(
            sink.take().as_slice(),
            [Rendered::Updated(key, indicator)] if *key == old_key && !indicator.visible
        ));

        // Already hidden indicators are left alone on the next pass
        let hidden = sweeper.sweep(&mut registry, &sink, start + Duration::from_secs(13));
        assert_eq!(hidden, 0);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn update_after_sweep_shows_again() {
        let sweeper = Sweeper::new(SWEEP_INTERVAL, STALE_AFTER);
        let mut registry = IndicatorRegistry::new(true);
        let sink = RecordingSink::default();

        let start = Instant::now();
        let player = shown(&mut registry, "steve", start);
        sweeper.sweep(&mut registry, &sink, start + Duration::from_secs(11));
        assert!(!registry.get(&player).unwrap().visible);

        let later = start + Duration::from_secs(20);
        registry.get_mut(&player).unwrap().1.show("Fishing", 0.25);
        registry.touch(&player, later);
        assert_eq!(sweeper.sweep(&mut registry, &sink, later + Duration::from_secs(1)), 0);
        assert!(registry.get(&player).unwrap().visible);
    }

    #[test]
    fn failing_indicator_does_not_abort_the_sweep() {
        let sweeper = Sweeper::new(SWEEP_INTERVAL, STALE_AFTER);
        let mut registry = IndicatorRegistry::new(true);
        let sink = RecordingSink::default();

        let start = Instant::now();
        let players: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|name| shown(&mut registry, name, start))
            .collect();
        sink.break_indicator(registry.key(&players[1]).unwrap());

        let hidden = sweeper.sweep(&mut registry, &sink, start + Duration::from_secs(30));
        assert_eq!(hidden, 3);
        for player in &players {
            assert!(!registry.get(player).unwrap().visible);
        }
    }

    #[test]
    fn untouched_indicators_are_never_stale() {
        let sweeper = Sweeper::new(SWEEP_INTERVAL, STALE_AFTER);
        let mut registry = IndicatorRegistry::new(true);
        let sink = RecordingSink::default();

        registry.on_player_connect(PlayerId::from("idle"));
        let far_future = Instant::now() + Duration::from_secs(3600);
        assert_eq!(sweeper.sweep(&mut registry, &sink, far_future), 0);
    }
}
