pub mod event;
pub mod indicator;
pub mod player;
pub mod reactor;
pub mod registry;
pub mod sweeper;

use log::{debug, error, trace, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};

use crate::config::EffectsConfig;
use crate::effects::EffectSink;
use crate::error::Ignored;
use crate::skills::SkillService;

use event::Event;
use indicator::IndicatorKey;
use player::PlayerId;
use reactor::EventReactor;
use registry::{Connect, IndicatorRegistry};
use sweeper::Sweeper;

/// Owns all per-player indicator state. Only one task ever touches it, so
/// joins, leaves, skill events and sweeps are applied one at a time.
pub struct Server<K, S> {
    registry: IndicatorRegistry,
    reactor: EventReactor<K>,
    sweeper: Option<Sweeper>,
    sink: S,
}

impl<K: SkillService, S: EffectSink> Server<K, S> {
    pub fn new(config: EffectsConfig, skills: K, sink: S) -> Self {
        Self {
            registry: IndicatorRegistry::new(config.indicator),
            sweeper: Sweeper::for_config(&config),
            reactor: EventReactor::new(config, skills),
            sink,
        }
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn sweeper(&self) -> Option<Sweeper> {
        self.sweeper
    }

    pub fn handle(&mut self, event: Event, now: Instant) {
        match event {
            Event::Join(player) => match self.registry.on_player_connect(player.clone()) {
                Connect::Disabled => {}
                Connect::Created(key) => self.attach(&player, key),
                Connect::Replaced { old, new } => {
                    self.detach(old);
                    self.attach(&player, new);
                }
            },
            Event::Leave(player) => {
                if let Some(key) = self.registry.on_player_disconnect(&player) {
                    self.detach(key);
                }
            }
            Event::Experience(event) => {
                if let Err(reason) =
                    self.reactor
                        .on_experience_changed(&mut self.registry, &self.sink, &event, now)
                {
                    log_ignored(&event.player, reason);
                }
            }
            Event::Level(event) => {
                if let Err(reason) =
                    self.reactor
                        .on_level_changed(&mut self.registry, &self.sink, &event, now)
                {
                    log_ignored(&event.player, reason);
                }
            }
        }
    }

    pub fn sweep(&mut self, now: Instant) -> usize {
        match &self.sweeper {
            Some(sweeper) => sweeper.sweep(&mut self.registry, &self.sink, now),
            None => 0,
        }
    }

    /// Destroys every indicator.
    pub fn shutdown(&mut self) {
        for (player, key) in self.registry.drain() {
            trace!("Releasing indicator of {}", player);
            self.detach(key);
        }
    }

    fn attach(&self, player: &PlayerId, key: IndicatorKey) {
        let Some(indicator) = self.registry.get(player) else {
            return;
        };
        if let Err(e) = self.sink.create_indicator(player, key, indicator) {
            warn!("Failed to create indicator for {}: {}", player, e);
        }
    }

    fn detach(&self, key: IndicatorKey) {
        if let Err(e) = self.sink.destroy_indicator(key) {
            warn!("Failed to destroy indicator {:?}: {}", key, e);
        }
    }

    async fn run(mut self, mut inbound: mpsc::Receiver<Event>, mut stop: mpsc::Receiver<()>) {
        let mut timer = self.sweeper.map(|sweeper| sweeper.timer());

        loop {
            tokio::select! {
                _ = stop.recv() => {
                    break;
                }
                event = inbound.recv() => {
                    match event {
                        Some(event) => self.handle(event, Instant::now()),
                        // Every sender is gone, nobody can reach us anymore
                        None => break,
                    }
                }
                now = next_tick(&mut timer), if timer.is_some() => {
                    self.sweep(now);
                }
            }
        }

        self.shutdown();
    }
}

async fn next_tick(timer: &mut Option<Interval>) -> Instant {
    match timer {
        Some(timer) => timer.tick().await,
        None => std::future::pending().await,
    }
}

fn log_ignored(player: &PlayerId, reason: Ignored) {
    match reason {
        Ignored::FeatureDisabled | Ignored::NoIndicator(_) => {
            trace!("Event for {} ignored: {}", player, reason)
        }
        Ignored::MissingContext(_) | Ignored::UnknownSkill(_) => {
            debug!("Event for {} ignored: {}", player, reason)
        }
    }
}

/// Running [`Server`] task. Events go in through [`ServerHandle::events`].
pub struct ServerHandle {
    events: mpsc::Sender<Event>,
    stop: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn start<K, S>(server: Server<K, S>) -> Self
    where
        K: SkillService + 'static,
        S: EffectSink + 'static,
    {
        let (etx, erx) = mpsc::channel(256);
        let (stx, srx) = mpsc::channel(1);

        let task = tokio::task::spawn(server.run(erx, srx));

        Self {
            events: etx,
            stop: Some(stx),
            task: Some(task),
        }
    }

    pub fn events(&self) -> mpsc::Sender<Event> {
        self.events.clone()
    }

    /// Queues `event`. Returns false once the server has stopped.
    pub async fn send(&self, event: impl Into<Event>) -> bool {
        self.events.send(event.into()).await.is_ok()
    }

    /// Stops the sweeper and releases every indicator.
    pub async fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // Fails only if the loop already ended on its own
            let _ = stop.send(()).await;
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!("Level effects task failed: {}", e);
            }
        }
    }
}
