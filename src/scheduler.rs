use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    action::Action,
    constants::game::{SPAWN_PERIOD, TICK_PERIOD},
};

/// Posts an action into the app channel once per period until stopped.
#[derive(Debug)]
pub struct PeriodicTask {
    name: &'static str,
    period: Duration,
    cancellation_token: Option<CancellationToken>,
}

impl PeriodicTask {
    pub fn new(name: &'static str, period: Duration) -> Self {
        assert!(!period.is_zero(), "{name} period must be positive");
        Self { name, period, cancellation_token: None }
    }

    /// The first firing happens one full period after the start.
    pub fn start<F>(&mut self, tx: UnboundedSender<Action>, make_action: F)
    where
        F: Fn() -> Action + Send + 'static,
    {
        self.stop();
        let token = CancellationToken::new();
        let child = token.clone();
        let period = self.period;
        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(make_action()).is_err() {
                            break;
                        }
                    },
                }
            }
        });
        self.cancellation_token = Some(token);
        debug!("Started {} driver every {:?}", self.name, self.period);
    }

    pub fn stop(&mut self) {
        if let Some(token) = self.cancellation_token.take() {
            token.cancel();
            debug!("Stopped {} driver", self.name);
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancellation_token.is_some()
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Owns the simulation and spawn drivers. Every start begins a new epoch;
/// actions carrying an older epoch, or arriving while stopped, are stale.
#[derive(Debug)]
pub struct Scheduler {
    tx: UnboundedSender<Action>,
    tick: PeriodicTask,
    spawn: PeriodicTask,
    epoch: u64,
}

impl Scheduler {
    pub fn new(tx: UnboundedSender<Action>) -> Self {
        Self::with_periods(tx, TICK_PERIOD, SPAWN_PERIOD)
    }

    pub fn with_periods(tx: UnboundedSender<Action>, tick_period: Duration, spawn_period: Duration) -> Self {
        Self {
            tx,
            tick: PeriodicTask::new("tick", tick_period),
            spawn: PeriodicTask::new("spawn", spawn_period),
            epoch: 0,
        }
    }

    pub fn start(&mut self) {
        self.stop();
        self.epoch += 1;
        let epoch = self.epoch;
        self.tick.start(self.tx.clone(), move || Action::Tick(epoch));
        self.spawn.start(self.tx.clone(), move || Action::SpawnPipes(epoch));
    }

    pub fn stop(&mut self) {
        self.tick.stop();
        self.spawn.stop();
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_running() && self.spawn.is_running()
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.is_running() && epoch == self.epoch
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}
