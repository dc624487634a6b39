use super::{
    action::Action,
    engine,
    flight_state::is_legal_transition,
    state::SimulationState,
};
use crate::config::SessionConfig;
use crate::{error, event, info};
use rand::{SeedableRng, rngs::StdRng};
use std::{sync::Arc, time::Duration};
use strum_macros::Display;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Failure to hand an action to the simulation.
#[derive(Debug, Display)]
pub enum DispatchError {
    /// The driver task has already stopped.
    SessionClosed,
}

impl std::error::Error for DispatchError {}

/// Owns a running simulation session.
///
/// One background task holds the [`SimulationState`] and is the only place where
/// [`engine::reduce`] is called: operator actions and periodic ticks are serialized
/// through its loop, and every resulting snapshot is published on a `watch` channel.
/// Dropping the driver cancels the task.
pub struct TickDriver {
    action_tx: mpsc::Sender<Action>,
    state_rx: watch::Receiver<Arc<SimulationState>>,
    handle: JoinHandle<()>,
    cancel_guard: DropGuard,
}

impl TickDriver {
    /// Capacity of the operator action queue.
    const ACTION_QUEUE_CAP: usize = 16;

    /// Spawns the session task on the current tokio runtime.
    ///
    /// # Arguments
    /// * `config` – Tick period and jitter seed of the session.
    pub fn start(config: &SessionConfig) -> Self {
        let (action_tx, action_rx) = mpsc::channel(Self::ACTION_QUEUE_CAP);
        let initial = Arc::new(SimulationState::initial());
        let (state_tx, state_rx) = watch::channel(Arc::clone(&initial));
        let rng = config.seed().map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let c_tok = CancellationToken::new();

        let flight_loop = FlightLoop {
            state: initial,
            rng,
            period: config.tick_interval(),
            action_rx,
            state_tx,
        };
        let handle = tokio::spawn(flight_loop.run(c_tok.clone()));
        info!("Simulation session started, ticking every {} ms.", config.tick_interval().as_millis());
        Self { action_tx, state_rx, handle, cancel_guard: c_tok.drop_guard() }
    }

    /// Queues `action` behind everything dispatched before it.
    pub async fn dispatch(&self, action: Action) -> Result<(), DispatchError> {
        self.action_tx.send(action).await.map_err(|_| DispatchError::SessionClosed)
    }

    /// A receiver that is notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SimulationState>> { self.state_rx.clone() }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<SimulationState> { Arc::clone(&self.state_rx.borrow()) }

    /// Cancels the session task and waits for it to finish.
    pub async fn stop(self) {
        let Self { handle, cancel_guard, .. } = self;
        drop(cancel_guard);
        if let Err(e) = handle.await {
            error!("Simulation task ended abnormally: {e}");
        }
        info!("Simulation session stopped.");
    }
}

/// State owned by the session task.
struct FlightLoop {
    state: Arc<SimulationState>,
    rng: StdRng,
    period: Duration,
    action_rx: mpsc::Receiver<Action>,
    state_tx: watch::Sender<Arc<SimulationState>>,
}

impl FlightLoop {
    async fn run(mut self, c_tok: CancellationToken) {
        let dt = self.period.as_secs_f64();
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                () = c_tok.cancelled() => break,
                Some(action) = self.action_rx.recv() => self.apply(&action),
                _ = ticker.tick() => self.apply(&Action::UpdateTick(dt)),
            }
        }
    }

    fn apply(&mut self, action: &Action) {
        let next = engine::reduce(&self.state, action, &mut self.rng);
        let (from, to) = (self.state.status(), next.status());
        if action.is_tick() {
            event!("Tick t={:.1}s in {to}.", next.flight_time());
        } else {
            info!("Dispatched {action} in {from}.");
        }
        if from != to {
            if is_legal_transition(from, to) {
                info!("Flight status {from} -> {to}.");
            } else {
                error!("Unexpected flight status change {from} -> {to} on {action}.");
            }
        }
        if let Err(violation) = next.check_invariants() {
            error!("Snapshot after {action} violates {violation}.");
        }
        self.state = Arc::new(next);
        self.state_tx.send_replace(Arc::clone(&self.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight_control::FlightStatus;

    fn seeded_config() -> SessionConfig { SessionConfig::default().with_seed(7) }

    #[tokio::test(start_paused = true)]
    async fn actions_apply_before_first_tick() {
        let driver = TickDriver::start(&seeded_config());
        driver.dispatch(Action::Arm).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let snapshot = driver.snapshot();
        assert_eq!(snapshot.status(), FlightStatus::Armed);
        assert!(snapshot.armed());
        assert!(snapshot.flight_time().abs() < 1e-9);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!((driver.snapshot().flight_time() - 0.1).abs() < 1e-9);
        driver.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn launch_counts_down_into_powered_flight() {
        let driver = TickDriver::start(&seeded_config());
        driver.dispatch(Action::Arm).await.unwrap();
        driver.dispatch(Action::Launch).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(driver.snapshot().status(), FlightStatus::Countdown);

        tokio::time::sleep(Duration::from_secs(11)).await;
        let snapshot = driver.snapshot();
        assert_eq!(snapshot.status(), FlightStatus::InFlight);
        assert!(snapshot.telemetry().len() > 1);
        assert!(snapshot.logs().iter().any(|entry| entry.message() == "Liftoff!"));
        driver.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_every_tick() {
        let driver = TickDriver::start(&seeded_config());
        let mut rx = driver.subscribe();
        for expected in 1..=3 {
            rx.changed().await.unwrap();
            let t = rx.borrow_and_update().flight_time();
            assert!((t - 0.1 * f64::from(expected)).abs() < 1e-9);
        }
        driver.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_closes_the_session() {
        let driver = TickDriver::start(&seeded_config());
        let mut rx = driver.subscribe();
        driver.stop().await;
        // the sender is dropped together with the loop
        while rx.changed().await.is_ok() {}
        assert!(rx.has_changed().is_err());
    }
}
