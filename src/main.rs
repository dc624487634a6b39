#![allow(clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod export;
mod flight_control;
mod logger;

use crate::config::SessionConfig;
use crate::export::{ExportError, export_telemetry};
use crate::flight_control::{
    Action, Alert, DispatchError, FlightStatus, LogEntry, LogLevel, SimulationState, TickDriver,
    mission_clock::format_flight_time, mission_log::entries_since,
};
use chrono::Utc;
use std::sync::Arc;
use tokio::time::{Instant, sleep, sleep_until};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let config = SessionConfig::from_env();
    info!("KLU R1 launch control, exporting to {}.", config.export_dir().display());
    let driver = TickDriver::start(&config);

    if let Err(e) = fly_mission(&driver, &config).await {
        error!("Mission console lost the session: {e}");
    }

    let last = driver.snapshot();
    print_summary(&last);
    if last.can_export() {
        match export_telemetry(config.export_dir(), last.telemetry(), Utc::now()) {
            Ok(path) => info!("Flight data written to {}.", path.display()),
            Err(e @ ExportError::NotEnoughSamples(_)) => warn!("Skipped export: {e}."),
            Err(e) => error!("Failed to write flight data: {e}"),
        }
    } else {
        warn!("No flight data to export.");
    }
    driver.stop().await;
}

/// Arms, launches and follows the flight until it is over or the timeout hits,
/// mirroring the mission log to the terminal.
async fn fly_mission(driver: &TickDriver, config: &SessionConfig) -> Result<(), DispatchError> {
    let mut state_rx = driver.subscribe();
    let mut console = ConsoleMirror::default();

    if driver.snapshot().can_toggle_arm() {
        driver.dispatch(Action::Arm).await?;
    }
    let ready = state_rx.wait_for(|s| s.can_launch()).await.is_ok();
    if !ready {
        return Err(DispatchError::SessionClosed);
    }
    driver.dispatch(Action::Launch).await?;

    let deadline = sleep(config.mission_timeout());
    tokio::pin!(deadline);
    let mut abort_at = config.abort_after().and_then(|after| {
        let at = Instant::now().checked_add(after);
        if at.is_none() {
            warn!("Scripted abort after {} s is out of reach, ignoring it.", after.as_secs());
        }
        at
    });

    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    return Err(DispatchError::SessionClosed);
                }
                let snapshot = Arc::clone(&state_rx.borrow_and_update());
                console.mirror(&snapshot);
                if snapshot.is_mission_over() {
                    return Ok(());
                }
            }
            () = sleep_until(abort_at.unwrap_or_else(Instant::now)), if abort_at.is_some() => {
                abort_at = None;
                warn!("Scripted abort triggered.");
                driver.dispatch(Action::Abort).await?;
            }
            () = &mut deadline => {
                warn!("No touchdown within {} s, leaving the flight.", config.mission_timeout().as_secs());
                return Ok(());
            }
        }
    }
}

/// Remembers what has already been printed so every snapshot only adds its news.
#[derive(Default)]
struct ConsoleMirror {
    last_entry: Option<LogEntry>,
    last_status: Option<FlightStatus>,
    last_alert: Option<Alert>,
}

impl ConsoleMirror {
    fn mirror(&mut self, snapshot: &SimulationState) {
        for entry in entries_since(snapshot.logs(), self.last_entry.as_ref()) {
            match entry.level() {
                LogLevel::Info => info!("[{}] {}", entry.time_label(), entry.message()),
                LogLevel::Warning => warn!("[{}] {}", entry.time_label(), entry.message()),
                LogLevel::Error => error!("[{}] {}", entry.time_label(), entry.message()),
            }
        }
        self.last_entry = snapshot.logs().first().cloned();

        if self.last_status != Some(snapshot.status()) {
            self.last_status = Some(snapshot.status());
            log!("T {} | {}", format_flight_time(snapshot.flight_time()), snapshot.status());
        }

        if self.last_alert.as_ref() != snapshot.alert() {
            self.last_alert = snapshot.alert().cloned();
            if let Some(alert) = &self.last_alert {
                warn!("ALERT [{}] {}", alert.level(), alert.message());
            }
        }

        if let Some(sample) = snapshot.latest_sample() {
            event!(
                "t {:.1} s | alt {:.0} m | v {:.0} m/s | a {:.1} m/s² | F {:.0} N | pos {:.5}, {:.5}",
                sample.time(),
                sample.altitude(),
                sample.speed(),
                sample.acceleration(),
                sample.thrust(),
                sample.latitude(),
                sample.longitude()
            );
        }
    }
}

fn print_summary(state: &SimulationState) {
    let peak = state.telemetry().iter().map(|s| s.altitude()).fold(0.0, f64::max);
    let top_speed = state.telemetry().iter().map(|s| s.speed()).fold(0.0, f64::max);
    log!(
        "Mission ended {} at T {}: peak altitude {peak:.0} m, top speed {top_speed:.0} m/s over the last {} samples.",
        state.status(),
        format_flight_time(state.flight_time()),
        state.telemetry().len()
    );
}
