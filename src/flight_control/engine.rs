//! The flight state machine: a pure `(state, action) -> state` reduction.
//!
//! Operator intents that make no sense in the current phase are absorbed as no-ops,
//! nothing in here can fail. The only impurities are the thrust jitter, drawn from
//! the caller's rng, and the wall-clock stamps of log entries.

use super::{
    action::Action,
    flight_state::FlightStatus,
    mission_log::{Alert, LogLevel},
    state::SimulationState,
    telemetry::TelemetrySample,
};
use rand::Rng;

/// Countdown start relative to liftoff, in seconds.
pub const COUNTDOWN_START: f64 = -10.0;
/// Engine burn duration after liftoff, in seconds.
pub const BURN_TIME: f64 = 8.0;
/// Thrust at ignition in newtons, decaying linearly to zero over [`BURN_TIME`].
pub const PEAK_THRUST: f64 = 7000.0;
/// Upper bound (exclusive) of the uniform thrust noise in newtons.
pub const THRUST_JITTER: f64 = 100.0;
/// Fixed vehicle mass in kilograms.
pub const VEHICLE_MASS: f64 = 150.0;
/// Standard gravity in m/s².
pub const GRAVITY: f64 = 9.81;
/// Apogee is called once the vehicle is slower than this (m/s) ...
const APOGEE_MAX_SPEED: f64 = 1.0;
/// ... and higher than this (m).
const APOGEE_MIN_ALTITUDE: f64 = 100.0;

/// Applies `action` to `state` and returns the resulting snapshot.
///
/// # Arguments
/// * `state` – The current snapshot, left untouched.
/// * `action` – Operator intent or clock tick.
/// * `rng` – Source of the thrust jitter during the burn phase.
pub fn reduce<R: Rng>(state: &SimulationState, action: &Action, rng: &mut R) -> SimulationState {
    match action {
        Action::Arm => arm(state),
        Action::Disarm => disarm(state),
        Action::Launch => launch(state),
        Action::Abort => abort(state),
        Action::Reset => SimulationState::initial(),
        Action::SetAlert(alert) => {
            let mut next = state.clone();
            next.set_alert(alert.clone());
            next
        }
        Action::UpdateTick(dt) => tick(state, *dt, rng),
    }
}

fn arm(state: &SimulationState) -> SimulationState {
    if state.status() != FlightStatus::Standby {
        return state.clone();
    }
    let mut next = state.clone();
    next.set_armed(true);
    next.set_status(FlightStatus::Armed);
    next.push_log("System armed. Ready for launch.", LogLevel::Info);
    next
}

fn disarm(state: &SimulationState) -> SimulationState {
    if state.status().is_terminal() {
        return state.clone();
    }
    let mut next = state.clone();
    next.set_armed(false);
    next.set_status(FlightStatus::Standby);
    // scrubbing a countdown stops the clock at zero
    if next.flight_time() < 0.0 {
        next.set_flight_time(0.0);
    }
    next.push_log("System disarmed.", LogLevel::Info);
    next
}

fn launch(state: &SimulationState) -> SimulationState {
    if !state.armed() {
        return state.clone();
    }
    let mut next = state.clone();
    next.set_status(FlightStatus::Countdown);
    next.set_flight_time(COUNTDOWN_START);
    next.push_log("Launch sequence initiated. T-10 seconds.", LogLevel::Warning);
    next
}

fn abort(state: &SimulationState) -> SimulationState {
    let mut next = SimulationState::with_logs_of(state);
    next.set_status(FlightStatus::Aborted);
    next.push_log("LAUNCH ABORTED BY USER.", LogLevel::Error);
    next.set_alert(Some(Alert::error("Launch Aborted!")));
    next
}

#[allow(clippy::cast_possible_truncation)]
fn tick<R: Rng>(state: &SimulationState, dt: f64, rng: &mut R) -> SimulationState {
    let mut next = state.clone();
    next.set_flight_time(state.flight_time() + dt);

    if next.status() == FlightStatus::Countdown {
        if next.flight_time() >= 0.0 {
            next.set_status(FlightStatus::Liftoff);
            next.push_log("Liftoff!", LogLevel::Info);
            next.set_flight_time(0.0);
        } else {
            let remaining = next.flight_time().ceil();
            if state.flight_time().ceil() < remaining {
                next.push_log(format!("T-{}...", remaining.abs() as i64), LogLevel::Info);
            }
            return next;
        }
    }

    if next.flight_time() < 0.0 {
        return next;
    }

    let Some(baseline) = next.latest_sample().copied() else {
        return next;
    };
    let mut sample = baseline.advanced(dt);

    match next.status() {
        FlightStatus::Liftoff | FlightStatus::InFlight => burn(&mut next, &mut sample, &baseline, dt, rng),
        FlightStatus::Apogee | FlightStatus::Descent => coast(&mut next, &mut sample, &baseline, dt),
        _ => {}
    }

    if next.status().accumulates_telemetry() {
        next.push_sample(sample);
    }
    next
}

/// Powered ascent. The kinematics integrate the baseline's acceleration, so a phase
/// change decided here only shows up in the speed of the following tick.
fn burn<R: Rng>(
    next: &mut SimulationState,
    sample: &mut TelemetrySample,
    baseline: &TelemetrySample,
    dt: f64,
    rng: &mut R,
) {
    let flight_time = next.flight_time();
    if flight_time > BURN_TIME {
        next.set_status(FlightStatus::Apogee);
        sample.set_thrust(0.0);
        sample.set_acceleration(-GRAVITY);
    } else {
        next.set_status(FlightStatus::InFlight);
        let thrust = PEAK_THRUST * (1.0 - flight_time / BURN_TIME) + rng.random_range(0.0..THRUST_JITTER);
        sample.set_thrust(thrust);
        sample.set_acceleration(thrust / VEHICLE_MASS - GRAVITY);
    }

    sample.set_speed((baseline.speed() + baseline.acceleration() * dt).max(0.0));
    sample.set_altitude((baseline.altitude() + baseline.speed() * dt).max(0.0));
    sample.drift_from(baseline, flight_time);

    if next.status() == FlightStatus::Apogee
        && sample.speed() < APOGEE_MAX_SPEED
        && sample.altitude() > APOGEE_MIN_ALTITUDE
    {
        next.push_log(format!("Apogee reached at {:.0}m.", sample.altitude()), LogLevel::Info);
        next.set_status(FlightStatus::Descent);
    }
}

/// Unpowered flight under gravity until ground contact.
fn coast(next: &mut SimulationState, sample: &mut TelemetrySample, baseline: &TelemetrySample, dt: f64) {
    sample.set_thrust(0.0);
    sample.set_acceleration(-GRAVITY);
    sample.set_speed(baseline.speed() - GRAVITY * dt);
    sample.set_altitude((baseline.altitude() + baseline.speed() * dt).max(0.0));
    sample.drift_from(baseline, next.flight_time());

    if sample.altitude() <= 0.0 {
        next.set_status(FlightStatus::Landed);
        next.set_armed(false);
        sample.set_altitude(0.0);
        sample.set_speed(0.0);
        sample.set_acceleration(0.0);
        next.push_log("Touchdown. Mission complete.", LogLevel::Info);
        next.set_alert(Some(Alert::warning("Rocket has landed safely.")));
    }
}
