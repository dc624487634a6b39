use super::{
    flight_state::FlightStatus,
    mission_log::{self, Alert, LogEntry, LogLevel},
    telemetry::TelemetrySample,
};
use strum_macros::Display;

/// Broken structural guarantee of a [`SimulationState`].
#[derive(Debug, Display, PartialEq)]
pub enum InvariantViolation {
    ArmedOutsideFlight(FlightStatus),
    EmptyTelemetry,
    TelemetryOverflow(usize),
    LogOverflow(usize),
    NegativeClockOutsideCountdown(FlightStatus),
}

impl std::error::Error for InvariantViolation {}

/// Complete snapshot of a simulated mission.
///
/// Only the engine builds new snapshots; everything else reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    status: FlightStatus,
    armed: bool,
    /// Seconds relative to liftoff, negative while counting down.
    flight_time: f64,
    /// Oldest first, at most [`SimulationState::TELEMETRY_CAPACITY`] samples.
    telemetry: Vec<TelemetrySample>,
    /// Newest first, at most [`LogEntry::CAPACITY`] entries.
    logs: Vec<LogEntry>,
    alert: Option<Alert>,
}

impl Default for SimulationState {
    fn default() -> Self { Self::initial() }
}

impl SimulationState {
    /// Maximum number of telemetry samples kept in the rolling buffer.
    pub const TELEMETRY_CAPACITY: usize = 100;

    /// Vehicle on the pad: standby, disarmed, one ground sample, nothing logged.
    pub fn initial() -> Self {
        Self {
            status: FlightStatus::Standby,
            armed: false,
            flight_time: 0.0,
            telemetry: vec![TelemetrySample::ground()],
            logs: Vec::new(),
            alert: None,
        }
    }

    pub fn status(&self) -> FlightStatus { self.status }
    pub fn armed(&self) -> bool { self.armed }
    pub fn flight_time(&self) -> f64 { self.flight_time }
    pub fn telemetry(&self) -> &[TelemetrySample] { &self.telemetry }
    pub fn logs(&self) -> &[LogEntry] { &self.logs }
    pub fn alert(&self) -> Option<&Alert> { self.alert.as_ref() }

    /// Most recent telemetry sample.
    pub fn latest_sample(&self) -> Option<&TelemetrySample> { self.telemetry.last() }

    /// Mission ended, only a restart is offered.
    pub fn is_mission_over(&self) -> bool { self.status.is_terminal() }

    /// The arm toggle is only live on the pad.
    pub fn can_toggle_arm(&self) -> bool {
        matches!(self.status, FlightStatus::Standby | FlightStatus::Armed)
    }

    pub fn can_launch(&self) -> bool { self.armed && self.status == FlightStatus::Armed }

    /// Export needs more than the lone ground sample.
    pub fn can_export(&self) -> bool { self.telemetry.len() >= 2 }

    /// Checks every structural guarantee of the snapshot.
    ///
    /// # Returns
    /// * `Ok(())` if the snapshot is consistent, the first [`InvariantViolation`] otherwise.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.armed && !self.status.permits_armed() {
            return Err(InvariantViolation::ArmedOutsideFlight(self.status));
        }
        if self.telemetry.is_empty() {
            return Err(InvariantViolation::EmptyTelemetry);
        }
        if self.telemetry.len() > Self::TELEMETRY_CAPACITY {
            return Err(InvariantViolation::TelemetryOverflow(self.telemetry.len()));
        }
        if self.logs.len() > LogEntry::CAPACITY {
            return Err(InvariantViolation::LogOverflow(self.logs.len()));
        }
        if self.flight_time < 0.0 && self.status != FlightStatus::Countdown {
            return Err(InvariantViolation::NegativeClockOutsideCountdown(self.status));
        }
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: FlightStatus) { self.status = status }
    pub(crate) fn set_armed(&mut self, armed: bool) { self.armed = armed }
    pub(crate) fn set_flight_time(&mut self, flight_time: f64) { self.flight_time = flight_time }
    pub(crate) fn set_alert(&mut self, alert: Option<Alert>) { self.alert = alert }

    pub(crate) fn push_log(&mut self, message: impl Into<String>, level: LogLevel) {
        mission_log::push_newest(&mut self.logs, LogEntry::new(message, level));
    }

    /// Keeps the log of `previous`, everything else is reset.
    pub(crate) fn with_logs_of(previous: &SimulationState) -> Self {
        Self { logs: previous.logs.clone(), ..Self::initial() }
    }

    pub(crate) fn push_sample(&mut self, sample: TelemetrySample) {
        self.telemetry.push(sample);
        if self.telemetry.len() > Self::TELEMETRY_CAPACITY {
            let excess = self.telemetry.len() - Self::TELEMETRY_CAPACITY;
            self.telemetry.drain(..excess);
        }
    }

    #[cfg(test)]
    pub(crate) fn in_phase(status: FlightStatus, flight_time: f64, sample: TelemetrySample) -> Self {
        Self {
            status,
            armed: status.permits_armed(),
            flight_time,
            telemetry: vec![sample],
            ..Self::initial()
        }
    }
}
