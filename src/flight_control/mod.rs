mod action;
pub(crate) mod engine;
mod flight_state;
pub(crate) mod mission_clock;
pub(crate) mod mission_log;
mod state;
mod telemetry;
mod tick_driver;

pub use action::Action;
pub use flight_state::FlightStatus;
pub use mission_log::{Alert, LogEntry, LogLevel};
pub use state::SimulationState;
pub use telemetry::TelemetrySample;
pub use tick_driver::{DispatchError, TickDriver};
