use super::mission_log::Alert;
use strum_macros::Display;

/// Everything that can drive the simulation forward: operator intents and clock ticks.
#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Arm,
    Disarm,
    Launch,
    Abort,
    Reset,
    /// Replaces the current banner, `None` clears it.
    SetAlert(Option<Alert>),
    /// Advances the simulation by the given number of seconds.
    UpdateTick(f64),
}

impl Action {
    /// Ticks are not operator intents and are only traced, never logged.
    pub fn is_tick(&self) -> bool { matches!(self, Action::UpdateTick(_)) }
}
