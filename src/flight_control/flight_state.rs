use std::collections::HashSet;
use std::sync::LazyLock;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Mutually exclusive phases of a simulated flight.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    Standby,
    Armed,
    Countdown,
    Liftoff,
    InFlight,
    Apogee,
    Descent,
    Landed,
    Aborted,
}

impl FlightStatus {
    /// `Landed` and `Aborted` can only be left through a reset (or re-entered through an abort).
    pub fn is_terminal(self) -> bool { matches!(self, FlightStatus::Landed | FlightStatus::Aborted) }

    /// Whether a tick in this phase appends a telemetry sample.
    pub fn accumulates_telemetry(self) -> bool {
        !matches!(
            self,
            FlightStatus::Standby | FlightStatus::Armed | FlightStatus::Landed | FlightStatus::Aborted
        )
    }

    /// Phases in which the ignition system may be armed.
    pub fn permits_armed(self) -> bool {
        matches!(
            self,
            FlightStatus::Armed
                | FlightStatus::Countdown
                | FlightStatus::Liftoff
                | FlightStatus::InFlight
                | FlightStatus::Apogee
                | FlightStatus::Descent
        )
    }
}

/// Every status change a single reduction may produce.
///
/// A liftoff tick passes through `Liftoff` and lands in `InFlight` within one reduction,
/// and a burn-out tick may go straight from `InFlight` to `Descent`. Launch only needs the
/// armed flag, so every armed phase may restart the countdown.
pub static TRANSITION_LOOKUP: LazyLock<HashSet<(FlightStatus, FlightStatus)>> =
    LazyLock::new(|| {
        let mut lookup = HashSet::new();
        let forward = [
            (FlightStatus::Standby, FlightStatus::Armed),
            (FlightStatus::Armed, FlightStatus::Countdown),
            (FlightStatus::Countdown, FlightStatus::Liftoff),
            (FlightStatus::Countdown, FlightStatus::InFlight),
            (FlightStatus::Liftoff, FlightStatus::InFlight),
            (FlightStatus::Liftoff, FlightStatus::Apogee),
            (FlightStatus::InFlight, FlightStatus::Apogee),
            (FlightStatus::InFlight, FlightStatus::Descent),
            (FlightStatus::Apogee, FlightStatus::Descent),
            (FlightStatus::Apogee, FlightStatus::Landed),
            (FlightStatus::Descent, FlightStatus::Landed),
        ];
        lookup.extend(forward);
        for from in FlightStatus::iter() {
            // reset (and disarm outside terminal phases) always lands in standby
            lookup.insert((from, FlightStatus::Standby));
            lookup.insert((from, FlightStatus::Aborted));
            if from.permits_armed() {
                lookup.insert((from, FlightStatus::Countdown));
            }
        }
        lookup
    });

/// Returns `true` if `from -> to` is a change the engine is allowed to make.
pub fn is_legal_transition(from: FlightStatus, to: FlightStatus) -> bool {
    from == to || TRANSITION_LOOKUP.contains(&(from, to))
}
