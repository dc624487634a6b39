use crate::warn;
use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

/// Parameters of one simulated session, read from the environment.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Wall-clock period between two simulation ticks.
    tick_interval: Duration,
    /// Seed of the thrust jitter, `None` seeds from the OS.
    seed: Option<u64>,
    /// Directory the telemetry CSV is written to.
    export_dir: PathBuf,
    /// The console gives up waiting for touchdown after this long.
    mission_timeout: Duration,
    /// Scripted abort after this long, if any.
    abort_after: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Self::DEF_TICK_INTERVAL,
            seed: None,
            export_dir: PathBuf::from("."),
            mission_timeout: Self::DEF_MISSION_TIMEOUT,
            abort_after: None,
        }
    }
}

impl SessionConfig {
    const DEF_TICK_INTERVAL: Duration = Duration::from_millis(100);
    const DEF_MISSION_TIMEOUT: Duration = Duration::from_secs(120);

    /// Builds a config from `KLU_*` environment variables, keeping defaults for unset
    /// or unparsable values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = parse_var::<u64>("KLU_TICK_MS") {
            if ms == 0 {
                warn!("KLU_TICK_MS must be positive, keeping {} ms.", config.tick_interval.as_millis());
            } else {
                config.tick_interval = Duration::from_millis(ms);
            }
        }
        config.seed = parse_var::<u64>("KLU_SEED");
        if let Ok(dir) = env::var("KLU_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse_var::<u64>("KLU_MISSION_TIMEOUT_SECS") {
            config.mission_timeout = Duration::from_secs(secs);
        }
        config.abort_after = parse_var::<f64>("KLU_ABORT_AT_SECS").and_then(abort_delay);
        config
    }

    #[cfg(test)]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_interval(&self) -> Duration { self.tick_interval }
    pub fn seed(&self) -> Option<u64> { self.seed }
    pub fn export_dir(&self) -> &Path { &self.export_dir }
    pub fn mission_timeout(&self) -> Duration { self.mission_timeout }
    pub fn abort_after(&self) -> Option<Duration> { self.abort_after }
}

/// Scripted abort delay, `None` for negative or unrepresentable seconds.
fn abort_delay(secs: f64) -> Option<Duration> {
    match Duration::try_from_secs_f64(secs) {
        Ok(delay) => Some(delay),
        Err(e) => {
            warn!("Ignoring KLU_ABORT_AT_SECS={secs}: {e}.");
            None
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparsable {key}={raw:?}.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_values_and_skips_garbage() {
        // SAFETY: the keys are unique to this test
        unsafe {
            env::set_var("KLU_TEST_TICK_OK", " 250 ");
            env::set_var("KLU_TEST_TICK_BAD", "fast");
        }
        assert_eq!(parse_var::<u64>("KLU_TEST_TICK_OK"), Some(250));
        assert_eq!(parse_var::<u64>("KLU_TEST_TICK_BAD"), None);
        assert_eq!(parse_var::<u64>("KLU_TEST_TICK_UNSET"), None);
    }

    #[test]
    fn abort_delay_rejects_unrepresentable_seconds() {
        assert_eq!(abort_delay(2.5), Some(Duration::from_millis(2500)));
        assert_eq!(abort_delay(0.0), Some(Duration::ZERO));
        assert_eq!(abort_delay(1e30), None);
        assert_eq!(abort_delay(-1.0), None);
        assert_eq!(abort_delay(f64::NAN), None);
        assert_eq!(abort_delay(f64::INFINITY), None);
    }

    #[test]
    fn oversized_abort_delay_keeps_default() {
        // SAFETY: the key is only read by this test module
        unsafe { env::set_var("KLU_ABORT_AT_SECS", "1e30") };
        assert!(SessionConfig::from_env().abort_after().is_none());
    }

    #[test]
    fn defaults_tick_every_hundred_millis() {
        let config = SessionConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(config.seed().is_none());
        assert!(config.abort_after().is_none());
        assert_eq!(config.with_seed(5).seed(), Some(5));
    }
}
