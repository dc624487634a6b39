/// Latitude of the launch pad in degrees.
pub const LAUNCH_SITE_LAT: f64 = 34.0522;
/// Longitude of the launch pad in degrees.
pub const LAUNCH_SITE_LON: f64 = -118.2437;

/// One simulated instant of the vehicle's physical state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    /// Seconds since the first sample of the flight.
    time: f64,
    /// Height above the pad in meters, never negative.
    altitude: f64,
    /// Vertical speed in m/s, may turn negative while falling.
    speed: f64,
    /// Vertical acceleration in m/s².
    acceleration: f64,
    /// Engine thrust in newtons.
    thrust: f64,
    latitude: f64,
    longitude: f64,
}

impl TelemetrySample {
    /// Column names in the order [`TelemetrySample::values`] yields them.
    pub const FIELDS: [&'static str; 7] =
        ["time", "altitude", "speed", "acceleration", "thrust", "latitude", "longitude"];

    /// The vehicle resting on the pad at `t = 0`.
    pub fn ground() -> Self {
        Self {
            time: 0.0,
            altitude: 0.0,
            speed: 0.0,
            acceleration: 0.0,
            thrust: 0.0,
            latitude: LAUNCH_SITE_LAT,
            longitude: LAUNCH_SITE_LON,
        }
    }

    /// Copy of this sample advanced by `dt`, physical values untouched.
    pub fn advanced(&self, dt: f64) -> Self { Self { time: self.time + dt, ..*self } }

    pub fn time(&self) -> f64 { self.time }
    pub fn altitude(&self) -> f64 { self.altitude }
    pub fn speed(&self) -> f64 { self.speed }
    pub fn acceleration(&self) -> f64 { self.acceleration }
    pub fn thrust(&self) -> f64 { self.thrust }
    pub fn latitude(&self) -> f64 { self.latitude }
    pub fn longitude(&self) -> f64 { self.longitude }

    pub(crate) fn set_altitude(&mut self, altitude: f64) { self.altitude = altitude }
    pub(crate) fn set_speed(&mut self, speed: f64) { self.speed = speed }
    pub(crate) fn set_acceleration(&mut self, acceleration: f64) {
        self.acceleration = acceleration;
    }
    pub(crate) fn set_thrust(&mut self, thrust: f64) { self.thrust = thrust }

    /// Cosmetic GPS wander proportional to speed, rotating with flight time.
    pub(crate) fn drift_from(&mut self, baseline: &TelemetrySample, flight_time: f64) {
        let step = self.speed / 500_000.0;
        self.latitude = baseline.latitude + step * flight_time.sin();
        self.longitude = baseline.longitude + step * flight_time.cos();
    }

    /// All numeric fields in [`TelemetrySample::FIELDS`] order.
    pub fn values(&self) -> [f64; 7] {
        [
            self.time,
            self.altitude,
            self.speed,
            self.acceleration,
            self.thrust,
            self.latitude,
            self.longitude,
        ]
    }

    #[cfg(test)]
    pub(crate) fn falling(altitude: f64, speed: f64) -> Self {
        Self { altitude, speed, acceleration: -9.81, ..Self::ground() }
    }
}
