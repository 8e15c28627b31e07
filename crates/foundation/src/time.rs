/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Advance by `dt_s`, ignoring negative or non-finite steps so time stays monotonic.
    pub fn advanced(self, dt_s: f64) -> Self {
        if dt_s.is_finite() && dt_s > 0.0 {
            Time(self.0 + dt_s)
        } else {
            self
        }
    }
}

/// Milliseconds to seconds, the unit every ease duration is configured in.
pub fn ms_to_s(ms: f64) -> f64 {
    ms / 1000.0
}
