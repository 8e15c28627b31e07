use foundation::time::{Time, ms_to_s};

/// Frame metadata for one render-loop tick.
///
/// Small and pure so a sequence of frames can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time applied by this frame (seconds).
    pub dt_s: f64,
    /// Engine time after this frame's step (seconds).
    pub time: Time,
}

impl Frame {
    pub fn first(dt_s: f64) -> Self {
        Self {
            index: 0,
            dt_s,
            time: Time::ZERO.advanced(dt_s),
        }
    }

    pub fn next(self, dt_s: f64) -> Self {
        Self {
            index: self.index + 1,
            dt_s,
            time: self.time.advanced(dt_s),
        }
    }
}

/// Turns animation-frame timestamps (milliseconds) into [`Frame`]s.
///
/// The first tick has no previous timestamp and uses `default_dt_s`. Later
/// deltas are clamped to `[0, max_dt_s]` so a backgrounded tab does not
/// produce one huge step when it becomes visible again.
#[derive(Debug, Clone)]
pub struct FrameClock {
    default_dt_s: f64,
    max_dt_s: f64,
    last_timestamp_ms: Option<f64>,
    current: Option<Frame>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(1.0 / 60.0, 0.1)
    }
}

impl FrameClock {
    pub fn new(default_dt_s: f64, max_dt_s: f64) -> Self {
        Self {
            default_dt_s,
            max_dt_s: max_dt_s.max(0.0),
            last_timestamp_ms: None,
            current: None,
        }
    }

    pub fn tick(&mut self, timestamp_ms: f64) -> Frame {
        let raw_dt = match self.last_timestamp_ms {
            Some(last) => ms_to_s(timestamp_ms - last),
            None => self.default_dt_s,
        };
        let dt_s = if raw_dt.is_finite() {
            raw_dt.clamp(0.0, self.max_dt_s)
        } else {
            0.0
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp_ms = Some(timestamp_ms);
        }

        let frame = match self.current {
            Some(prev) => prev.next(dt_s),
            None => Frame::first(dt_s),
        };
        self.current = Some(frame);
        frame
    }

    /// Most recent frame, if any tick has happened.
    pub fn current(&self) -> Option<Frame> {
        self.current
    }

    pub fn frame_count(&self) -> u64 {
        self.current.map(|f| f.index + 1).unwrap_or(0)
    }
}
