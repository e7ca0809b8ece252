use foundation::time::Millis;

/// Frame metadata handed to every per-frame step.
///
/// The canvas is driven by the display refresh: `time` is the canvas clock
/// (milliseconds since mount) and `index` counts frames since mount.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Time elapsed since the previous frame (milliseconds).
    pub dt_ms: f64,
    /// Canvas time at the start of the frame.
    pub time: Millis,
}

impl Frame {
    /// Fixed-step frame, for deterministic replays and tests.
    pub fn fixed(index: u64, dt_ms: f64) -> Self {
        Self {
            index,
            dt_ms,
            time: Millis(index as f64 * dt_ms),
        }
    }

    pub fn first(time: Millis) -> Self {
        Self {
            index: 0,
            dt_ms: 0.0,
            time,
        }
    }

    /// The frame that follows `self`, observed at `time`.
    pub fn advance(self, time: Millis) -> Self {
        Self {
            index: self.index + 1,
            dt_ms: time.since(self.time),
            time,
        }
    }

    pub fn next(self) -> Self {
        self.advance(self.time.plus(self.dt_ms))
    }

    /// Alternates 0/1 between consecutive frames.
    pub fn parity(&self) -> u8 {
        (self.index & 1) as u8
    }
}
