use foundation::time::Millis;

/// Interval gate: allows an action at most once per interval.
///
/// The interval is passed per check, so callers can adapt it to the current
/// load (e.g. longer while the camera zooms fast).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Throttle {
    last: Option<Millis>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new()
    }
}

impl Throttle {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn last_fired(&self) -> Option<Millis> {
        self.last
    }

    /// True when at least `interval_ms` has elapsed since the last firing
    /// (or it never fired).
    pub fn is_open(&self, now: Millis, interval_ms: f64) -> bool {
        match self.last {
            None => true,
            Some(last) => now.since(last) >= interval_ms,
        }
    }

    /// Records a firing at `now` if the gate is open.
    pub fn try_fire(&mut self, now: Millis, interval_ms: f64) -> bool {
        if !self.is_open(now, interval_ms) {
            return false;
        }
        self.last = Some(now);
        true
    }

    /// Records a firing unconditionally.
    pub fn mark(&mut self, now: Millis) {
        self.last = Some(now);
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
