/// Aggregate texture loading progress for a host splash screen.
///
/// Every started load counts toward the total and every settled load
/// (success or failure) toward completion, so a broken URL cannot hold the
/// bar below 100. The reported percentage never decreases, even when a
/// context loss triggers a fresh wave of loads.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    started: u32,
    settled: u32,
    reported: u8,
}

impl LoadProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_started(&mut self) {
        self.started = self.started.saturating_add(1);
    }

    pub fn record_settled(&mut self) {
        self.settled = self.settled.saturating_add(1).min(self.started);
    }

    pub fn started(&self) -> u32 {
        self.started
    }

    pub fn settled(&self) -> u32 {
        self.settled
    }

    /// Instantaneous percentage, rounded. Zero before anything starts.
    pub fn raw_percent(&self) -> u8 {
        if self.started == 0 {
            return 0;
        }
        let pct = (self.settled as f64 / self.started as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Highest percentage seen so far.
    pub fn percent(&self) -> u8 {
        self.reported.max(self.raw_percent())
    }

    /// Returns the new percentage when it rose since the last call.
    pub fn take_increase(&mut self) -> Option<u8> {
        let now = self.raw_percent();
        if now > self.reported {
            self.reported = now;
            return Some(now);
        }
        None
    }
}
