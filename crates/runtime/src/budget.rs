/// Per-frame allowance for deferred work.
///
/// Budgets are expressed in abstract "work units" rather than wall-clock
/// time, so a replayed session defers exactly the same work on the same frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameBudget {
    remaining_units: u32,
    spent_units: u32,
}

impl FrameBudget {
    pub fn new(units: u32) -> Self {
        Self {
            remaining_units: units,
            spent_units: 0,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(u32::MAX)
    }

    pub fn remaining_units(&self) -> u32 {
        self.remaining_units
    }

    pub fn spent_units(&self) -> u32 {
        self.spent_units
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_units == 0
    }

    /// Attempts to consume `units`; returns `false` and leaves the budget
    /// untouched when not enough remain.
    pub fn try_consume(&mut self, units: u32) -> bool {
        if self.remaining_units < units {
            return false;
        }
        self.remaining_units -= units;
        self.spent_units = self.spent_units.saturating_add(units);
        true
    }

    /// Consumes `units` even past exhaustion. Used for overdue work that must
    /// run this frame regardless of the allowance.
    pub fn force_consume(&mut self, units: u32) {
        self.remaining_units = self.remaining_units.saturating_sub(units);
        self.spent_units = self.spent_units.saturating_add(units);
    }
}

#[cfg(test)]
mod tests {
    use super::FrameBudget;

    #[test]
    fn consumes_units() {
        let mut b = FrameBudget::new(3);
        assert!(b.try_consume(2));
        assert_eq!(b.remaining_units(), 1);
        assert!(!b.try_consume(2));
        assert_eq!(b.remaining_units(), 1);
        assert!(b.try_consume(1));
        assert!(b.is_exhausted());
        assert_eq!(b.spent_units(), 3);
    }

    #[test]
    fn forced_work_saturates() {
        let mut b = FrameBudget::new(1);
        b.force_consume(4);
        assert!(b.is_exhausted());
        assert_eq!(b.spent_units(), 4);
    }
}
