/// Milliseconds on the canvas clock (0 at mount).
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd)]
pub struct Millis(pub f64);

impl Millis {
    pub const ZERO: Self = Millis(0.0);

    pub fn from_secs(s: f64) -> Self {
        Millis(s * 1000.0)
    }

    /// Elapsed time since `earlier`, never negative.
    pub fn since(self, earlier: Millis) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    pub fn plus(self, ms: f64) -> Self {
        Millis(self.0 + ms)
    }
}
