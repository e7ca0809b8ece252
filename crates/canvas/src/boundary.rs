//! Failure boundary around the per-frame pipeline.
//!
//! A panic inside a frame is caught here and turned into a recorded fault;
//! the canvas then degrades to drawing nothing instead of taking the host
//! down with it.
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::error;

/// Runs `f`, converting a panic into its message.
pub fn contain<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SceneBoundary {
    fault: Option<String>,
    faults: u64,
}

impl SceneBoundary {
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    /// Total faults since construction, including cleared ones.
    pub fn faults(&self) -> u64 {
        self.faults
    }

    pub fn record(&mut self, message: String) {
        error!("canvas frame panicked, scene disabled: {message}");
        self.faults += 1;
        self.fault = Some(message);
    }

    pub fn clear(&mut self) {
        self.fault = None;
    }
}
