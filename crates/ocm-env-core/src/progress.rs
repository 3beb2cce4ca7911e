use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// A progress checkpoint. `increment` is the percentage added by this event,
/// not a running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub increment: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(increment: u8, message: impl Into<String>) -> Self {
        Self {
            increment,
            message: message.into(),
        }
    }
}

/// Shared cancellation flag, checked by the builder between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
