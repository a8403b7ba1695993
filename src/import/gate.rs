use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::ImportError;

/// Admits one import at a time and carries its cancel flag.
///
/// Clones share state, so a signal handler or a view can hold one while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct ImportGate {
    running: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl ImportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate. Fails with [`ImportError::InProgress`] while another
    /// import holds it.
    pub fn try_begin(&self) -> Result<ImportGuard, ImportError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ImportError::InProgress)?;
        self.cancel.store(false, Ordering::SeqCst);
        Ok(ImportGuard { gate: self.clone() })
    }

    pub fn is_importing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the running import to stop at its next yield point.
    /// Returns `false` when nothing is running.
    pub fn cancel(&self) -> bool {
        if !self.is_importing() {
            return false;
        }
        self.cancel.store(true, Ordering::SeqCst);
        true
    }
}

/// RAII guard that releases the gate on drop
#[derive(Debug)]
pub struct ImportGuard {
    gate: ImportGate,
}

impl ImportGuard {
    pub fn cancel_flag(&self) -> &AtomicBool {
        &self.gate.cancel
    }
}

impl Drop for ImportGuard {
    fn drop(&mut self) {
        self.gate.cancel.store(false, Ordering::SeqCst);
        self.gate.running.store(false, Ordering::SeqCst);
    }
}
