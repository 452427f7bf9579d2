use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Serialization gate for orchestrated remote operations.
///
/// The flag is held through a [`BusyGuard`]; dropping the guard is the only
/// way to clear it, so every exit path of an operation releases it.
#[derive(Clone, Debug, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// `None` while another guard is alive.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: self.busy.clone(),
                lease: Arc::new(()),
            })
    }
}

#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
    lease: Arc<()>,
}

impl BusyGuard {
    /// Upgradable for exactly as long as this guard is alive.
    pub(crate) fn lease(&self) -> Weak<()> {
        Arc::downgrade(&self.lease)
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
