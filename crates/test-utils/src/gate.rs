use std::sync::Arc;
use tokio::sync::watch;

/// Holds calls at a suspension point until released, and counts how many
/// calls reached it.
#[derive(Clone, Debug)]
pub struct Gate {
    open: Arc<watch::Sender<bool>>,
    entered: Arc<watch::Sender<usize>>,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            open: Arc::new(watch::channel(true).0),
            entered: Arc::new(watch::channel(0).0),
        }
    }
}

impl Gate {
    pub fn close(&self) {
        self.open.send_replace(false);
    }

    pub fn release(&self) {
        self.open.send_replace(true);
    }

    pub fn entered(&self) -> usize {
        *self.entered.borrow()
    }

    /// Waits until at least `count` calls have reached the gate.
    pub async fn wait_entered(&self, count: usize) {
        let mut rx = self.entered.subscribe();
        let _ = rx.wait_for(|entered| *entered >= count).await;
    }

    pub(crate) async fn pass(&self) {
        self.entered.send_modify(|entered| *entered += 1);
        let mut rx = self.open.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}
