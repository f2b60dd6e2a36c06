use std::sync::atomic::{AtomicU64, Ordering};

/// Discards responses that arrive after a newer request was issued.
///
/// Call [`issue`](Self::issue) when starting a fetch and
/// [`accept`](Self::accept) with the same id before applying its result.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids start at 1.
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, id: u64) -> bool {
        id == self.issued.load(Ordering::SeqCst)
    }

    /// True only for the latest issued id, and only once.
    pub fn accept(&self, id: u64) -> bool {
        if !self.is_current(id) {
            tracing::debug!("Discarding stale response for request {}", id);
            return false;
        }
        let accepted = self
            .accepted
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                (id > last).then_some(id)
            })
            .is_ok();
        accepted && self.is_current(id)
    }
}
