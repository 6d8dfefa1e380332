//! Shared loading flag. Serializes upload and query requests.
//!
//! Check-and-set is a single compare-and-swap, so a second submission can never
//! slip in between the check and the set, even on a multi-threaded runtime.
//! Releasing happens in `Drop`, which covers success, failure and early return.

use crate::ports::ProgressPort;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// Identity of one request attempt. Monotonic per gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// The single "loading" flag shared by every session, plus the progress
/// indicator it drives.
pub struct LoadingGate {
    busy: AtomicBool,
    next_ticket: AtomicU64,
    progress: Arc<dyn ProgressPort>,
}

impl LoadingGate {
    pub fn new(progress: Arc<dyn ProgressPort>) -> Self {
        Self {
            busy: AtomicBool::new(false),
            next_ticket: AtomicU64::new(1),
            progress,
        }
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Claim the gate. Returns `None` when another request holds it.
    /// On success the progress indicator is started; the returned guard
    /// completes it and clears the flag when dropped.
    pub fn try_acquire(&self) -> Option<LoadingGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        let ticket = RequestTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        self.progress.start();
        debug!(ticket = ticket.id(), "loading started");
        Some(LoadingGuard { gate: self, ticket })
    }
}

/// Proof that the holder owns the in-flight slot.
#[must_use = "dropping the guard immediately releases the gate"]
pub struct LoadingGuard<'a> {
    gate: &'a LoadingGate,
    ticket: RequestTicket,
}

impl LoadingGuard<'_> {
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
        self.gate.progress.complete();
        debug!(ticket = self.ticket.id(), "loading finished");
    }
}
