//! Cancel-and-replace tracking for content generation requests.
//!
//! Only the most recently started request may deliver its result. Starting a
//! new request supersedes any that are still in flight.

/// Identifies one generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    /// Sequence number of this ticket.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Issues tickets and filters out stale results.
#[derive(Debug, Clone, Default)]
pub struct GenerationTracker {
    latest: u64,
    pending: bool,
}

impl GenerationTracker {
    /// Create a tracker with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding any in flight.
    pub fn begin(&mut self) -> GenerationTicket {
        if self.pending {
            tracing::debug!("Generation {} superseded", self.latest);
        }
        self.latest += 1;
        self.pending = true;
        GenerationTicket(self.latest)
    }

    /// Deliver a result. Returns it only if `ticket` is the latest request
    /// and has not completed yet.
    pub fn complete<T>(&mut self, ticket: GenerationTicket, result: T) -> Option<T> {
        if ticket.0 != self.latest || !self.pending {
            tracing::debug!(
                "Dropping stale generation result {} (latest {})",
                ticket.0,
                self.latest
            );
            return None;
        }
        self.pending = false;
        Some(result)
    }

    /// Abandon the in-flight request, if any.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let mut tracker = GenerationTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(second > first);

        assert_eq!(tracker.complete(first, "old"), None);
        assert!(tracker.is_pending());
        assert_eq!(tracker.complete(second, "new"), Some("new"));
        assert!(!tracker.is_pending());
    }

    #[test]
    fn test_result_delivered_once() {
        let mut tracker = GenerationTracker::new();
        let ticket = tracker.begin();
        assert_eq!(tracker.complete(ticket, 1), Some(1));
        assert_eq!(tracker.complete(ticket, 2), None);
    }

    #[test]
    fn test_cancel_drops_result() {
        let mut tracker = GenerationTracker::new();
        let ticket = tracker.begin();
        tracker.cancel();
        assert_eq!(tracker.complete(ticket, ()), None);
    }
}
