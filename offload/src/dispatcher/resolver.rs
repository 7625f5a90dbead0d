//! Idempotent outcome resolution.
//!
//! An execution unit has three terminal observers (result, fault, exit) and
//! in degenerate cases more than one can fire - a unit may report a result
//! and then separately exit non-zero. [`OutcomeSlot`] is the single resolve
//! point that makes this safe: the first resolution wins, later attempts
//! are discarded and counted, never double-reported.

use super::request::Outcome;
use tracing::debug;

/// One-shot holder for a request's outcome.
///
/// Owned by the dispatcher invocation driving a single request; not shared
/// across requests.
#[derive(Debug)]
pub struct OutcomeSlot {
    resolved: Option<Outcome>,
    discarded: u32,
}

impl OutcomeSlot {
    /// Creates an empty, unresolved slot.
    pub fn new() -> Self {
        Self {
            resolved: None,
            discarded: 0,
        }
    }

    /// Attempts to resolve the slot.
    ///
    /// Returns true if this call resolved the outcome; false if the slot
    /// was already resolved, in which case the new outcome is discarded.
    pub fn resolve(&mut self, outcome: Outcome) -> bool {
        if self.resolved.is_some() {
            self.discarded += 1;
            debug!(discarded = %outcome, "Outcome already resolved, discarding late signal");
            return false;
        }
        self.resolved = Some(outcome);
        true
    }

    /// Returns true once a resolution has been accepted.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Number of resolution attempts discarded after the first.
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Returns the resolved outcome, if any.
    pub fn outcome(&self) -> Option<&Outcome> {
        self.resolved.as_ref()
    }

    /// Consumes the slot, yielding the resolved outcome.
    pub fn into_outcome(self) -> Option<Outcome> {
        self.resolved
    }
}

impl Default for OutcomeSlot {
    fn default() -> Self {
        Self::new()
    }
}
