use serde::{Deserialize, Serialize};

/// "Render on next frame" contract.
///
/// Any number of `request_redraw` calls between two display refreshes
/// collapse into a single pending draw, consumed by `take_pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RedrawScheduler {
    pending: bool,
    coalesced_requests: u64,
    frames_taken: u64,
}

impl RedrawScheduler {
    /// Marks a draw as pending.
    ///
    /// Returns `true` when this call scheduled a new draw, `false` when it
    /// was folded into an already pending one.
    pub fn request_redraw(&mut self) -> bool {
        if self.pending {
            self.coalesced_requests += 1;
            return false;
        }
        self.pending = true;
        true
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        self.pending
    }

    /// Consumes the pending draw, if any. Called once per display refresh.
    pub fn take_pending(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.frames_taken += 1;
        true
    }

    /// Drops a pending draw without counting it as taken.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    /// Requests folded into an already pending draw.
    #[must_use]
    pub fn coalesced_requests(self) -> u64 {
        self.coalesced_requests
    }

    #[must_use]
    pub fn frames_taken(self) -> u64 {
        self.frames_taken
    }
}
