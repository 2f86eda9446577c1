//! Request tokens for superseding in-flight lookups.
//!
//! Each asynchronous channel (map asset, lot details, availability, lot
//! search) owns a [`RequestTracker`]. Issuing a new token makes every older
//! token stale; responses carrying a stale token are dropped by the receiver.

use serde::Serialize;

/// Identifies one issued request on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Generation number of the token.
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues tokens for one channel and tells current from stale.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    current: Option<RequestToken>,
    issued: u64,
}

impl RequestTracker {
    /// Create a tracker with nothing in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token, superseding any earlier one.
    pub fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        token
    }

    /// Check if `token` is the latest issued and not yet completed or cancelled.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Mark `token` as answered. Returns `false` (and changes nothing) for
    /// stale tokens.
    pub fn complete(&mut self, token: RequestToken) -> bool {
        if self.is_current(token) {
            self.current = None;
            true
        } else {
            false
        }
    }

    /// Drop whatever is in flight.
    pub fn cancel(&mut self) {
        self.current = None;
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}
