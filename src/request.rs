//! Sequencing of overlapping asynchronous requests.
//!
//! Every geocode, search or directions call gets a token when issued. When its
//! completion comes back the sequencer decides whether the result may still be
//! applied to the screen.

use std::collections::BTreeSet;

use serde::Deserialize;

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Which completion wins when requests overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestOrdering {
    /// Only the most recently issued request may apply its result
    #[default]
    LatestIssued,
    /// Every completion applies, so whichever arrives last wins
    LastCompleted,
}

/// Issues monotonically increasing tokens and filters completions
#[derive(Debug, Default)]
pub struct RequestSequencer {
    ordering: RequestOrdering,
    last_issued: u64,
    outstanding: BTreeSet<u64>,
}

impl RequestSequencer {
    pub fn new(ordering: RequestOrdering) -> Self {
        Self {
            ordering,
            ..Default::default()
        }
    }

    pub fn issue(&mut self) -> RequestToken {
        self.last_issued += 1;
        let latest = self.last_issued;
        if self.ordering == RequestOrdering::LatestIssued {
            // older tokens can no longer be applied
            self.outstanding.retain(|t| *t >= latest);
        }
        self.outstanding.insert(latest);
        RequestToken(latest)
    }

    /// Record a completion; returns whether its result should be applied.
    ///
    /// A token completes at most once; unknown or repeated tokens are refused.
    pub fn accept(&mut self, token: RequestToken) -> bool {
        if !self.outstanding.remove(&token.0) {
            return false;
        }
        match self.ordering {
            RequestOrdering::LatestIssued => token.0 == self.last_issued,
            RequestOrdering::LastCompleted => true,
        }
    }

    /// Whether a completion that would be applied is still expected
    pub fn is_pending(&self) -> bool {
        match self.ordering {
            RequestOrdering::LatestIssued => self.outstanding.contains(&self.last_issued),
            RequestOrdering::LastCompleted => !self.outstanding.is_empty(),
        }
    }

    pub fn ordering(&self) -> RequestOrdering {
        self.ordering
    }
}
