//! Decides when a risk result is worth pushing to subscribers. Message
//! formatting and delivery belong to the notifier, not here.

use crate::types::risk::{RiskLevel, RiskResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlertDecision {
    pub notify: bool,
    pub previous: Option<RiskLevel>,
    pub current: RiskLevel,
}

/// Remembers the last level that was notified for one monitored site.
#[derive(Debug, Clone, Default)]
pub struct AlertPolicy {
    last_notified: Option<RiskLevel>,
}

impl AlertPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notified(&self) -> Option<RiskLevel> {
        self.last_notified
    }

    /// Notify on any level change, and on every DANGER result.
    pub fn evaluate(&mut self, result: &RiskResult) -> AlertDecision {
        let current = result.risk_level;
        let previous = self.last_notified;
        let notify = previous != Some(current) || current == RiskLevel::Danger;
        if notify {
            self.last_notified = Some(current);
        }
        AlertDecision {
            notify,
            previous,
            current,
        }
    }
}
