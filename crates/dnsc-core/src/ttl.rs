//! TTL policy
//!
//! A TTL is only ever overwritten when the provider has none, or when the
//! caller explicitly asks for a different one. The configured default never
//! clobbers a TTL that is already set at the provider.

use serde::{Deserialize, Serialize};

/// Default TTL for new records (1 hour)
pub const DEFAULT_TTL: u32 = 3600;

/// Rule governing when a TTL is written vs. preserved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlPolicy {
    /// TTL used when the caller supplies none and the provider has none
    pub default_ttl: u32,
}

impl TtlPolicy {
    pub fn new(default_ttl: u32) -> Self {
        Self { default_ttl }
    }

    /// TTL for a record set that is about to be created
    pub fn initial(&self, desired: Option<u32>) -> u32 {
        desired.unwrap_or(self.default_ttl)
    }

    /// Reconcile the TTL of an existing record set in place
    ///
    /// Returns `true` if `existing` was changed.
    pub fn reconcile(&self, existing: &mut Option<u32>, desired: Option<u32>) -> bool {
        match (*existing, desired) {
            (None, _) => {
                *existing = Some(self.initial(desired));
                true
            }
            (Some(current), Some(wanted)) if current != wanted => {
                *existing = Some(wanted);
                true
            }
            _ => false,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
