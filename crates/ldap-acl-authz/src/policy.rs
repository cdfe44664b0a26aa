//! Tunable behaviour of the decision engine.

use serde::{Deserialize, Serialize};

/// What a direct-user row with the wrong permission means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserMismatch {
    /// Keep going and consult the user's groups.
    #[default]
    FallThrough,
    /// Deny with a permission mismatch.
    Terminal,
}

/// What a group row with the wrong permission means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupMismatch {
    /// Try the user's remaining groups.
    #[default]
    ContinueScan,
    /// Deny with a permission mismatch for that group.
    StopScan,
}

/// Mismatch handling for the user and group steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationPolicy {
    pub user_mismatch: UserMismatch,
    pub group_mismatch: GroupMismatch,
}

impl AuthorizationPolicy {
    /// Every mismatch is final.
    pub fn strict() -> Self {
        Self {
            user_mismatch: UserMismatch::Terminal,
            group_mismatch: GroupMismatch::StopScan,
        }
    }
}
