//! Tunable parameters for group authorization.

use serde::{Deserialize, Serialize};

/// Metering costs and structural limits applied during authorization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthParams {
    /// Gas charged each time a group record is resolved.
    pub resolve_cost: u64,

    /// Gas charged for every (member, signer) comparison.
    pub compare_cost: u64,

    /// Maximum nesting of group-in-group evaluation. The root group is depth 0.
    pub max_depth: u32,

    /// Whether groups with a zero decision threshold may be created.
    /// Such groups authorize any signer set, including an empty one.
    pub allow_zero_threshold: bool,

    /// Gas budget granted to a single authorization check by callers that do
    /// not bring their own meter.
    pub default_gas_limit: u64,
}

impl AuthParams {
    pub const DEFAULT_RESOLVE_COST: u64 = 10;
    pub const DEFAULT_COMPARE_COST: u64 = 10;
    pub const DEFAULT_MAX_DEPTH: u32 = 16;
    pub const DEFAULT_GAS_LIMIT: u64 = 200_000;
}

impl Default for AuthParams {
    fn default() -> Self {
        Self {
            resolve_cost: Self::DEFAULT_RESOLVE_COST,
            compare_cost: Self::DEFAULT_COMPARE_COST,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            allow_zero_threshold: true,
            default_gas_limit: Self::DEFAULT_GAS_LIMIT,
        }
    }
}
