#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_POINT_NAME_LEN, MIN_EPOCH};

mod policy;
pub use policy::UnmodeledRegionPolicy;

fn default_reject_extrapolation() -> bool {
    false
}

fn default_min_epoch() -> f64 {
    MIN_EPOCH
}

fn default_max_name_len() -> usize {
    MAX_POINT_NAME_LEN
}

fn default_origin_rate_bias() -> bool {
    false
}

/// Engine [Config]uration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Behavior for locations outside of any plate region.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unmodeled_region: UnmodeledRegionPolicy,
    /// Fail instead of warning when transformation parameters
    /// are evaluated outside of their validated epoch range.
    #[cfg_attr(feature = "serde", serde(default = "default_reject_extrapolation"))]
    pub reject_extrapolation: bool,
    /// Earliest epoch accepted (decimal year).
    #[cfg_attr(feature = "serde", serde(default = "default_min_epoch"))]
    pub min_epoch: f64,
    /// Longest point name accepted by the batch interface.
    #[cfg_attr(feature = "serde", serde(default = "default_max_name_len"))]
    pub max_name_len: usize,
    /// Add the plate motion model origin rate bias to plate velocities.
    #[cfg_attr(feature = "serde", serde(default = "default_origin_rate_bias"))]
    pub include_origin_rate_bias: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unmodeled_region: UnmodeledRegionPolicy::default(),
            reject_extrapolation: default_reject_extrapolation(),
            min_epoch: default_min_epoch(),
            max_name_len: default_max_name_len(),
            include_origin_rate_bias: default_origin_rate_bias(),
        }
    }
}

impl Config {
    /// Copies [Config] with given [UnmodeledRegionPolicy].
    pub fn with_unmodeled_region(&self, policy: UnmodeledRegionPolicy) -> Self {
        let mut s = self.clone();
        s.unmodeled_region = policy;
        s
    }

    /// Copies [Config], rejecting (or not) extrapolated parameters.
    pub fn with_reject_extrapolation(&self, reject: bool) -> Self {
        let mut s = self.clone();
        s.reject_extrapolation = reject;
        s
    }

    /// Copies [Config] with given earliest epoch.
    pub fn with_min_epoch(&self, min_epoch: f64) -> Self {
        let mut s = self.clone();
        s.min_epoch = min_epoch;
        s
    }

    /// Copies [Config] with given maximal point name length.
    pub fn with_max_name_len(&self, max_name_len: usize) -> Self {
        let mut s = self.clone();
        s.max_name_len = max_name_len;
        s
    }

    /// Copies [Config], with or without the origin rate bias.
    pub fn with_origin_rate_bias(&self, include: bool) -> Self {
        let mut s = self.clone();
        s.include_origin_rate_bias = include;
        s
    }
}
