use crate::prelude::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Behavior when a location is not assigned to any plate.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnmodeledRegionPolicy {
    /// Fail with [Error::UnmodeledRegion].
    #[default]
    Reject,
    /// Proceed with a null plate velocity.
    /// Grid corrections and deformation events still apply where they are defined.
    ZeroVelocity,
}

impl std::fmt::Display for UnmodeledRegionPolicy {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Reject => write!(fmt, "reject"),
            Self::ZeroVelocity => write!(fmt, "zero-velocity"),
        }
    }
}

impl std::str::FromStr for UnmodeledRegionPolicy {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "zero" | "zero-velocity" | "zero_velocity" => Ok(Self::ZeroVelocity),
            other => Err(Error::Dataset(format!("unknown policy \"{}\"", other))),
        }
    }
}
