use thiserror::Error;

use crate::frame::FrameId;

/// Errors surfaced by the transformation engine.
///
/// All kinds are recoverable at the point level, except
/// [Error::NumericalNonConvergence] which indicates an internal
/// consistency fault.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Latitude, longitude or height out of range (or not finite).
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Epoch earlier than the model validity, or not finite.
    #[error("invalid epoch {0}: must be {1:.1} or later")]
    InvalidEpoch(f64, f64),

    /// Calendar date (year, month, day) that does not exist.
    #[error("invalid calendar date {0:04}-{1:02}-{2:02}")]
    InvalidDate(i32, u8, u8),

    /// Point name is empty or too long.
    #[error("invalid point name \"{0}\"")]
    InvalidName(String),

    /// Batch requests need at least one point.
    #[error("at least one point is required")]
    EmptyRequest,

    /// Frame index or label not in the catalog.
    #[error("unknown reference frame \"{0}\"")]
    UnknownFrame(String),

    /// No direct or composable parameter set exists between both frames.
    #[error("no transformation path from {0} to {1}")]
    NoTransformPath(FrameId, FrameId),

    /// Converting between two realizations of the same datum is not supported:
    /// the result would not be reliable.
    #[error("unsupported change of datum realization: {0} to {1}")]
    UnsupportedDatumRealizationChange(FrameId, FrameId),

    /// Position is not covered by the velocity model and no fallback was configured.
    #[error("unmodeled region at lat={0:.6}°N lon={1:.6}°W")]
    UnmodeledRegion(f64, f64),

    /// Iterative Cartesian to geodetic inversion did not converge.
    #[error("geodetic inversion did not converge after {0} iterations")]
    NumericalNonConvergence(usize),

    /// Epoch is outside the validated range of a parameter set,
    /// and extrapolation has been disabled.
    #[error("{0} to {1} parameters extrapolated at epoch {2:.3}")]
    ExtrapolatedParameters(FrameId, FrameId, f64),

    /// Badly dimensioned or parametrized grid.
    #[error("invalid grid \"{0}\": {1}")]
    InvalidGrid(String, String),

    /// Dataset could not be read or parsed.
    #[error("dataset error: {0}")]
    Dataset(String),
}

/// Non fatal conditions attached to a result.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Transformation parameters evaluated outside of their validated
    /// epoch range: accuracy degrades with the distance to that range.
    ExtrapolatedParameters {
        source: FrameId,
        target: FrameId,
        epoch: f64,
        validity: (f64, f64),
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtrapolatedParameters {
                source,
                target,
                epoch,
                validity,
            } => write!(
                f,
                "{} to {} parameters extrapolated at {:.3} (valid {:.1}..{:.1})",
                source, target, epoch, validity.0, validity.1
            ),
        }
    }
}

/// A result together with the [Warning]s raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Transformed<T> {
    /// Result without any warning.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Returns true if no [Warning] was raised.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
