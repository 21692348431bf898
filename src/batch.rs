//! Batched requests: independent points sharing frames and epochs
use log::{debug, info};
use nalgebra::Vector3;

use crate::{
    engine::Engine,
    epoch,
    error::{Error, Transformed},
    frame::FrameId,
    geodetic::Geodetic,
    position::{Position, Velocity},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pipeline stage at which a point failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stage {
    /// Input validation (name, coordinates, epochs)
    Validation,
    /// Propagation in the source frame
    SourcePropagation,
    /// Frame to frame transformation
    FrameTransform,
    /// Propagation in the target frame
    TargetPropagation,
    /// Cartesian to geodetic conversion
    Conversion,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::SourcePropagation => write!(f, "source propagation"),
            Self::FrameTransform => write!(f, "frame transformation"),
            Self::TargetPropagation => write!(f, "target propagation"),
            Self::Conversion => write!(f, "conversion"),
        }
    }
}

/// Per point failure
#[derive(Debug, Clone, PartialEq)]
pub struct PointFailure {
    pub stage: Stage,
    pub error: Error,
}

impl PointFailure {
    pub(crate) fn new(stage: Stage, error: Error) -> Self {
        Self { stage, error }
    }
}

impl std::fmt::Display for PointFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// Named location. Longitudes are counted positive west.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedPoint {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_west_deg: f64,
    pub height_m: f64,
}

impl NamedPoint {
    pub fn new(name: &str, latitude_deg: f64, longitude_west_deg: f64, height_m: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude_deg,
            longitude_west_deg,
            height_m,
        }
    }

    /// Validates the point and returns its trimmed name and [Geodetic] coordinates.
    fn validate(&self, max_name_len: usize) -> Result<(String, Geodetic), PointFailure> {
        let name = validate_name(&self.name, max_name_len)?;
        let geodetic = Geodetic::new(self.latitude_deg, self.longitude_west_deg, self.height_m)
            .map_err(|e| PointFailure::new(Stage::Validation, e))?;
        Ok((name, geodetic))
    }
}

fn validate_name(name: &str, max_len: usize) -> Result<String, PointFailure> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.chars().count() > max_len {
        Err(PointFailure::new(
            Stage::Validation,
            Error::InvalidName(name.to_string()),
        ))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Batch of positions to transform between two (frame, epoch) pairs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchRequest {
    pub source_frame: FrameId,
    /// Decimal year
    pub source_epoch: f64,
    pub target_frame: FrameId,
    /// Decimal year
    pub target_epoch: f64,
    pub points: Vec<NamedPoint>,
}

/// Outcome of one point
#[derive(Debug, Clone, PartialEq)]
pub struct PointReport<T> {
    /// Point name, without surrounding whitespace
    pub name: String,
    pub outcome: Result<Transformed<T>, PointFailure>,
}

impl<T> PointReport<T> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Outcome of a batch, in request order
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport<T> {
    pub points: Vec<PointReport<T>>,
}

impl<T> BatchReport<T> {
    /// Number of points successfully processed
    pub fn successes(&self) -> usize {
        self.points.iter().filter(|p| p.is_ok()).count()
    }

    /// Number of failed points
    pub fn failures(&self) -> usize {
        self.points.len() - self.successes()
    }
}

/// Velocity located at a named point,
/// local components in mm/yr.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedVelocity {
    pub point: NamedPoint,
    pub north_mm_yr: f64,
    pub east_mm_yr: f64,
    pub up_mm_yr: f64,
}

/// Batch of velocities to transform between two frames.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VelocityBatchRequest {
    pub source_frame: FrameId,
    pub target_frame: FrameId,
    pub velocities: Vec<NamedVelocity>,
}

#[cfg(feature = "parallel")]
fn map_points<I: Sync, O: Send, F: Fn(&I) -> O + Sync + Send>(items: &[I], f: F) -> Vec<O> {
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_points<I, O, F: Fn(&I) -> O>(items: &[I], f: F) -> Vec<O> {
    items.iter().map(f).collect()
}

impl Engine {
    /// Transforms a [BatchRequest]. The outer error only concerns
    /// the request itself (no point, invalid epochs): each point
    /// then succeeds or fails on its own, without impacting the others.
    pub fn transform_batch(&self, request: &BatchRequest) -> Result<BatchReport<Position>, Error> {
        if request.points.is_empty() {
            return Err(Error::EmptyRequest);
        }
        epoch::validate(request.source_epoch, self.cfg().min_epoch)?;
        epoch::validate(request.target_epoch, self.cfg().min_epoch)?;

        info!(
            "{} point(s): {} @ {:.4} to {} @ {:.4}",
            request.points.len(),
            request.source_frame,
            request.source_epoch,
            request.target_frame,
            request.target_epoch
        );

        let max_name_len = self.cfg().max_name_len;

        let points = map_points(&request.points, |point| {
            let (name, outcome) = match point.validate(max_name_len) {
                Ok((name, geodetic)) => {
                    let position =
                        Position::new(request.source_frame, request.source_epoch, geodetic);
                    let outcome = self.transform_position_staged(
                        &position,
                        request.target_frame,
                        request.target_epoch,
                    );
                    (name, outcome)
                },
                Err(failure) => (point.name.trim().to_string(), Err(failure)),
            };
            if let Err(failure) = &outcome {
                debug!("\"{}\": {}", name, failure);
            }
            PointReport { name, outcome }
        });

        Ok(BatchReport { points })
    }

    /// Transforms a [VelocityBatchRequest]. Same error policy as [Self::transform_batch].
    pub fn transform_velocity_batch(
        &self,
        request: &VelocityBatchRequest,
    ) -> Result<BatchReport<Velocity>, Error> {
        if request.velocities.is_empty() {
            return Err(Error::EmptyRequest);
        }

        let max_name_len = self.cfg().max_name_len;

        let points = map_points(&request.velocities, |item| {
            let (name, outcome) = match item.point.validate(max_name_len) {
                Ok((name, geodetic)) => {
                    let enu = Vector3::new(item.east_mm_yr, item.north_mm_yr, item.up_mm_yr);
                    let outcome = if enu.iter().any(|v| !v.is_finite()) {
                        Err(PointFailure::new(
                            Stage::Validation,
                            Error::InvalidCoordinate(format!("velocity {:?} is not finite", enu)),
                        ))
                    } else {
                        let velocity =
                            Velocity::from_enu_mm_yr(request.source_frame, &geodetic, enu);
                        self.transform_velocity_staged(&velocity, &geodetic, request.target_frame)
                    };
                    (name, outcome)
                },
                Err(failure) => (item.point.name.trim().to_string(), Err(failure)),
            };
            if let Err(failure) = &outcome {
                debug!("\"{}\": {}", name, failure);
            }
            PointReport { name, outcome }
        });

        Ok(BatchReport { points })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(validate_name("  BASE 1 ", 24), Ok("BASE 1".to_string()));
        assert!(validate_name("", 24).is_err());
        assert!(validate_name("   ", 24).is_err());
        assert!(validate_name("ABCDEFGHIJKLMNOPQRSTUVWXY", 24).is_err());
        assert!(validate_name("ABCDEFGHIJKLMNOPQRSTUVWX", 24).is_ok());
    }

    #[test]
    fn request_level_errors() {
        let engine = Engine::default();
        let mut request = BatchRequest {
            source_frame: FrameId::Itrf2014,
            source_epoch: 2010.0,
            target_frame: FrameId::Itrf2020,
            target_epoch: 2020.0,
            points: Vec::new(),
        };
        assert_eq!(engine.transform_batch(&request), Err(Error::EmptyRequest));

        request.points.push(NamedPoint::new("P1", 40.0, 105.0, 1500.0));
        request.source_epoch = 1800.0;
        assert_eq!(
            engine.transform_batch(&request),
            Err(Error::InvalidEpoch(1800.0, 1906.0))
        );
    }

    #[test]
    fn stage_display() {
        let failure = PointFailure::new(Stage::Validation, Error::InvalidName("".to_string()));
        assert_eq!(failure.to_string(), "validation failed: invalid point name \"\"");
    }
}
