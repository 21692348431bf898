use nalgebra::Vector3;

use crate::{frame::FrameId, helmert::HelmertParams};

/// Oriented sequence of [HelmertParams] linking two frames.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPath {
    source: FrameId,
    target: FrameId,
    legs: Vec<HelmertParams>,
}

impl TransformPath {
    pub(crate) fn new(source: FrameId, target: FrameId, legs: Vec<HelmertParams>) -> Self {
        Self {
            source,
            target,
            legs,
        }
    }

    /// Path from a frame to itself.
    pub fn identity(frame: FrameId) -> Self {
        Self::new(frame, frame, Vec::new())
    }

    pub fn source(&self) -> FrameId {
        self.source
    }

    pub fn target(&self) -> FrameId {
        self.target
    }

    /// Legs, in application order.
    pub fn legs(&self) -> &[HelmertParams] {
        &self.legs
    }

    /// True if this path does not change the coordinates.
    pub fn is_identity(&self) -> bool {
        self.legs.iter().all(|leg| leg.is_identity())
    }

    /// Epoch at which the first non trivial leg is published.
    pub fn reference_epoch(&self) -> Option<f64> {
        self.legs
            .iter()
            .find(|leg| !leg.is_identity())
            .map(|leg| leg.reference_epoch)
    }

    /// Transforms ECEF coordinates (m), all legs evaluated at the same epoch.
    pub fn apply(&self, ecef_m: &Vector3<f64>, epoch: f64) -> Vector3<f64> {
        self.legs
            .iter()
            .fold(*ecef_m, |ecef, leg| leg.apply(&ecef, epoch))
    }

    /// Transforms a velocity (m/yr) located at ecef_m (source frame).
    pub fn apply_velocity(
        &self,
        velocity_m_yr: &Vector3<f64>,
        ecef_m: &Vector3<f64>,
        epoch: f64,
    ) -> Vector3<f64> {
        let (_, velocity) = self.legs.iter().fold(
            (*ecef_m, *velocity_m_yr),
            |(ecef, velocity), leg| {
                (
                    leg.apply(&ecef, epoch),
                    leg.apply_velocity(&velocity, &ecef, epoch),
                )
            },
        );
        velocity
    }

    /// Reversed path.
    pub fn inverse(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            legs: self.legs.iter().rev().map(|leg| leg.inverse()).collect(),
        }
    }
}
