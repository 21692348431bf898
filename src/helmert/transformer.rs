use log::warn;
use nalgebra::Vector3;

use crate::{
    error::{Error, Transformed, Warning},
    frame::FrameId,
    helmert::{HelmertParams, TransformPath, TransformTable},
};

/// [FrameTransformer] applies [TransformPath]s at a given epoch
/// and reports parameters evaluated outside of their validated range.
#[derive(Debug, Clone, Copy)]
pub struct FrameTransformer<'a> {
    table: &'a TransformTable,
    reject_extrapolation: bool,
}

impl<'a> FrameTransformer<'a> {
    /// Builds a new [FrameTransformer].
    /// When reject_extrapolation is set, parameters evaluated out of
    /// their validated range cause [Error::ExtrapolatedParameters]
    /// instead of a [Warning].
    pub fn new(table: &'a TransformTable, reject_extrapolation: bool) -> Self {
        Self {
            table,
            reject_extrapolation,
        }
    }

    /// Resolves the [TransformPath] between two frames.
    pub fn path(&self, source: FrameId, target: FrameId) -> Result<TransformPath, Error> {
        self.table.path(source, target)
    }

    /// Validity check of a single leg at given epoch.
    pub(crate) fn check_leg(
        &self,
        leg: &HelmertParams,
        epoch: f64,
    ) -> Result<Option<Warning>, Error> {
        if leg.is_valid_at(epoch) {
            return Ok(None);
        }
        if self.reject_extrapolation {
            return Err(Error::ExtrapolatedParameters(leg.source, leg.target, epoch));
        }
        Ok(leg.validity.map(|validity| {
            warn!(
                "{} to {}: parameters extrapolated at {:.3} (valid {:.1}..{:.1})",
                leg.source, leg.target, epoch, validity.0, validity.1
            );
            Warning::ExtrapolatedParameters {
                source: leg.source,
                target: leg.target,
                epoch,
                validity,
            }
        }))
    }

    /// Validity check of every leg of the path, at given epoch.
    pub(crate) fn check_validity(
        &self,
        path: &TransformPath,
        epoch: f64,
    ) -> Result<Vec<Warning>, Error> {
        let mut warnings = Vec::new();
        for leg in path.legs().iter() {
            if let Some(warning) = self.check_leg(leg, epoch)? {
                warnings.push(warning);
            }
        }
        Ok(warnings)
    }

    /// Transforms ECEF coordinates (m) from source to target frame,
    /// every parameter being evaluated at given epoch.
    pub fn transform(
        &self,
        ecef_m: &Vector3<f64>,
        source: FrameId,
        target: FrameId,
        epoch: f64,
    ) -> Result<Transformed<Vector3<f64>>, Error> {
        let path = self.path(source, target)?;
        let warnings = self.check_validity(&path, epoch)?;
        Ok(Transformed {
            value: path.apply(ecef_m, epoch),
            warnings,
        })
    }

    /// Transforms a velocity (m/yr), located at ecef_m (source frame),
    /// from source to target frame.
    pub fn transform_velocity(
        &self,
        velocity_m_yr: &Vector3<f64>,
        ecef_m: &Vector3<f64>,
        source: FrameId,
        target: FrameId,
        epoch: f64,
    ) -> Result<Transformed<Vector3<f64>>, Error> {
        let path = self.path(source, target)?;
        let warnings = self.check_validity(&path, epoch)?;
        Ok(Transformed {
            value: path.apply_velocity(velocity_m_yr, ecef_m, epoch),
            warnings,
        })
    }
}
