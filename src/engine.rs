//! Transformation engine: ownership root of every model
use log::debug;
use nalgebra::Vector3;

use crate::{
    batch::{PointFailure, Stage},
    cfg::Config,
    epoch,
    error::{Error, Transformed},
    frame::{Catalog, FrameId},
    geodetic::{to_cartesian, to_geodetic, EnuBasis, Geodetic},
    helmert::{FrameTransformer, TransformTable},
    position::{Position, Velocity},
    propagator::{propagate, Motion},
    velocity::{VelocityEstimate, VelocityModel, VelocitySource},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Velocity predicted at a [Position], with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedVelocity {
    /// Velocity, in the frame of the [Position]
    pub velocity: Velocity,
    /// Origin of the estimate
    pub source: VelocitySource,
}

/// Local displacement between two epochs (m).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Displacement {
    pub north_m: f64,
    pub east_m: f64,
    pub up_m: f64,
}

impl Displacement {
    /// Horizontal norm (m)
    pub fn horizontal_m(&self) -> f64 {
        (self.north_m.powi(2) + self.east_m.powi(2)).sqrt()
    }
}

/// [Engine] owns the frame catalog, the transformation table,
/// the velocity model and the [Config]. It is built once,
/// never mutated, and shared by reference between requests (and threads).
#[derive(Debug, Clone)]
pub struct Engine {
    cfg: Config,
    catalog: Catalog,
    table: TransformTable,
    model: VelocityModel,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Motion of a location expressed in a given frame.
/// Velocities are predicted in the hub frame and carried to this frame.
struct FrameMotion<'a> {
    engine: &'a Engine,
    frame: FrameId,
}

impl FrameMotion<'_> {
    fn geodetic(&self, ecef_m: &Vector3<f64>) -> Result<Geodetic, Error> {
        to_geodetic(ecef_m, &self.frame.ellipsoid())
    }
}

impl Motion for FrameMotion<'_> {
    fn velocity(&self, ecef_m: &Vector3<f64>, epoch: f64) -> Result<Vector3<f64>, Error> {
        let estimate = self
            .engine
            .frame_velocity(self.frame, ecef_m, epoch, false)?;
        Ok(estimate.velocity_m_yr)
    }

    fn event_epochs(&self, t0: f64, t1: f64) -> Vec<f64> {
        self.engine.model.event_epochs(t0, t1)
    }

    fn event_offset(&self, ecef_m: &Vector3<f64>, event_epoch: f64) -> Result<Vector3<f64>, Error> {
        let geodetic = self.geodetic(ecef_m)?;
        Ok(self.engine.model.event_offset(&geodetic, event_epoch))
    }

    fn transient(&self, ecef_m: &Vector3<f64>, epoch: f64) -> Result<Vector3<f64>, Error> {
        if self.engine.model.events().is_empty() {
            return Ok(Vector3::zeros());
        }
        let geodetic = self.geodetic(ecef_m)?;
        Ok(self.engine.model.transient(&geodetic, epoch))
    }
}

impl Engine {
    /// Builds a new [Engine] with the built-in models and given [Config].
    pub fn new(cfg: Config) -> Self {
        let model = VelocityModel::default();
        Self {
            catalog: Catalog::default(),
            table: TransformTable::default(),
            model: Self::configured(model, &cfg),
            cfg,
        }
    }

    fn configured(model: VelocityModel, cfg: &Config) -> VelocityModel {
        model
            .with_policy(cfg.unmodeled_region)
            .with_origin_rate_bias(cfg.include_origin_rate_bias)
    }

    /// Copies [Self] with a custom [TransformTable].
    pub fn with_table(&self, table: TransformTable) -> Self {
        let mut s = self.clone();
        s.table = table;
        s
    }

    /// Copies [Self] with a custom [VelocityModel].
    /// The [Config] policies are applied to it.
    pub fn with_velocity_model(&self, model: VelocityModel) -> Self {
        let mut s = self.clone();
        s.model = Self::configured(model, &self.cfg);
        s
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn table(&self) -> &TransformTable {
        &self.table
    }

    pub fn velocity_model(&self) -> &VelocityModel {
        &self.model
    }

    /// [FrameTransformer] honoring the extrapolation policy.
    pub fn transformer(&self) -> FrameTransformer<'_> {
        FrameTransformer::new(&self.table, self.cfg.reject_extrapolation)
    }

    /// Velocity (ECEF, m/yr) of a location expressed in frame:
    /// predicted in the hub frame, then carried to frame.
    fn frame_velocity(
        &self,
        frame: FrameId,
        ecef_m: &Vector3<f64>,
        epoch: f64,
        instantaneous: bool,
    ) -> Result<VelocityEstimate, Error> {
        let to_hub = self.table.path(frame, FrameId::HUB)?;
        let ecef_hub = to_hub.apply(ecef_m, epoch);
        let geodetic = to_geodetic(&ecef_hub, &FrameId::HUB.ellipsoid())?;

        let estimate = if instantaneous {
            self.model.velocity_at(&geodetic, &ecef_hub, epoch)?
        } else {
            self.model.secular_velocity(&geodetic, &ecef_hub)?
        };

        Ok(VelocityEstimate {
            velocity_m_yr: to_hub
                .inverse()
                .apply_velocity(&estimate.velocity_m_yr, &ecef_hub, epoch),
            source: estimate.source,
        })
    }

    fn propagate_in(
        &self,
        frame: FrameId,
        ecef_m: &Vector3<f64>,
        t0: f64,
        t1: f64,
    ) -> Result<Vector3<f64>, Error> {
        let motion = FrameMotion {
            engine: self,
            frame,
        };
        propagate(&motion, ecef_m, t0, t1)
    }

    fn validate_epoch(&self, epoch: f64) -> Result<f64, PointFailure> {
        epoch::validate(epoch, self.cfg.min_epoch).map_err(|e| PointFailure::new(Stage::Validation, e))
    }

    /// Transforms a [Position] to target frame and target epoch.
    ///
    /// The position is propagated in its own frame to the reference epoch
    /// of each transformation leg, the leg is applied at that epoch, and the
    /// result is finally propagated in the target frame to target_epoch.
    /// Same frame and epoch returns the input itself. Same frame, different epoch
    /// is a pure propagation.
    pub fn transform_position(
        &self,
        position: &Position,
        target: FrameId,
        target_epoch: f64,
    ) -> Result<Transformed<Position>, Error> {
        self.transform_position_staged(position, target, target_epoch)
            .map_err(|failure| failure.error)
    }

    /// [Self::transform_position], reporting the [Stage] of failure.
    pub(crate) fn transform_position_staged(
        &self,
        position: &Position,
        target: FrameId,
        target_epoch: f64,
    ) -> Result<Transformed<Position>, PointFailure> {
        self.validate_epoch(position.epoch)?;
        self.validate_epoch(target_epoch)?;

        if position.frame == target && position.epoch == target_epoch {
            return Ok(Transformed::clean(*position));
        }

        let path = self
            .table
            .path(position.frame, target)
            .map_err(|e| PointFailure::new(Stage::FrameTransform, e))?;

        let transformer = self.transformer();

        let mut warnings = Vec::new();
        let mut ecef = position.ecef_m();
        let mut frame = position.frame;
        let mut epoch = position.epoch;
        let mut stage = Stage::SourcePropagation;

        for leg in path.legs().iter() {
            if !leg.is_identity() {
                ecef = self
                    .propagate_in(frame, &ecef, epoch, leg.reference_epoch)
                    .map_err(|e| PointFailure::new(stage, e))?;
                epoch = leg.reference_epoch;

                warnings.extend(
                    transformer
                        .check_leg(leg, epoch)
                        .map_err(|e| PointFailure::new(Stage::FrameTransform, e))?,
                );
                ecef = leg.apply(&ecef, epoch);
                stage = Stage::FrameTransform;
            }
            frame = leg.target;
        }

        debug!(
            "{} to {}: {} leg(s), reached {} at {:.4}",
            position.frame,
            target,
            path.legs().len(),
            frame,
            epoch
        );

        ecef = self
            .propagate_in(target, &ecef, epoch, target_epoch)
            .map_err(|e| PointFailure::new(Stage::TargetPropagation, e))?;

        let geodetic = to_geodetic(&ecef, &target.ellipsoid())
            .map_err(|e| PointFailure::new(Stage::Conversion, e))?;

        Ok(Transformed {
            value: Position::new(target, target_epoch, geodetic),
            warnings,
        })
    }

    /// Transforms a [Velocity] located at geodetic (expressed in the velocity frame)
    /// to target frame. Each leg is evaluated at its reference epoch.
    pub fn transform_velocity(
        &self,
        velocity: &Velocity,
        geodetic: &Geodetic,
        target: FrameId,
    ) -> Result<Transformed<Velocity>, Error> {
        self.transform_velocity_staged(velocity, geodetic, target)
            .map_err(|failure| failure.error)
    }

    pub(crate) fn transform_velocity_staged(
        &self,
        velocity: &Velocity,
        geodetic: &Geodetic,
        target: FrameId,
    ) -> Result<Transformed<Velocity>, PointFailure> {
        if velocity.frame == target {
            return Ok(Transformed::clean(*velocity));
        }

        let path = self
            .table
            .path(velocity.frame, target)
            .map_err(|e| PointFailure::new(Stage::FrameTransform, e))?;

        let ecef = to_cartesian(geodetic, &velocity.frame.ellipsoid());

        let (_, rate) = path
            .legs()
            .iter()
            .fold((ecef, velocity.ecef_m_yr), |(ecef, rate), leg| {
                let epoch = leg.reference_epoch;
                (
                    leg.apply(&ecef, epoch),
                    leg.apply_velocity(&rate, &ecef, epoch),
                )
            });

        Ok(Transformed::clean(Velocity::new(target, rate)))
    }

    /// Predicts the velocity of a [Position], in its own frame, at its epoch.
    pub fn predict_velocity(&self, position: &Position) -> Result<PredictedVelocity, Error> {
        epoch::validate(position.epoch, self.cfg.min_epoch)?;
        let estimate =
            self.frame_velocity(position.frame, &position.ecef_m(), position.epoch, true)?;
        Ok(PredictedVelocity {
            velocity: Velocity::new(position.frame, estimate.velocity_m_yr),
            source: estimate.source,
        })
    }

    /// Displacement of a [Position] from its epoch to to_epoch, in its own frame,
    /// expressed in the local (north, east, up) basis at its location.
    pub fn displacement(&self, position: &Position, to_epoch: f64) -> Result<Displacement, Error> {
        epoch::validate(position.epoch, self.cfg.min_epoch)?;
        epoch::validate(to_epoch, self.cfg.min_epoch)?;

        let ecef = position.ecef_m();
        let moved = self.propagate_in(position.frame, &ecef, position.epoch, to_epoch)?;
        let enu = EnuBasis::at(&position.geodetic).to_enu(&(moved - ecef));

        Ok(Displacement {
            north_m: enu[1],
            east_m: enu[0],
            up_m: enu[2],
        })
    }
}
