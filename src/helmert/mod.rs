//! 14-parameter (similarity + rates) frame transformations
use nalgebra::Vector3;

use crate::{
    constants::{MAS_TO_RAD, MM, PPB},
    frame::FrameId,
};

mod path;
mod table;
mod transformer;

pub use path::TransformPath;
pub use table::TransformTable;
pub use transformer::FrameTransformer;

/// Fixed point iterations used to invert a [Similarity].
/// Rotations and scale are below 1E-6, so each iteration gains six digits.
const INVERSION_ITERATIONS: usize = 3;

/// Seven parameter similarity, evaluated at a given epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    /// Translation (m)
    pub translation_m: Vector3<f64>,
    /// Rotation angles (rad)
    pub rotation_rad: Vector3<f64>,
    /// Scale factor (unitless)
    pub scale: f64,
}

impl Similarity {
    /// Applies the linearized similarity:
    /// X' = X + T + D·X + R×X (IERS position vector convention).
    pub fn apply(&self, ecef_m: &Vector3<f64>) -> Vector3<f64> {
        ecef_m + self.translation_m + self.scale * ecef_m + self.rotation_rad.cross(ecef_m)
    }

    /// Applies rotation and scale only, as seen by a vector quantity.
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        vector + self.scale * vector + self.rotation_rad.cross(vector)
    }

    /// Solves X' = X + T + D·X + R×X for X.
    pub fn invert(&self, ecef_m: &Vector3<f64>) -> Vector3<f64> {
        self.invert_vector(&(ecef_m - self.translation_m))
    }

    /// Solves V' = V + D·V + R×V for V.
    pub fn invert_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        (0..INVERSION_ITERATIONS).fold(*vector, |v, _| {
            vector - self.scale * v - self.rotation_rad.cross(&v)
        })
    }
}

/// Time dependent 14-parameter transformation between two frames.
/// Rotations follow the IERS (position vector) convention.
#[derive(Debug, Clone, PartialEq)]
pub struct HelmertParams {
    /// Source frame
    pub source: FrameId,
    /// Target frame
    pub target: FrameId,
    /// Translation at reference epoch (m)
    pub translation_m: Vector3<f64>,
    /// Translation rate (m/yr)
    pub translation_rate_m_yr: Vector3<f64>,
    /// Rotation at reference epoch (rad)
    pub rotation_rad: Vector3<f64>,
    /// Rotation rate (rad/yr)
    pub rotation_rate_rad_yr: Vector3<f64>,
    /// Scale at reference epoch (unitless)
    pub scale: f64,
    /// Scale rate (1/yr)
    pub scale_rate_yr: f64,
    /// Epoch at which the static parameters apply (decimal year)
    pub reference_epoch: f64,
    /// Validated epoch range, if the publication defines one
    pub validity: Option<(f64, f64)>,
    /// Parameters are published from target to source: applied in reverse.
    inverted: bool,
}

impl HelmertParams {
    /// Builds [HelmertParams] from parameters expressed in published units:
    /// - translations in mm and mm/yr
    /// - rotations in mas and mas/yr
    /// - scale in ppb and ppb/yr
    #[allow(clippy::too_many_arguments)]
    pub fn from_published(
        source: FrameId,
        target: FrameId,
        reference_epoch: f64,
        translation_mm: (f64, f64, f64),
        rotation_mas: (f64, f64, f64),
        scale_ppb: f64,
        translation_rate_mm_yr: (f64, f64, f64),
        rotation_rate_mas_yr: (f64, f64, f64),
        scale_rate_ppb_yr: f64,
    ) -> Self {
        let vec = |(x, y, z): (f64, f64, f64), unit: f64| Vector3::new(x, y, z) * unit;
        Self {
            source,
            target,
            reference_epoch,
            translation_m: vec(translation_mm, MM),
            translation_rate_m_yr: vec(translation_rate_mm_yr, MM),
            rotation_rad: vec(rotation_mas, MAS_TO_RAD),
            rotation_rate_rad_yr: vec(rotation_rate_mas_yr, MAS_TO_RAD),
            scale: scale_ppb * PPB,
            scale_rate_yr: scale_rate_ppb_yr * PPB,
            validity: None,
            inverted: false,
        }
    }

    /// Two frames that coincide.
    pub fn identity(source: FrameId, target: FrameId, reference_epoch: f64) -> Self {
        Self::from_published(
            source,
            target,
            reference_epoch,
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            0.0,
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            0.0,
        )
    }

    /// Copies [Self] with a validated epoch range.
    pub fn with_validity(&self, start: f64, end: f64) -> Self {
        let mut s = self.clone();
        s.validity = Some((start, end));
        s
    }

    /// True when all parameters and rates are null.
    pub fn is_identity(&self) -> bool {
        self.translation_m == Vector3::zeros()
            && self.translation_rate_m_yr == Vector3::zeros()
            && self.rotation_rad == Vector3::zeros()
            && self.rotation_rate_rad_yr == Vector3::zeros()
            && self.scale == 0.0
            && self.scale_rate_yr == 0.0
    }

    /// True if epoch lies within the validated range (or no range is defined).
    pub fn is_valid_at(&self, epoch: f64) -> bool {
        match self.validity {
            Some((start, end)) => epoch >= start && epoch <= end,
            None => true,
        }
    }

    /// True if these parameters are applied in the reverse of their published direction.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Evaluates the [Similarity] at given epoch, in the published direction.
    pub fn published_at(&self, epoch: f64) -> Similarity {
        let dt = epoch - self.reference_epoch;
        Similarity {
            translation_m: self.translation_m + self.translation_rate_m_yr * dt,
            rotation_rad: self.rotation_rad + self.rotation_rate_rad_yr * dt,
            scale: self.scale + self.scale_rate_yr * dt,
        }
    }

    /// Frame rate contribution to a velocity located at ecef_m,
    /// in the published direction (m/yr): Ṫ + Ḋ·X + Ṙ×X
    fn published_rates(&self, ecef_m: &Vector3<f64>) -> Vector3<f64> {
        self.translation_rate_m_yr
            + self.scale_rate_yr * ecef_m
            + self.rotation_rate_rad_yr.cross(ecef_m)
    }

    /// Transforms ECEF coordinates (m) from source to target frame, at given epoch.
    pub fn apply(&self, ecef_m: &Vector3<f64>, epoch: f64) -> Vector3<f64> {
        let similarity = self.published_at(epoch);
        if self.inverted {
            similarity.invert(ecef_m)
        } else {
            similarity.apply(ecef_m)
        }
    }

    /// Transforms a velocity (m/yr) located at ecef_m (source frame)
    /// from source to target frame. The static translation never applies to a rate:
    /// the velocity is rotated and scaled, and the frame rates are added.
    pub fn apply_velocity(
        &self,
        velocity_m_yr: &Vector3<f64>,
        ecef_m: &Vector3<f64>,
        epoch: f64,
    ) -> Vector3<f64> {
        let similarity = self.published_at(epoch);
        if self.inverted {
            let published_source = similarity.invert(ecef_m);
            similarity.invert_vector(&(velocity_m_yr - self.published_rates(&published_source)))
        } else {
            similarity.apply_vector(velocity_m_yr) + self.published_rates(ecef_m)
        }
    }

    /// Inverse transformation: same parameters, applied in reverse.
    pub fn inverse(&self) -> Self {
        let mut s = self.clone();
        s.source = self.target;
        s.target = self.source;
        s.inverted = !self.inverted;
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn itrf2014_itrf2008() -> HelmertParams {
        HelmertParams::from_published(
            FrameId::Itrf2014,
            FrameId::Itrf2008,
            2010.0,
            (1.6, 1.9, 2.4),
            (0.0, 0.0, 0.0),
            -0.02,
            (0.0, 0.0, -0.1),
            (0.0, 0.0, 0.0),
            0.03,
        )
    }

    #[test]
    fn time_dependency() {
        let params = itrf2014_itrf2008();
        let sim = params.published_at(2020.0);
        assert!((sim.translation_m[2] - 1.4E-3).abs() < 1.0E-12);
        assert!((sim.scale - 0.28E-9).abs() < 1.0E-15);
        assert_eq!(params.published_at(2010.0).translation_m, params.translation_m);
    }

    #[test]
    fn translation_only_point() {
        let params = itrf2014_itrf2008();
        let origin = Vector3::zeros();
        let moved = params.apply(&origin, 2010.0);
        assert!((moved - Vector3::new(1.6E-3, 1.9E-3, 2.4E-3)).norm() < 1.0E-12);
    }

    #[test]
    fn rotation_convention() {
        // a positive rotation about Z moves a point of the +X axis towards +Y
        let params = HelmertParams::from_published(
            FrameId::Itrf2014,
            FrameId::Itrf97,
            2010.0,
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 1.0),
            0.0,
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            0.0,
        );
        let x = Vector3::new(6_378_137.0, 0.0, 0.0);
        let moved = params.apply(&x, 2010.0);
        assert!(moved[1] > 0.0);
        assert!((moved[1] - 6_378_137.0 * MAS_TO_RAD).abs() < 1.0E-9);
    }

    #[test]
    fn inverse_consistency() {
        let params = itrf2014_itrf2008();
        let x = Vector3::new(-1_283_000.0, -4_726_000.0, 4_074_000.0);
        let there = params.apply(&x, 2017.3);
        let back = params.inverse().apply(&there, 2017.3);
        assert!((back - x).norm() < 1.0E-8);
        assert!(params.inverse().is_inverted());
        assert_eq!(params.inverse().inverse(), params);
    }

    #[test]
    fn exact_inverse_large_translation() {
        // kilometric translation combined with 1E-7 rad rotations
        let params = HelmertParams::from_published(
            FrameId::Itrf2014,
            FrameId::Nad83_2011,
            2010.0,
            (1005.30, -1909.21, -541.57),
            (-26.781_38, 0.420_27, -10.932_06),
            0.368_91,
            (0.79, -0.60, -1.44),
            (-0.066_67, 0.757_44, 0.051_33),
            -0.072_01,
        );
        let x = Vector3::new(-1_283_000.0, -4_726_000.0, 4_074_000.0);
        let there = params.apply(&x, 2024.0);
        let back = params.inverse().apply(&there, 2024.0);
        assert!((back - x).norm() < 1.0E-9);

        let v = Vector3::new(-0.012, 0.003, -0.004);
        let v_there = params.apply_velocity(&v, &x, 2024.0);
        let v_back = params.inverse().apply_velocity(&v_there, &there, 2024.0);
        assert!((v_back - v).norm() < 1.0E-12);
    }

    #[test]
    fn identity() {
        let params = HelmertParams::identity(FrameId::Wgs84G2139, FrameId::Itrf2014, 2010.0);
        assert!(params.is_identity());
        assert!(!itrf2014_itrf2008().is_identity());
        let x = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(params.apply(&x, 1990.0), x);
    }

    #[test]
    fn validity() {
        let params = itrf2014_itrf2008().with_validity(1980.0, 2030.0);
        assert!(params.is_valid_at(2010.0));
        assert!(!params.is_valid_at(1950.0));
        assert!(itrf2014_itrf2008().is_valid_at(1950.0));
    }
}
