//! Positions and velocities
use nalgebra::Vector3;

use crate::{
    constants::MM,
    frame::FrameId,
    geodetic::{to_cartesian, EnuBasis, Geodetic},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Position]: [Geodetic] coordinates tagged with their frame and epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// Reference frame
    pub frame: FrameId,
    /// Epoch (decimal year)
    pub epoch: f64,
    /// Coordinates
    pub geodetic: Geodetic,
}

impl Position {
    /// Builds a new [Position].
    pub fn new(frame: FrameId, epoch: f64, geodetic: Geodetic) -> Self {
        Self {
            frame,
            epoch,
            geodetic,
        }
    }

    /// ECEF coordinates (m) on the frame's ellipsoid.
    pub fn ecef_m(&self) -> Vector3<f64> {
        to_cartesian(&self.geodetic, &self.frame.ellipsoid())
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat={:.9}°N lon={:.9}°W h={:.4}m ({} @ {:.4})",
            self.geodetic.latitude_deg,
            self.geodetic.longitude_deg,
            self.geodetic.height_m,
            self.frame,
            self.epoch
        )
    }
}

/// [Velocity]: ECEF rate vector tagged with its frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Velocity {
    /// Reference frame
    pub frame: FrameId,
    /// ECEF velocity (m/yr)
    pub ecef_m_yr: Vector3<f64>,
}

impl Velocity {
    /// Builds a new [Velocity] from ECEF components (m/yr).
    pub fn new(frame: FrameId, ecef_m_yr: Vector3<f64>) -> Self {
        Self { frame, ecef_m_yr }
    }

    /// Builds a new [Velocity] from local (east, north, up) components
    /// in mm/yr, at given location.
    pub fn from_enu_mm_yr(frame: FrameId, geodetic: &Geodetic, enu_mm_yr: Vector3<f64>) -> Self {
        let basis = EnuBasis::at(geodetic);
        Self {
            frame,
            ecef_m_yr: basis.to_ecef(&(enu_mm_yr * MM)),
        }
    }

    /// Local (east, north, up) components in mm/yr, at given location.
    pub fn enu_mm_yr(&self, geodetic: &Geodetic) -> Vector3<f64> {
        EnuBasis::at(geodetic).to_enu(&self.ecef_m_yr) / MM
    }

    /// Horizontal speed (mm/yr) at given location.
    pub fn horizontal_mm_yr(&self, geodetic: &Geodetic) -> f64 {
        let enu = self.enu_mm_yr(geodetic);
        (enu[0].powi(2) + enu[1].powi(2)).sqrt()
    }

    /// Returns a copy scaled by given factor.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            frame: self.frame,
            ecef_m_yr: self.ecef_m_yr * factor,
        }
    }
}
