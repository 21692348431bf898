//! Reference ellipsoids
use crate::constants::{
    GRS80_INV_FLATTENING, GRS80_SEMI_MAJOR_AXIS_M, WGS72_INV_FLATTENING, WGS72_SEMI_MAJOR_AXIS_M,
    WGS84_INV_FLATTENING, WGS84_SEMI_MAJOR_AXIS_M,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference [Ellipsoid] of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    /// Semi-major axis (m)
    pub semi_major_axis_m: f64,
    /// Flattening
    pub flattening: f64,
}

impl Ellipsoid {
    /// Geodetic Reference System 1980, used by NAD 83 and the ITRF family.
    pub const GRS80: Self = Self::from_inverse_flattening(
        GRS80_SEMI_MAJOR_AXIS_M,
        GRS80_INV_FLATTENING,
    );

    /// World Geodetic System 1984
    pub const WGS84: Self = Self::from_inverse_flattening(
        WGS84_SEMI_MAJOR_AXIS_M,
        WGS84_INV_FLATTENING,
    );

    /// World Geodetic System 1972
    pub const WGS72: Self = Self::from_inverse_flattening(
        WGS72_SEMI_MAJOR_AXIS_M,
        WGS72_INV_FLATTENING,
    );

    /// Builds a new [Ellipsoid] from semi-major axis (m) and inverse flattening.
    pub const fn from_inverse_flattening(semi_major_axis_m: f64, inv_flattening: f64) -> Self {
        Self {
            semi_major_axis_m,
            flattening: 1.0 / inv_flattening,
        }
    }

    /// Semi-minor axis (m)
    pub fn semi_minor_axis_m(&self) -> f64 {
        self.semi_major_axis_m * (1.0 - self.flattening)
    }

    /// First eccentricity squared
    pub fn e2(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Prime vertical radius of curvature (m) at given geodetic latitude (rad).
    pub fn prime_vertical_radius_m(&self, lat_rad: f64) -> f64 {
        self.semi_major_axis_m / (1.0 - self.e2() * lat_rad.sin().powi(2)).sqrt()
    }
}
