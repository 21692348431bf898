//! Geodetic / Cartesian (ECEF) conversions
use log::error;
use nalgebra::{Matrix3, Vector3};

use crate::{
    constants::{GEODETIC_MAX_ITERATIONS, GEODETIC_TOLERANCE_RAD},
    ellipsoid::Ellipsoid,
    error::Error,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Normalizes a longitude (degrees) to [0, 360).
pub(crate) fn normalize_longitude_deg(longitude_deg: f64) -> f64 {
    let lon = longitude_deg.rem_euclid(360.0);
    if lon >= 360.0 {
        0.0
    } else {
        lon
    }
}

/// Geodetic coordinates. Longitudes are counted positive west
/// and normalized to [0, 360) degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Geodetic {
    /// Latitude (degrees, positive north)
    pub latitude_deg: f64,
    /// Longitude (degrees, positive west)
    pub longitude_deg: f64,
    /// Ellipsoidal height (m)
    pub height_m: f64,
}

impl Geodetic {
    /// Builds validated [Geodetic] coordinates.
    /// - latitude_deg: in [-90, 90]
    /// - longitude_west_deg: positive west, in [-360, 360]
    /// - height_m: ellipsoidal height
    pub fn new(latitude_deg: f64, longitude_west_deg: f64, height_m: f64) -> Result<Self, Error> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(Error::InvalidCoordinate(format!(
                "latitude {} out of [-90, 90]",
                latitude_deg
            )));
        }
        if !longitude_west_deg.is_finite() || !(-360.0..=360.0).contains(&longitude_west_deg) {
            return Err(Error::InvalidCoordinate(format!(
                "longitude {} out of [-360, 360]",
                longitude_west_deg
            )));
        }
        if !height_m.is_finite() {
            return Err(Error::InvalidCoordinate(format!(
                "height {} is not finite",
                height_m
            )));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg: normalize_longitude_deg(longitude_west_deg),
            height_m,
        })
    }

    /// Latitude (rad)
    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    /// Longitude (rad), counted positive east as used in ECEF formulas.
    pub fn east_longitude_rad(&self) -> f64 {
        -self.longitude_deg.to_radians()
    }
}

/// Converts [Geodetic] coordinates to ECEF coordinates (m) on given [Ellipsoid].
pub fn to_cartesian(geodetic: &Geodetic, ellipsoid: &Ellipsoid) -> Vector3<f64> {
    let lat = geodetic.latitude_rad();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = geodetic.east_longitude_rad().sin_cos();
    let n = ellipsoid.prime_vertical_radius_m(lat);
    let h = geodetic.height_m;
    Vector3::new(
        (n + h) * cos_lat * cos_lon,
        (n + h) * cos_lat * sin_lon,
        (n * (1.0 - ellipsoid.e2()) + h) * sin_lat,
    )
}

/// Converts ECEF coordinates (m) to [Geodetic] coordinates on given [Ellipsoid].
///
/// Fixed point iteration on the geodetic latitude, stopped once two consecutive
/// estimates differ by less than [GEODETIC_TOLERANCE_RAD], and abandoned after
/// [GEODETIC_MAX_ITERATIONS] with [Error::NumericalNonConvergence].
/// Heights are evaluated with the cosine form below 45° latitude and
/// with the sine form above, so both the equator and the poles are stable.
pub fn to_geodetic(ecef_m: &Vector3<f64>, ellipsoid: &Ellipsoid) -> Result<Geodetic, Error> {
    let (x, y, z) = (ecef_m[0], ecef_m[1], ecef_m[2]);

    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(Error::InvalidCoordinate(format!(
            "non finite ECEF coordinates {}",
            ecef_m
        )));
    }

    let e2 = ellipsoid.e2();
    let p = (x * x + y * y).sqrt();

    // polar axis: longitude is undefined, reported as 0
    if p < 1.0E-9 {
        if z == 0.0 {
            return Err(Error::InvalidCoordinate(
                "Earth center has no geodetic coordinates".to_string(),
            ));
        }
        return Ok(Geodetic {
            latitude_deg: 90.0_f64.copysign(z),
            longitude_deg: 0.0,
            height_m: z.abs() - ellipsoid.semi_minor_axis_m(),
        });
    }

    let longitude_deg = normalize_longitude_deg(-y.atan2(x).to_degrees());

    let height = |lat: f64| {
        let n = ellipsoid.prime_vertical_radius_m(lat);
        if lat.abs() < std::f64::consts::FRAC_PI_4 {
            p / lat.cos() - n
        } else {
            z / lat.sin() - n * (1.0 - e2)
        }
    };

    let mut lat = z.atan2(p * (1.0 - e2));

    for _ in 0..GEODETIC_MAX_ITERATIONS {
        let n = ellipsoid.prime_vertical_radius_m(lat);
        let h = height(lat);
        let next = z.atan2(p * (1.0 - e2 * n / (n + h)));
        let delta = (next - lat).abs();
        lat = next;
        if delta < GEODETIC_TOLERANCE_RAD {
            return Ok(Geodetic {
                latitude_deg: lat.to_degrees(),
                longitude_deg,
                height_m: height(lat),
            });
        }
    }

    error!(
        "geodetic inversion of {} did not converge within {} iterations",
        ecef_m, GEODETIC_MAX_ITERATIONS
    );
    Err(Error::NumericalNonConvergence(GEODETIC_MAX_ITERATIONS))
}

/// Local East / North / Up basis at a given location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnuBasis {
    /// Rows are the east, north and up unit vectors expressed in ECEF.
    rotation: Matrix3<f64>,
}

impl EnuBasis {
    /// Builds the [EnuBasis] at given [Geodetic] location.
    pub fn at(geodetic: &Geodetic) -> Self {
        let (sin_lat, cos_lat) = geodetic.latitude_rad().sin_cos();
        let (sin_lon, cos_lon) = geodetic.east_longitude_rad().sin_cos();
        let rotation = Matrix3::new(
            -sin_lon,
            cos_lon,
            0.0,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        );
        Self { rotation }
    }

    /// Projects an ECEF vector on (east, north, up).
    pub fn to_enu(&self, ecef: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * ecef
    }

    /// Expresses an (east, north, up) vector in ECEF.
    pub fn to_ecef(&self, enu: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.transpose() * enu
    }
}
