use std::collections::HashMap;

use nalgebra::Vector3;

use crate::{
    constants::{MAS_TO_RAD, MM},
    error::Error,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tectonic plates described by the plate motion model.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Plate {
    /// Antarctic
    Antarctic,
    /// Arabian
    Arabian,
    /// Australian
    Australian,
    /// Eurasian
    Eurasian,
    /// Indian
    Indian,
    /// Nazca
    Nazca,
    /// North American
    NorthAmerican,
    /// Nubian
    Nubian,
    /// Pacific
    Pacific,
    /// South American
    SouthAmerican,
    /// Somalian
    Somalian,
}

impl Plate {
    pub const ALL: [Self; 11] = [
        Self::Antarctic,
        Self::Arabian,
        Self::Australian,
        Self::Eurasian,
        Self::Indian,
        Self::Nazca,
        Self::NorthAmerican,
        Self::Nubian,
        Self::Pacific,
        Self::SouthAmerican,
        Self::Somalian,
    ];

    /// Four letter abbreviation, as used in plate motion model tables.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Antarctic => "ANTA",
            Self::Arabian => "ARAB",
            Self::Australian => "AUST",
            Self::Eurasian => "EURA",
            Self::Indian => "INDI",
            Self::Nazca => "NAZC",
            Self::NorthAmerican => "NOAM",
            Self::Nubian => "NUBI",
            Self::Pacific => "PCFC",
            Self::SouthAmerican => "SOAM",
            Self::Somalian => "SOMA",
        }
    }
}

impl std::fmt::Display for Plate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Plate {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .find(|plate| plate.code().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or(Error::Dataset(format!("unknown plate \"{}\"", trimmed)))
    }
}

/// Plate rotation: Cartesian components of the Euler vector (mas/yr).
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerPole {
    pub omega_x_mas_yr: f64,
    pub omega_y_mas_yr: f64,
    pub omega_z_mas_yr: f64,
}

impl EulerPole {
    pub const fn new(omega_x_mas_yr: f64, omega_y_mas_yr: f64, omega_z_mas_yr: f64) -> Self {
        Self {
            omega_x_mas_yr,
            omega_y_mas_yr,
            omega_z_mas_yr,
        }
    }

    /// Rotation vector (rad/yr)
    pub fn omega_rad_yr(&self) -> Vector3<f64> {
        Vector3::new(
            self.omega_x_mas_yr,
            self.omega_y_mas_yr,
            self.omega_z_mas_yr,
        ) * MAS_TO_RAD
    }

    /// Rigid rotation velocity ω × X (m/yr) at ECEF position (m).
    pub fn velocity(&self, ecef_m: &Vector3<f64>) -> Vector3<f64> {
        self.omega_rad_yr().cross(ecef_m)
    }
}

/// ITRF2014 plate motion model (Altamimi et al. 2017).
const ITRF2014_PMM: [(Plate, EulerPole); 11] = [
    (Plate::Antarctic, EulerPole::new(-0.248, -0.324, 0.675)),
    (Plate::Arabian, EulerPole::new(1.154, -0.136, 1.444)),
    (Plate::Australian, EulerPole::new(1.510, 1.182, 1.215)),
    (Plate::Eurasian, EulerPole::new(-0.085, -0.531, 0.770)),
    (Plate::Indian, EulerPole::new(1.154, -0.005, 1.454)),
    (Plate::Nazca, EulerPole::new(-0.333, -1.544, 1.623)),
    (Plate::NorthAmerican, EulerPole::new(0.024, -0.694, -0.063)),
    (Plate::Nubian, EulerPole::new(0.099, -0.614, 0.733)),
    (Plate::Pacific, EulerPole::new(-0.409, 1.047, -2.169)),
    (Plate::SouthAmerican, EulerPole::new(-0.270, -0.301, -0.140)),
    (Plate::Somalian, EulerPole::new(-0.121, -0.794, 0.884)),
];

/// ITRF2014-PMM origin rate bias (mm/yr)
const ITRF2014_PMM_ORIGIN_RATE_MM_YR: (f64, f64, f64) = (0.37, 0.35, 0.74);

/// [PlateModel] gathers the [EulerPole] of each [Plate].
#[derive(Debug, Clone, PartialEq)]
pub struct PlateModel {
    poles: HashMap<Plate, EulerPole>,
    /// Origin rate bias (mm/yr), added to every plate velocity when enabled.
    pub origin_rate_bias_mm_yr: Vector3<f64>,
}

impl Default for PlateModel {
    /// ITRF2014-PMM
    fn default() -> Self {
        let (x, y, z) = ITRF2014_PMM_ORIGIN_RATE_MM_YR;
        Self {
            poles: ITRF2014_PMM.into_iter().collect(),
            origin_rate_bias_mm_yr: Vector3::new(x, y, z),
        }
    }
}

impl PlateModel {
    /// Returns the [EulerPole] of given [Plate], if described.
    pub fn pole(&self, plate: Plate) -> Option<&EulerPole> {
        self.poles.get(&plate)
    }

    /// Copies [Self] replacing (or defining) the pole of given [Plate].
    pub fn with_pole(&self, plate: Plate, pole: EulerPole) -> Self {
        let mut s = self.clone();
        s.poles.insert(plate, pole);
        s
    }

    /// Copies [Self] with given origin rate bias (mm/yr).
    pub fn with_origin_rate_bias(&self, bias_mm_yr: Vector3<f64>) -> Self {
        let mut s = self.clone();
        s.origin_rate_bias_mm_yr = bias_mm_yr;
        s
    }

    /// Horizontal plate velocity (m/yr) at ECEF position (m),
    /// when this [Plate] is described.
    pub fn velocity(
        &self,
        plate: Plate,
        ecef_m: &Vector3<f64>,
        with_origin_rate_bias: bool,
    ) -> Option<Vector3<f64>> {
        let pole = self.pole(plate)?;
        let mut velocity = pole.velocity(ecef_m);
        if with_origin_rate_bias {
            velocity += self.origin_rate_bias_mm_yr * MM;
        }
        Some(velocity)
    }
}
