use nalgebra::Vector3;

use crate::{error::Error, velocity::DisplacementGrid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Post event relaxation law
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelaxationKind {
    /// A·ln(1 + Δt/τ)
    Logarithmic,
    /// A·(1 - exp(-Δt/τ))
    Exponential,
}

impl std::str::FromStr for RelaxationKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" | "logarithmic" => Ok(Self::Logarithmic),
            "exp" | "exponential" => Ok(Self::Exponential),
            other => Err(Error::Dataset(format!("unknown relaxation \"{}\"", other))),
        }
    }
}

/// Post event (postseismic) relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct Relaxation {
    pub kind: RelaxationKind,
    /// Time constant τ (years)
    pub time_constant_yr: f64,
    /// Amplitude A (east, north, up, mm)
    pub amplitude: DisplacementGrid,
}

impl Relaxation {
    pub fn new(
        kind: RelaxationKind,
        time_constant_yr: f64,
        amplitude: DisplacementGrid,
    ) -> Result<Self, Error> {
        if !(time_constant_yr.is_finite() && time_constant_yr > 0.0) {
            return Err(Error::InvalidGrid(
                amplitude.name.clone(),
                format!("invalid relaxation time constant {}", time_constant_yr),
            ));
        }
        Ok(Self {
            kind,
            time_constant_yr,
            amplitude,
        })
    }

    /// Unitless relaxation factor, Δt years after the event.
    pub fn factor(&self, dt_yr: f64) -> f64 {
        if dt_yr <= 0.0 {
            return 0.0;
        }
        let x = dt_yr / self.time_constant_yr;
        match self.kind {
            RelaxationKind::Logarithmic => x.ln_1p(),
            RelaxationKind::Exponential => -(-x).exp_m1(),
        }
    }

    /// Time derivative of [Self::factor] (1/yr), Δt years after the event.
    pub fn rate(&self, dt_yr: f64) -> f64 {
        if dt_yr <= 0.0 {
            return 0.0;
        }
        let tau = self.time_constant_yr;
        match self.kind {
            RelaxationKind::Logarithmic => 1.0 / (tau + dt_yr),
            RelaxationKind::Exponential => (-dt_yr / tau).exp() / tau,
        }
    }
}

/// Deformation event (earthquake): coseismic step and optional relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeformationEvent {
    /// Readable name
    pub name: String,
    /// Event epoch (decimal year). The step applies to epochs at or after it.
    pub epoch: f64,
    /// Coseismic displacement (east, north, up, mm)
    pub coseismic: DisplacementGrid,
    /// Post event relaxation
    pub relaxation: Option<Relaxation>,
}

impl DeformationEvent {
    pub fn new(name: &str, epoch: f64, coseismic: DisplacementGrid) -> Result<Self, Error> {
        if !epoch.is_finite() {
            return Err(Error::InvalidEpoch(epoch, f64::NEG_INFINITY));
        }
        Ok(Self {
            name: name.to_string(),
            epoch,
            coseismic,
            relaxation: None,
        })
    }

    /// Copies [Self] with a post event [Relaxation].
    pub fn with_relaxation(&self, relaxation: Relaxation) -> Self {
        let mut s = self.clone();
        s.relaxation = Some(relaxation);
        s
    }

    /// True if the step lies within (min(t0, t1), max(t0, t1)]:
    /// crossed when moving from t0 to t1.
    pub fn is_crossed(&self, t0: f64, t1: f64) -> bool {
        self.epoch > t0.min(t1) && self.epoch <= t0.max(t1)
    }

    /// Coseismic step (east, north, up, mm) at given location, null when not covered.
    pub fn step_enu_mm(&self, latitude_deg: f64, longitude_west_deg: f64) -> Vector3<f64> {
        self.coseismic
            .value_at(latitude_deg, longitude_west_deg)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Accumulated post event displacement (east, north, up, mm) at epoch.
    pub fn transient_enu_mm(
        &self,
        latitude_deg: f64,
        longitude_west_deg: f64,
        epoch: f64,
    ) -> Vector3<f64> {
        match &self.relaxation {
            Some(relaxation) if epoch > self.epoch => relaxation
                .amplitude
                .value_at(latitude_deg, longitude_west_deg)
                .map(|amplitude| amplitude * relaxation.factor(epoch - self.epoch))
                .unwrap_or_else(Vector3::zeros),
            _ => Vector3::zeros(),
        }
    }
}
