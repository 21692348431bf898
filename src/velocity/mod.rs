//! Crustal velocity model: rigid plates, gridded corrections and deformation events
use log::debug;
use nalgebra::Vector3;

use crate::{
    cfg::UnmodeledRegionPolicy,
    constants::MM,
    error::Error,
    geodetic::{EnuBasis, Geodetic},
};

mod event;
mod grid;
mod plate;
mod region;

pub use event::{DeformationEvent, Relaxation, RelaxationKind};
pub use grid::{DisplacementGrid, Interpolation, VelocityGrid};
pub use plate::{EulerPole, Plate, PlateModel};
pub use region::{default_regions, PlateRegion};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Origin of a velocity estimate
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VelocitySource {
    /// Rigid rotation of this [Plate]
    RigidPlate(Plate),
    /// Plate rotation (if any) corrected by the named [VelocityGrid]
    Gridded { plate: Option<Plate>, grid: String },
    /// Location outside of the model, null velocity by configuration
    Unmodeled,
}

impl std::fmt::Display for VelocitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RigidPlate(plate) => write!(f, "{} plate", plate),
            Self::Gridded {
                plate: Some(plate),
                grid,
            } => write!(f, "{} plate + \"{}\" grid", plate, grid),
            Self::Gridded { plate: None, grid } => write!(f, "\"{}\" grid", grid),
            Self::Unmodeled => write!(f, "unmodeled"),
        }
    }
}

/// Velocity with its [VelocitySource]
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityEstimate {
    /// ECEF velocity (m/yr)
    pub velocity_m_yr: Vector3<f64>,
    /// Origin of this estimate
    pub source: VelocitySource,
}

/// [VelocityModel] gathers every component of the crustal motion
/// and answers per location queries. Velocities are expressed
/// in the hub frame (ITRF2014).
#[derive(Debug, Clone)]
pub struct VelocityModel {
    plates: PlateModel,
    regions: Vec<PlateRegion>,
    grids: Vec<VelocityGrid>,
    events: Vec<DeformationEvent>,
    policy: UnmodeledRegionPolicy,
    origin_rate_bias: bool,
}

impl Default for VelocityModel {
    /// ITRF2014-PMM over the built-in regions, no grid, no event.
    fn default() -> Self {
        Self {
            plates: PlateModel::default(),
            regions: default_regions(),
            grids: Vec::new(),
            events: Vec::new(),
            policy: UnmodeledRegionPolicy::default(),
            origin_rate_bias: false,
        }
    }
}

impl VelocityModel {
    /// Builds a new [VelocityModel].
    pub fn new(plates: PlateModel, regions: Vec<PlateRegion>) -> Self {
        Self {
            plates,
            regions,
            ..Default::default()
        }
    }

    /// Copies [Self] with given correction grids, queried in this order.
    pub fn with_grids(&self, grids: Vec<VelocityGrid>) -> Self {
        let mut s = self.clone();
        s.grids = grids;
        s
    }

    /// Copies [Self] with given [DeformationEvent]s.
    pub fn with_events(&self, mut events: Vec<DeformationEvent>) -> Self {
        events.sort_by(|a, b| a.epoch.total_cmp(&b.epoch));
        let mut s = self.clone();
        s.events = events;
        s
    }

    /// Copies [Self] with given [UnmodeledRegionPolicy].
    pub fn with_policy(&self, policy: UnmodeledRegionPolicy) -> Self {
        let mut s = self.clone();
        s.policy = policy;
        s
    }

    /// Copies [Self], with or without the plate model origin rate bias.
    pub fn with_origin_rate_bias(&self, include: bool) -> Self {
        let mut s = self.clone();
        s.origin_rate_bias = include;
        s
    }

    pub fn plates(&self) -> &PlateModel {
        &self.plates
    }

    pub fn regions(&self) -> &[PlateRegion] {
        &self.regions
    }

    pub fn grids(&self) -> &[VelocityGrid] {
        &self.grids
    }

    /// Events, sorted chronologically.
    pub fn events(&self) -> &[DeformationEvent] {
        &self.events
    }

    /// [Plate] this location belongs to.
    pub fn plate(&self, geodetic: &Geodetic) -> Option<Plate> {
        region::locate(
            &self.regions,
            geodetic.latitude_deg,
            geodetic.longitude_deg,
        )
    }

    /// Interseismic (secular) velocity at this location:
    /// plate rotation plus the first covering grid correction.
    pub fn secular_velocity(
        &self,
        geodetic: &Geodetic,
        ecef_m: &Vector3<f64>,
    ) -> Result<VelocityEstimate, Error> {
        let (lat, lon) = (geodetic.latitude_deg, geodetic.longitude_deg);

        let plate = self.plate(geodetic);

        let plate_velocity = match plate {
            Some(plate) => self
                .plates
                .velocity(plate, ecef_m, self.origin_rate_bias)
                .ok_or(Error::UnmodeledRegion(lat, lon))?,
            None => match self.policy {
                UnmodeledRegionPolicy::Reject => return Err(Error::UnmodeledRegion(lat, lon)),
                UnmodeledRegionPolicy::ZeroVelocity => {
                    debug!("lat={:.6} lon={:.6}: no plate, null plate velocity", lat, lon);
                    Vector3::zeros()
                },
            },
        };

        let correction = self
            .grids
            .iter()
            .find_map(|grid| grid.value_at(lat, lon).map(|enu| (grid, enu)));

        match (correction, plate) {
            (Some((grid, enu_mm_yr)), plate) => {
                let correction = EnuBasis::at(geodetic).to_ecef(&(enu_mm_yr * MM));
                Ok(VelocityEstimate {
                    velocity_m_yr: plate_velocity + correction,
                    source: VelocitySource::Gridded {
                        plate,
                        grid: grid.name.clone(),
                    },
                })
            },
            (None, Some(plate)) => Ok(VelocityEstimate {
                velocity_m_yr: plate_velocity,
                source: VelocitySource::RigidPlate(plate),
            }),
            (None, None) => Ok(VelocityEstimate {
                velocity_m_yr: plate_velocity,
                source: VelocitySource::Unmodeled,
            }),
        }
    }

    /// Instantaneous velocity at this location and epoch:
    /// secular velocity plus the rate of every ongoing relaxation.
    pub fn velocity_at(
        &self,
        geodetic: &Geodetic,
        ecef_m: &Vector3<f64>,
        epoch: f64,
    ) -> Result<VelocityEstimate, Error> {
        let mut estimate = self.secular_velocity(geodetic, ecef_m)?;
        let (lat, lon) = (geodetic.latitude_deg, geodetic.longitude_deg);
        let enu_mm_yr = self
            .events
            .iter()
            .filter(|event| epoch > event.epoch)
            .filter_map(|event| {
                let relaxation = event.relaxation.as_ref()?;
                let amplitude = relaxation.amplitude.value_at(lat, lon)?;
                Some(amplitude * relaxation.rate(epoch - event.epoch))
            })
            .fold(Vector3::zeros(), |acc, v| acc + v);
        estimate.velocity_m_yr += EnuBasis::at(geodetic).to_ecef(&(enu_mm_yr * MM));
        Ok(estimate)
    }

    /// Epochs of the events crossed between t0 and t1 (see [DeformationEvent::is_crossed]),
    /// sorted in the direction of travel, without duplicates.
    pub fn event_epochs(&self, t0: f64, t1: f64) -> Vec<f64> {
        let mut epochs = self
            .events
            .iter()
            .filter(|event| event.is_crossed(t0, t1))
            .map(|event| event.epoch)
            .collect::<Vec<_>>();
        epochs.dedup();
        if t1 < t0 {
            epochs.reverse();
        }
        epochs
    }

    /// Total coseismic step (ECEF, m) of the events occurring at event_epoch.
    pub fn event_offset(&self, geodetic: &Geodetic, event_epoch: f64) -> Vector3<f64> {
        let enu_mm = self
            .events
            .iter()
            .filter(|event| event.epoch == event_epoch)
            .fold(Vector3::zeros(), |acc, event| {
                acc + event.step_enu_mm(geodetic.latitude_deg, geodetic.longitude_deg)
            });
        EnuBasis::at(geodetic).to_ecef(&(enu_mm * MM))
    }

    /// Accumulated post event displacement (ECEF, m) at epoch.
    pub fn transient(&self, geodetic: &Geodetic, epoch: f64) -> Vector3<f64> {
        let enu_mm = self.events.iter().fold(Vector3::zeros(), |acc, event| {
            acc + event.transient_enu_mm(geodetic.latitude_deg, geodetic.longitude_deg, epoch)
        });
        EnuBasis::at(geodetic).to_ecef(&(enu_mm * MM))
    }

    /// Displacement (ECEF, m) caused by the events only, from t0 to t1:
    /// crossed steps (removed when moving backward) plus relaxation.
    pub fn event_displacement(&self, geodetic: &Geodetic, t0: f64, t1: f64) -> Vector3<f64> {
        let sign = if t1 >= t0 { 1.0 } else { -1.0 };
        let steps = self
            .event_epochs(t0, t1)
            .into_iter()
            .fold(Vector3::zeros(), |acc, epoch| {
                acc + self.event_offset(geodetic, epoch) * sign
            });
        steps + self.transient(geodetic, t1) - self.transient(geodetic, t0)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{ellipsoid::Ellipsoid, geodetic::to_cartesian};

    fn colorado() -> (Geodetic, Vector3<f64>) {
        let geo = Geodetic::new(40.0, 105.0, 1500.0).unwrap();
        let ecef = to_cartesian(&geo, &Ellipsoid::GRS80);
        (geo, ecef)
    }

    fn uniform(name: &str, lat0: f64, lon0: f64, enu: Vector3<f64>) -> VelocityGrid {
        VelocityGrid::new(name, (lat0, lon0), (1.0, 1.0), 3, 3, vec![enu; 9]).unwrap()
    }

    #[test]
    fn rigid_plate() {
        let (geo, ecef) = colorado();
        let model = VelocityModel::default();
        let estimate = model.secular_velocity(&geo, &ecef).unwrap();
        assert_eq!(estimate.source, VelocitySource::RigidPlate(Plate::NorthAmerican));
        assert_eq!(model.velocity_at(&geo, &ecef, 2010.0), Ok(estimate.clone()));

        // deterministic
        for _ in 0..10 {
            assert_eq!(model.secular_velocity(&geo, &ecef), Ok(estimate.clone()));
        }
    }

    #[test]
    fn grid_correction() {
        let (geo, ecef) = colorado();
        let first = uniform("first", 39.0, 104.0, Vector3::new(1.0, 2.0, 0.0));
        let second = uniform("second", 39.0, 104.0, Vector3::new(5.0, 5.0, 0.0));
        let elsewhere = uniform("elsewhere", 10.0, 10.0, Vector3::new(9.0, 9.0, 9.0));
        let model = VelocityModel::default().with_grids(vec![elsewhere, first, second]);

        let rigid = VelocityModel::default()
            .secular_velocity(&geo, &ecef)
            .unwrap();
        let estimate = model.secular_velocity(&geo, &ecef).unwrap();
        assert_eq!(
            estimate.source,
            VelocitySource::Gridded {
                plate: Some(Plate::NorthAmerican),
                grid: "first".to_string(),
            }
        );
        let enu = EnuBasis::at(&geo).to_enu(&(estimate.velocity_m_yr - rigid.velocity_m_yr));
        assert!((enu - Vector3::new(1.0E-3, 2.0E-3, 0.0)).norm() < 1.0E-12);
    }

    #[test]
    fn unmodeled_region() {
        // Paris: no built-in region
        let geo = Geodetic::new(48.8, 357.6, 50.0).unwrap();
        let ecef = to_cartesian(&geo, &Ellipsoid::GRS80);

        let model = VelocityModel::default();
        assert!(matches!(
            model.secular_velocity(&geo, &ecef),
            Err(Error::UnmodeledRegion(_, _))
        ));

        let model = model.with_policy(UnmodeledRegionPolicy::ZeroVelocity);
        let estimate = model.secular_velocity(&geo, &ecef).unwrap();
        assert_eq!(estimate.velocity_m_yr, Vector3::zeros());
        assert_eq!(estimate.source, VelocitySource::Unmodeled);

        let grid = uniform("europe", 48.0, 357.0, Vector3::new(20.0, 15.0, 0.0));
        let estimate = model
            .with_grids(vec![grid])
            .secular_velocity(&geo, &ecef)
            .unwrap();
        assert_eq!(
            estimate.source,
            VelocitySource::Gridded {
                plate: None,
                grid: "europe".to_string()
            }
        );
        assert!((estimate.velocity_m_yr.norm() - 25.0E-3).abs() < 1.0E-12);
    }

    #[test]
    fn events() {
        let (geo, _) = colorado();
        let step = Vector3::new(100.0, 0.0, -10.0);
        let early = DeformationEvent::new("early", 2005.0, uniform("a", 39.0, 104.0, step)).unwrap();
        let late = DeformationEvent::new("late", 2012.0, uniform("b", 39.0, 104.0, step)).unwrap();
        let model = VelocityModel::default().with_events(vec![late, early]);

        assert_eq!(model.events()[0].name, "early");
        assert_eq!(model.event_epochs(2000.0, 2020.0), vec![2005.0, 2012.0]);
        assert_eq!(model.event_epochs(2020.0, 2000.0), vec![2012.0, 2005.0]);
        assert_eq!(model.event_epochs(2005.0, 2010.0), Vec::<f64>::new());
        // a step belongs to its own epoch: reaching it backward keeps it
        assert_eq!(model.event_epochs(2010.0, 2005.0), Vec::<f64>::new());
        assert_eq!(model.event_epochs(2010.0, 2004.0), vec![2005.0]);

        let forward = model.event_displacement(&geo, 2000.0, 2020.0);
        let backward = model.event_displacement(&geo, 2020.0, 2000.0);
        assert!((forward + backward).norm() < 1.0E-12);
        let enu = EnuBasis::at(&geo).to_enu(&forward);
        assert!((enu - Vector3::new(0.2, 0.0, -0.02)).norm() < 1.0E-12);
    }

    #[test]
    fn relaxation_rate() {
        let (geo, ecef) = colorado();
        let amplitude = uniform("amp", 39.0, 104.0, Vector3::new(10.0, 0.0, 0.0));
        let relaxation = Relaxation::new(RelaxationKind::Exponential, 1.0, amplitude).unwrap();
        let event = DeformationEvent::new("quake", 2010.0, uniform("co", 39.0, 104.0, Vector3::zeros()))
            .unwrap()
            .with_relaxation(relaxation);
        let model = VelocityModel::default().with_events(vec![event]);

        let secular = model.secular_velocity(&geo, &ecef).unwrap();
        let instantaneous = model.velocity_at(&geo, &ecef, 2011.0).unwrap();
        let enu = EnuBasis::at(&geo).to_enu(&(instantaneous.velocity_m_yr - secular.velocity_m_yr));
        assert!((enu[0] - 10.0E-3 * (-1.0_f64).exp()).abs() < 1.0E-12);

        // rate is the derivative of the accumulated displacement
        let h = 1.0E-4;
        let d0 = model.transient(&geo, 2011.0 - h);
        let d1 = model.transient(&geo, 2011.0 + h);
        let numerical = (d1 - d0) / (2.0 * h);
        assert!((numerical - (instantaneous.velocity_m_yr - secular.velocity_m_yr)).norm() < 1.0E-9);
    }
}
