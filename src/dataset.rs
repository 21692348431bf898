//! Versioned crustal motion datasets (JSON)
use std::{path::Path, str::FromStr};

use log::info;
use nalgebra::Vector3;
use serde::Deserialize;

use crate::{
    engine::Engine,
    error::Error,
    velocity::{
        default_regions, DeformationEvent, EulerPole, Interpolation, Plate, PlateModel,
        PlateRegion, Relaxation, RelaxationKind, VelocityGrid, VelocityModel,
    },
};

#[derive(Debug, Deserialize)]
struct PoleRecord {
    plate: String,
    omega_x_mas_yr: f64,
    omega_y_mas_yr: f64,
    omega_z_mas_yr: f64,
}

#[derive(Debug, Deserialize)]
struct RegionRecord {
    name: String,
    plate: String,
    /// (latitude °N, longitude °W)
    vertices: Vec<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct GridRecord {
    name: String,
    /// (latitude °N, longitude °W) of the first node
    origin: (f64, f64),
    /// (latitude, longitude) steps (°)
    spacing: (f64, f64),
    rows: usize,
    columns: usize,
    /// Row major (east, north, up) nodes, null when missing
    values: Vec<Option<(f64, f64, f64)>>,
    #[serde(default)]
    interpolation: Option<String>,
    #[serde(default)]
    margin_deg: f64,
}

#[derive(Debug, Deserialize)]
struct RelaxationRecord {
    kind: String,
    time_constant_yr: f64,
    amplitude: GridRecord,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    name: String,
    epoch: f64,
    coseismic: GridRecord,
    #[serde(default)]
    relaxation: Option<RelaxationRecord>,
}

#[derive(Debug, Deserialize)]
struct DatasetRecord {
    version: String,
    #[serde(default)]
    poles: Vec<PoleRecord>,
    #[serde(default)]
    origin_rate_bias_mm_yr: Option<(f64, f64, f64)>,
    #[serde(default)]
    replace_regions: bool,
    #[serde(default)]
    regions: Vec<RegionRecord>,
    #[serde(default)]
    grids: Vec<GridRecord>,
    #[serde(default)]
    events: Vec<EventRecord>,
}

impl GridRecord {
    fn build(self) -> Result<VelocityGrid, Error> {
        let values = self
            .values
            .into_iter()
            .map(|node| match node {
                Some((e, n, u)) => Vector3::new(e, n, u),
                None => Vector3::new(f64::NAN, f64::NAN, f64::NAN),
            })
            .collect();
        let grid = VelocityGrid::new(
            &self.name,
            self.origin,
            self.spacing,
            self.rows,
            self.columns,
            values,
        )?;
        let interpolation = match self.interpolation {
            Some(interpolation) => Interpolation::from_str(&interpolation)?,
            None => Interpolation::default(),
        };
        Ok(grid
            .with_interpolation(interpolation)
            .with_margin(self.margin_deg))
    }
}

/// Validated [Dataset]: plate poles, plate regions, velocity grids
/// and deformation events, identified by a version.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Dataset version
    pub version: String,
    /// Plate motion model, built-in poles overridden by the dataset
    pub plates: PlateModel,
    /// Plate regions, in lookup order
    pub regions: Vec<PlateRegion>,
    /// Velocity grids, in lookup order
    pub grids: Vec<VelocityGrid>,
    /// Deformation events
    pub events: Vec<DeformationEvent>,
}

impl Dataset {
    /// Parses and validates a JSON [Dataset].
    pub fn from_json_str(content: &str) -> Result<Self, Error> {
        let record: DatasetRecord =
            serde_json::from_str(content).map_err(|e| Error::Dataset(e.to_string()))?;

        let mut plates = PlateModel::default();
        for pole in record.poles.into_iter() {
            let plate = Plate::from_str(&pole.plate)?;
            plates = plates.with_pole(
                plate,
                EulerPole::new(pole.omega_x_mas_yr, pole.omega_y_mas_yr, pole.omega_z_mas_yr),
            );
        }
        if let Some((x, y, z)) = record.origin_rate_bias_mm_yr {
            plates = plates.with_origin_rate_bias(Vector3::new(x, y, z));
        }

        let mut regions = record
            .regions
            .into_iter()
            .map(|region| {
                let plate = Plate::from_str(&region.plate)?;
                PlateRegion::new(&region.name, plate, &region.vertices)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        if !record.replace_regions {
            regions.extend(default_regions());
        }

        let grids = record
            .grids
            .into_iter()
            .map(GridRecord::build)
            .collect::<Result<Vec<_>, Error>>()?;

        let events = record
            .events
            .into_iter()
            .map(|event| {
                let mut built = DeformationEvent::new(&event.name, event.epoch, event.coseismic.build()?)?;
                if let Some(relaxation) = event.relaxation {
                    let kind = RelaxationKind::from_str(&relaxation.kind)?;
                    built = built.with_relaxation(Relaxation::new(
                        kind,
                        relaxation.time_constant_yr,
                        relaxation.amplitude.build()?,
                    )?);
                }
                Ok(built)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        info!(
            "dataset {}: {} region(s), {} grid(s), {} event(s)",
            record.version,
            regions.len(),
            grids.len(),
            events.len()
        );

        Ok(Self {
            version: record.version,
            plates,
            regions,
            grids,
            events,
        })
    }

    /// Reads and validates a JSON [Dataset] file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Dataset(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_json_str(&content)
    }

    /// [VelocityModel] described by this [Dataset].
    pub fn velocity_model(&self) -> VelocityModel {
        VelocityModel::new(self.plates.clone(), self.regions.clone())
            .with_grids(self.grids.clone())
            .with_events(self.events.clone())
    }
}

impl Engine {
    /// Copies [Self], replacing the velocity model by the one this [Dataset] describes.
    pub fn with_dataset(&self, dataset: &Dataset) -> Self {
        self.with_velocity_model(dataset.velocity_model())
    }
}
