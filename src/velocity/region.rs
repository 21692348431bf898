use itertools::Itertools;

use crate::{error::Error, velocity::Plate};

/// North American plate, coarse outline: (latitude °N, longitude °E).
const NORTH_AMERICAN_OUTLINE: [(f64, f64); 26] = [
    (85.0, 170.0),
    (85.0, -150.0),
    (85.0, -90.0),
    (85.0, -30.0),
    (85.0, -10.0),
    (66.0, -18.0),
    (50.0, -29.0),
    (35.0, -36.0),
    (20.0, -46.0),
    (15.0, -59.0),
    (19.0, -65.0),
    (20.0, -75.0),
    (19.0, -86.0),
    (15.0, -94.0),
    (19.0, -106.0),
    (23.0, -108.5),
    (32.0, -115.0),
    (36.0, -120.8),
    (40.4, -124.5),
    (49.0, -128.0),
    (55.0, -134.0),
    (58.0, -137.0),
    (56.0, -155.0),
    (51.0, -170.0),
    (51.0, 170.0),
    (62.0, 170.0),
];

/// Pacific plate, coarse outline: (latitude °N, longitude °E).
const PACIFIC_OUTLINE: [(f64, f64); 28] = [
    (50.0, 160.0),
    (51.0, 170.0),
    (51.0, -170.0),
    (56.0, -155.0),
    (58.0, -137.0),
    (55.0, -134.0),
    (49.0, -128.0),
    (40.4, -124.5),
    (36.0, -120.8),
    (32.0, -115.0),
    (23.0, -108.5),
    (19.0, -106.0),
    (10.0, -104.0),
    (0.0, -102.0),
    (-20.0, -113.0),
    (-35.0, -110.0),
    (-55.0, -120.0),
    (-62.0, -160.0),
    (-65.0, 170.0),
    (-45.0, 168.0),
    (-30.0, -176.0),
    (-15.0, -173.0),
    (-10.0, 165.0),
    (0.0, 150.0),
    (10.0, 140.0),
    (30.0, 142.0),
    (35.0, 142.0),
    (45.0, 150.0),
];

/// Polygon assigned to a [Plate].
/// Vertices are (latitude °N, longitude °W), edges may cross the 0°/360° meridian.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateRegion {
    /// Readable name
    pub name: String,
    /// Plate this region belongs to
    pub plate: Plate,
    /// Vertices, longitudes unwrapped so consecutive vertices
    /// are never more than 180° apart.
    vertices: Vec<(f64, f64)>,
}

impl PlateRegion {
    /// Builds a new [PlateRegion] from (latitude °N, longitude °W) vertices.
    pub fn new(name: &str, plate: Plate, vertices: &[(f64, f64)]) -> Result<Self, Error> {
        if vertices.len() < 3 {
            return Err(Error::Dataset(format!(
                "region \"{}\" needs at least 3 vertices",
                name
            )));
        }

        if let Some((lat, lon)) = vertices
            .iter()
            .find(|(lat, lon)| !(-90.0..=90.0).contains(lat) || !lon.is_finite())
        {
            return Err(Error::Dataset(format!(
                "region \"{}\": invalid vertex ({}, {})",
                name, lat, lon
            )));
        }
        Ok(Self::unwrapped(name, plate, vertices.iter().copied()))
    }

    fn unwrapped<I: Iterator<Item = (f64, f64)>>(name: &str, plate: Plate, vertices: I) -> Self {
        let mut unwrapped: Vec<(f64, f64)> = Vec::new();
        for (lat, mut lon) in vertices {
            if let Some(&(_, prev)) = unwrapped.last() {
                while lon - prev > 180.0 {
                    lon -= 360.0;
                }
                while lon - prev < -180.0 {
                    lon += 360.0;
                }
            }
            unwrapped.push((lat, lon));
        }
        Self {
            name: name.to_string(),
            plate,
            vertices: unwrapped,
        }
    }

    fn from_east_outline(name: &str, plate: Plate, outline: &[(f64, f64)]) -> Self {
        Self::unwrapped(
            name,
            plate,
            outline.iter().map(|(lat, lon_east)| (*lat, -lon_east)),
        )
    }

    /// Unwrapped vertices (latitude °N, longitude °W).
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// True if this region contains the (latitude °N, longitude °W) location.
    pub fn contains(&self, latitude_deg: f64, longitude_west_deg: f64) -> bool {
        [-360.0, 0.0, 360.0]
            .iter()
            .any(|offset| self.crossings(latitude_deg, longitude_west_deg + offset) % 2 == 1)
    }

    /// Number of polygon edges a meridian ray, leaving the point, crosses.
    fn crossings(&self, lat: f64, lon: f64) -> usize {
        self.vertices
            .iter()
            .circular_tuple_windows()
            .filter(|((lat_a, lon_a), (lat_b, lon_b))| {
                (*lat_a > lat) != (*lat_b > lat)
                    && lon < (lon_b - lon_a) * (lat - lat_a) / (lat_b - lat_a) + lon_a
            })
            .count()
    }
}

/// Built-in coarse regions, in lookup order.
pub fn default_regions() -> Vec<PlateRegion> {
    vec![
        PlateRegion::from_east_outline(
            "North America",
            Plate::NorthAmerican,
            &NORTH_AMERICAN_OUTLINE,
        ),
        PlateRegion::from_east_outline("Pacific", Plate::Pacific, &PACIFIC_OUTLINE),
    ]
}

/// Returns the [Plate] of the first region containing this location.
pub fn locate(regions: &[PlateRegion], latitude_deg: f64, longitude_west_deg: f64) -> Option<Plate> {
    regions
        .iter()
        .find(|region| region.contains(latitude_deg, longitude_west_deg))
        .map(|region| region.plate)
}
