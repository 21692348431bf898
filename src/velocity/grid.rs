use nalgebra::Vector3;

use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid interpolation scheme
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Interpolation {
    /// Bilinear interpolation over the enclosing cell
    #[default]
    Bilinear,
    /// Value of the nearest node
    NearestNeighbor,
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bilinear => write!(f, "bilinear"),
            Self::NearestNeighbor => write!(f, "nearest"),
        }
    }
}

impl std::str::FromStr for Interpolation {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bilinear" => Ok(Self::Bilinear),
            "nearest" | "nearest_neighbor" | "nearestneighbor" => Ok(Self::NearestNeighbor),
            other => Err(Error::Dataset(format!("unknown interpolation \"{}\"", other))),
        }
    }
}

/// Regular latitude / longitude mesh of (east, north, up) values.
/// Velocity grids store mm/yr, displacement grids store mm.
///
/// Row 0 is the southernmost latitude, column 0 the first longitude
/// (positive west), columns increase westward.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGrid {
    /// Readable name
    pub name: String,
    /// Latitude of the first row (°N)
    origin_latitude_deg: f64,
    /// Longitude of the first column (°W)
    origin_longitude_deg: f64,
    /// Row spacing (°)
    latitude_spacing_deg: f64,
    /// Column spacing (°)
    longitude_spacing_deg: f64,
    rows: usize,
    columns: usize,
    /// Interpolation scheme
    pub interpolation: Interpolation,
    /// Distance (°) outside coverage within which the edge values still apply.
    pub margin_deg: f64,
    /// Row major (east, north, up) nodes. Missing nodes are NaN.
    values: Vec<Vector3<f64>>,
}

/// Same mesh, holding (east, north, up) displacements in mm.
pub type DisplacementGrid = VelocityGrid;

impl VelocityGrid {
    /// Builds a new [VelocityGrid].
    /// - origin: (latitude °N, longitude °W) of node (0, 0)
    /// - spacing: (latitude, longitude) steps in degrees
    /// - values: rows x columns nodes, row major
    pub fn new(
        name: &str,
        origin: (f64, f64),
        spacing: (f64, f64),
        rows: usize,
        columns: usize,
        values: Vec<Vector3<f64>>,
    ) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidGrid(name.to_string(), reason);

        if rows < 2 || columns < 2 {
            return Err(invalid(format!(
                "{}x{} mesh: at least 2x2 nodes required",
                rows, columns
            )));
        }
        if values.len() != rows * columns {
            return Err(invalid(format!(
                "{} values for a {}x{} mesh",
                values.len(),
                rows,
                columns
            )));
        }
        if !(spacing.0.is_finite() && spacing.0 > 0.0 && spacing.1.is_finite() && spacing.1 > 0.0) {
            return Err(invalid(format!("invalid spacing {:?}", spacing)));
        }
        if !origin.0.is_finite() || !origin.1.is_finite() {
            return Err(invalid(format!("invalid origin {:?}", origin)));
        }
        let northmost = origin.0 + spacing.0 * (rows - 1) as f64;
        if origin.0 < -90.0 || northmost > 90.0 {
            return Err(invalid(format!(
                "latitudes {}..{} out of [-90, 90]",
                origin.0, northmost
            )));
        }
        if spacing.1 * (columns - 1) as f64 > 360.0 {
            return Err(invalid("longitude extent exceeds 360°".to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            origin_latitude_deg: origin.0,
            origin_longitude_deg: origin.1,
            latitude_spacing_deg: spacing.0,
            longitude_spacing_deg: spacing.1,
            rows,
            columns,
            values,
            interpolation: Interpolation::default(),
            margin_deg: 0.0,
        })
    }

    /// Copies [Self] with given [Interpolation] scheme.
    pub fn with_interpolation(&self, interpolation: Interpolation) -> Self {
        let mut s = self.clone();
        s.interpolation = interpolation;
        s
    }

    /// Copies [Self] with given edge margin (°).
    pub fn with_margin(&self, margin_deg: f64) -> Self {
        let mut s = self.clone();
        s.margin_deg = margin_deg.max(0.0);
        s
    }

    /// (latitude °N, longitude °W) of node (0, 0)
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_latitude_deg, self.origin_longitude_deg)
    }

    /// (latitude, longitude) steps in degrees
    pub fn spacing(&self) -> (f64, f64) {
        (self.latitude_spacing_deg, self.longitude_spacing_deg)
    }

    /// Number of rows (at least 2)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (at least 2)
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Node value, NaN when missing. None outside the mesh.
    pub fn node(&self, row: usize, column: usize) -> Option<Vector3<f64>> {
        if row < self.rows && column < self.columns {
            self.values.get(row * self.columns + column).copied()
        } else {
            None
        }
    }

    /// Node value, None when missing or outside the mesh.
    fn valid_node(&self, row: usize, column: usize) -> Option<Vector3<f64>> {
        self.node(row, column).filter(Self::is_valid)
    }

    fn is_valid(value: &Vector3<f64>) -> bool {
        value.iter().all(|v| v.is_finite())
    }

    /// Fractional (row, column) coordinates of a location, clamped to the mesh
    /// when it lies within the margin. None beyond the margin.
    fn mesh_coordinates(&self, latitude_deg: f64, longitude_west_deg: f64) -> Option<(f64, f64)> {
        let last_row = (self.rows - 1) as f64;
        let last_column = (self.columns - 1) as f64;
        let outside = |x: f64, last: f64| (-x).max(x - last).max(0.0);

        let row = (latitude_deg - self.origin_latitude_deg) / self.latitude_spacing_deg;

        let column = [-360.0, 0.0, 360.0]
            .iter()
            .map(|offset| {
                (longitude_west_deg + offset - self.origin_longitude_deg)
                    / self.longitude_spacing_deg
            })
            .min_by(|a, b| outside(*a, last_column).total_cmp(&outside(*b, last_column)))?;

        if outside(row, last_row) * self.latitude_spacing_deg > self.margin_deg
            || outside(column, last_column) * self.longitude_spacing_deg > self.margin_deg
        {
            return None;
        }

        Some((row.clamp(0.0, last_row), column.clamp(0.0, last_column)))
    }

    /// True if this grid applies at given location (coverage or margin).
    pub fn covers(&self, latitude_deg: f64, longitude_west_deg: f64) -> bool {
        self.mesh_coordinates(latitude_deg, longitude_west_deg)
            .is_some()
    }

    /// Interpolated (east, north, up) value at given location, in grid units.
    /// None when not covered, or when the enclosing cell has no valid node.
    pub fn value_at(&self, latitude_deg: f64, longitude_west_deg: f64) -> Option<Vector3<f64>> {
        let (row, column) = self.mesh_coordinates(latitude_deg, longitude_west_deg)?;

        let i = (row.floor() as usize).min(self.rows - 2);
        let j = (column.floor() as usize).min(self.columns - 2);
        let (fr, fc) = (row - i as f64, column - j as f64);

        let corners = [
            (i, j, (1.0 - fr) * (1.0 - fc), fr, fc),
            (i, j + 1, (1.0 - fr) * fc, fr, fc - 1.0),
            (i + 1, j, fr * (1.0 - fc), fr - 1.0, fc),
            (i + 1, j + 1, fr * fc, fr - 1.0, fc - 1.0),
        ];

        if self.interpolation == Interpolation::Bilinear {
            let weighted = corners
                .iter()
                .map(|(r, c, w, _, _)| self.valid_node(*r, *c).map(|value| value * *w))
                .sum::<Option<Vector3<f64>>>();
            if weighted.is_some() {
                return weighted;
            }
        }

        corners
            .iter()
            .filter_map(|(r, c, _, dr, dc)| {
                self.valid_node(*r, *c)
                    .map(|value| (value, dr.powi(2) + dc.powi(2)))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(value, _)| value)
    }
}
