/// GRS80 ellipsoid semi-major axis (m)
pub const GRS80_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// GRS80 ellipsoid inverse flattening
pub const GRS80_INV_FLATTENING: f64 = 298.257_222_101;

/// WGS84 ellipsoid semi-major axis (m)
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS84 ellipsoid inverse flattening
pub const WGS84_INV_FLATTENING: f64 = 298.257_223_563;

/// WGS72 ellipsoid semi-major axis (m)
pub const WGS72_SEMI_MAJOR_AXIS_M: f64 = 6_378_135.0;

/// WGS72 ellipsoid inverse flattening
pub const WGS72_INV_FLATTENING: f64 = 298.26;

/// Milliarcseconds to radians
pub const MAS_TO_RAD: f64 = std::f64::consts::PI / 180.0 / 3600.0 / 1000.0;

/// Parts per billion to unitless scale
pub const PPB: f64 = 1.0E-9;

/// Millimeters to meters
pub const MM: f64 = 1.0E-3;

/// Convergence tolerance of the Cartesian to geodetic inversion (rad).
/// 1E-12 rad is about 6 µm on the Earth surface.
pub const GEODETIC_TOLERANCE_RAD: f64 = 1.0E-12;

/// Maximal number of iterations of the Cartesian to geodetic inversion.
pub const GEODETIC_MAX_ITERATIONS: usize = 16;

/// Earliest epoch the crustal motion model accepts (decimal year).
pub const MIN_EPOCH: f64 = 1906.0;

/// Longest point name the batch interface accepts.
pub const MAX_POINT_NAME_LEN: usize = 24;
