#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod batch;
mod constants;
mod engine;
mod error;
mod position;

// public modules
pub mod cfg;
pub mod ellipsoid;
pub mod epoch;
pub mod frame;
pub mod geodetic;
pub mod helmert;
pub mod propagator;
pub mod velocity;

#[cfg(feature = "serde")]
#[cfg_attr(docrs, doc(cfg(feature = "serde")))]
pub mod dataset;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::batch::{
        BatchReport, BatchRequest, NamedPoint, NamedVelocity, PointFailure, PointReport, Stage,
        VelocityBatchRequest,
    };
    pub use crate::cfg::{Config, UnmodeledRegionPolicy};
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::engine::{Displacement, Engine, PredictedVelocity};
    pub use crate::error::{Error, Transformed, Warning};
    pub use crate::frame::{Catalog, Datum, FrameId, ReferenceFrame};
    pub use crate::geodetic::Geodetic;
    pub use crate::helmert::{FrameTransformer, HelmertParams, TransformPath, TransformTable};
    pub use crate::position::{Position, Velocity};
    pub use crate::velocity::{
        DeformationEvent, Interpolation, Plate, PlateModel, VelocityGrid, VelocityModel,
        VelocitySource,
    };

    #[cfg(feature = "serde")]
    pub use crate::dataset::Dataset;

    // re-export
    pub use hifitime::{Duration, Epoch};
    pub use nalgebra::Vector3;
}

// pub export
pub use error::Error;
