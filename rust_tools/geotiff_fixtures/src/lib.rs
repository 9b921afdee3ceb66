// Library exports for testing and reuse

pub mod builder;
pub mod cli;
pub mod crs;
pub mod error;
pub mod fixtures;
pub mod io;
pub mod layout;
pub mod mask;
pub mod overview;
pub mod rules;
pub mod spec;

// Re-export commonly used types
pub use builder::{build_raster, BuiltRaster};
pub use crs::{Crs, Georeference};
pub use error::{BuildStep, ErrorKind, FixtureError, Result};
pub use fixtures::Fixture;
pub use layout::{Compression, StorageLayout};
pub use mask::MaskPlan;
pub use overview::{OverviewPlacement, OverviewPlan, Resampling};
pub use rules::{BandValueRule, ConstantPerBand, LatLonGrid, Sequential};
pub use spec::RasterSpec;
