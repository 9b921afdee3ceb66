//! The fixed fixture catalog. File names and every raster parameter are
//! constants; only the output directory varies.

use crate::builder::{build_raster, BuiltRaster};
use crate::crs::{Crs, Georeference};
use crate::error::Result;
use crate::layout::{Compression, StorageLayout};
use crate::mask::MaskPlan;
use crate::overview::OverviewPlan;
use crate::rules::{BandValueRule, ConstantPerBand, LatLonGrid, Sequential};
use crate::spec::RasterSpec;
use clap::ValueEnum;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Fixture {
    /// 100 constant bands, band k holds k
    #[value(name = "bands-100")]
    Bands100,
    /// Band 1 latitude, band 2 longitude of each pixel centre
    LatLonGrid,
    /// Single band with the right half masked out
    MaskedImage,
    /// Tiled, deflate, overviews 2/4/8 inside the file
    InternalOverviews,
    /// Overviews 2/4/8/16 in an .ovr sidecar
    ExternalOverviews,
}

/// 50x50 one-degree grid covering lon 0..50, lat 0..50
fn wgs84_grid() -> Georeference {
    Georeference::from_origin(0.0, 50.0, 1.0, 1.0, Crs::WGS84)
}

impl Fixture {
    pub const ALL: [Fixture; 5] = [
        Fixture::Bands100,
        Fixture::LatLonGrid,
        Fixture::MaskedImage,
        Fixture::InternalOverviews,
        Fixture::ExternalOverviews,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Fixture::Bands100 => "bands_100.tif",
            Fixture::LatLonGrid => "lat_lon_grid.tif",
            Fixture::MaskedImage => "masked_image.tif",
            Fixture::InternalOverviews => "internal_overviews.tif",
            Fixture::ExternalOverviews => "example.tif",
        }
    }

    pub fn spec(&self) -> RasterSpec {
        match self {
            Fixture::Bands100 => RasterSpec::new(50, 50, 100, wgs84_grid()),
            Fixture::LatLonGrid => RasterSpec::new(50, 50, 2, wgs84_grid()),
            Fixture::MaskedImage => RasterSpec::new(50, 50, 1, wgs84_grid())
                .with_compression(Compression::None)
                .with_mask(MaskPlan::left_columns_valid(50, 50, 25)),
            Fixture::InternalOverviews => RasterSpec::new(
                256,
                256,
                1,
                Georeference::from_origin(0.0, 256.0, 1.0, 1.0, Crs::WEB_MERCATOR),
            )
            .with_layout(StorageLayout::Tiled { block_size: 256 })
            .with_compression(Compression::Deflate)
            .with_overviews(OverviewPlan::internal(vec![2, 4, 8])),
            Fixture::ExternalOverviews => RasterSpec::new(
                1000,
                1000,
                1,
                Georeference::from_origin(0.0, 0.0, 1.0, 1.0, Crs::WEB_MERCATOR),
            )
            .with_overviews(OverviewPlan::external(vec![2, 4, 8, 16])),
        }
    }

    /// Pixel rule for this fixture, derived from its `spec()`.
    pub fn rule(&self, spec: &RasterSpec) -> Box<dyn BandValueRule> {
        match self {
            Fixture::Bands100 | Fixture::MaskedImage => Box::new(ConstantPerBand),
            Fixture::LatLonGrid => Box::new(LatLonGrid::for_spec(spec)),
            Fixture::InternalOverviews | Fixture::ExternalOverviews => Box::new(Sequential::for_spec(spec)),
        }
    }

    /// Build this fixture into `out_dir`.
    pub fn build(&self, out_dir: &Path) -> Result<BuiltRaster> {
        let path = out_dir.join(self.file_name());
        let spec = self.spec();
        let rule = self.rule(&spec);
        build_raster(&path, &spec, rule.as_ref())
    }
}
