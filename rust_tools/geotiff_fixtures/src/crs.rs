use crate::error::{FixtureError, Result};
use gdal::spatial_ref::SpatialRef;
use log::debug;

/// Coordinate reference system, identified by EPSG code only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crs(pub u32);

impl Crs {
    /// WGS84 geographic (lat/lon degrees)
    pub const WGS84: Crs = Crs(4326);
    /// Web Mercator
    pub const WEB_MERCATOR: Crs = Crs(3857);

    pub fn spatial_ref(&self) -> Result<SpatialRef> {
        debug!("Resolving EPSG:{}", self.0);
        Ok(SpatialRef::from_epsg(self.0)?)
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// North-up georeferencing: row 0 is the northernmost row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Georeference {
    pub west: f64,
    pub north: f64,
    pub pixel_size_x: f64,
    pub pixel_size_y: f64,
    pub crs: Crs,
}

impl Georeference {
    /// Same argument order as `rasterio.transform.from_origin`.
    pub fn from_origin(west: f64, north: f64, pixel_size_x: f64, pixel_size_y: f64, crs: Crs) -> Self {
        Self {
            west,
            north,
            pixel_size_x,
            pixel_size_y,
            crs,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(self.pixel_size_x) || !ok(self.pixel_size_y) {
            return Err(FixtureError::InvalidPixelSize(
                self.pixel_size_x,
                self.pixel_size_y,
            ));
        }
        Ok(())
    }

    /// GDAL geotransform: `[west, px, 0, north, 0, -py]`
    pub fn geo_transform(&self) -> [f64; 6] {
        [
            self.west,
            self.pixel_size_x,
            0.0,
            self.north,
            0.0,
            -self.pixel_size_y,
        ]
    }

    /// World coordinates `(x, y)` of the centre of pixel (row, col).
    /// For a geographic CRS this is `(lon, lat)`.
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.west + (col as f64 + 0.5) * self.pixel_size_x,
            self.north - (row as f64 + 0.5) * self.pixel_size_y,
        )
    }
}
