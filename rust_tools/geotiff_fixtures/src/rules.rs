use crate::crs::Georeference;
use crate::spec::RasterSpec;
use log::debug;
use ndarray::Array2;

/// Pixel value rule. `band` is 0-based; the rule returns the stored
/// `i32` directly, so any rounding happens inside the rule.
pub trait BandValueRule {
    fn value(&self, band: usize, row: usize, col: usize) -> i32;

    /// Number of bands the rule knows how to fill, if bounded.
    fn band_limit(&self) -> Option<usize> {
        None
    }

    /// Whether the grid the rule was derived from is the raster's grid.
    fn matches_grid(&self, _width: usize, _georef: &Georeference) -> bool {
        true
    }
}

impl<F> BandValueRule for F
where
    F: Fn(usize, usize, usize) -> i32,
{
    fn value(&self, band: usize, row: usize, col: usize) -> i32 {
        self(band, row, col)
    }
}

/// Every pixel of band `b` holds `b + 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantPerBand;

impl BandValueRule for ConstantPerBand {
    fn value(&self, band: usize, _row: usize, _col: usize) -> i32 {
        (band + 1) as i32
    }
}

/// Row-major pixel index, `row * width + col`, identical in every band.
#[derive(Debug, Clone, Copy)]
pub struct Sequential {
    pub width: usize,
}

impl Sequential {
    pub fn for_spec(spec: &RasterSpec) -> Self {
        Self { width: spec.width }
    }
}

impl BandValueRule for Sequential {
    fn value(&self, _band: usize, row: usize, col: usize) -> i32 {
        (row * self.width + col) as i32
    }

    fn matches_grid(&self, width: usize, _georef: &Georeference) -> bool {
        self.width == width
    }
}

/// Band 0: floored latitude of the pixel centre. Band 1: floored longitude.
#[derive(Debug, Clone, Copy)]
pub struct LatLonGrid {
    pub georef: Georeference,
}

impl LatLonGrid {
    pub fn for_spec(spec: &RasterSpec) -> Self {
        Self {
            georef: spec.georeference,
        }
    }
}

impl BandValueRule for LatLonGrid {
    fn value(&self, band: usize, row: usize, col: usize) -> i32 {
        let (lon, lat) = self.georef.pixel_center(row, col);
        match band {
            0 => lat.floor() as i32,
            _ => lon.floor() as i32,
        }
    }

    fn band_limit(&self) -> Option<usize> {
        Some(2)
    }

    fn matches_grid(&self, _width: usize, georef: &Georeference) -> bool {
        self.georef == *georef
    }
}

/// Evaluate `rule` for every pixel of one band.
pub fn materialize_band(rule: &dyn BandValueRule, band: usize, width: usize, height: usize) -> Array2<i32> {
    Array2::from_shape_fn((height, width), |(row, col)| rule.value(band, row, col))
}

/// One `height x width` array per band, in band order.
pub fn materialize_bands(
    rule: &dyn BandValueRule,
    band_count: usize,
    width: usize,
    height: usize,
) -> Vec<Array2<i32>> {
    (0..band_count)
        .map(|band| {
            debug!("Materializing band {}", band + 1);
            materialize_band(rule, band, width, height)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;

    #[test]
    fn test_constant_per_band() {
        let bands = materialize_bands(&ConstantPerBand, 100, 50, 50);
        assert_eq!(bands.len(), 100);
        for (i, band) in bands.iter().enumerate() {
            assert_eq!(band.dim(), (50, 50));
            assert!(band.iter().all(|&v| v == i as i32 + 1));
        }
    }

    #[test]
    fn test_sequential() {
        let band = materialize_band(&Sequential { width: 256 }, 0, 256, 256);
        assert_eq!(band[[0, 0]], 0);
        assert_eq!(band[[0, 255]], 255);
        assert_eq!(band[[1, 0]], 256);
        assert_eq!(band[[255, 255]], 256 * 256 - 1);
    }

    #[test]
    fn test_lat_lon_grid() {
        let rule = LatLonGrid {
            georef: Georeference::from_origin(0.0, 50.0, 1.0, 1.0, Crs::WGS84),
        };
        let bands = materialize_bands(&rule, 2, 50, 50);
        for row in 0..50 {
            for col in 0..50 {
                assert_eq!(bands[0][[row, col]], (50.0 - (row as f64 + 0.5)).floor() as i32);
                assert_eq!(bands[1][[row, col]], (col as f64 + 0.5).floor() as i32);
            }
        }
        assert_eq!(bands[0][[0, 7]], 49);
        assert_eq!(bands[0][[49, 7]], 0);
        assert_eq!(bands[1][[12, 49]], 49);
        assert_eq!(rule.band_limit(), Some(2));
    }

    #[test]
    fn test_lat_lon_floors_negative_coordinates() {
        let rule = LatLonGrid {
            georef: Georeference::from_origin(-10.0, 0.0, 1.0, 1.0, Crs::WGS84),
        };
        // centre at lat -0.5, lon -9.5
        assert_eq!(rule.value(0, 0, 0), -1);
        assert_eq!(rule.value(1, 0, 0), -10);
    }

    #[test]
    fn test_closure_rule() {
        let rule = |band: usize, row: usize, col: usize| (band * 100 + row * 10 + col) as i32;
        let band = materialize_band(&rule, 2, 3, 2);
        assert_eq!(band[[1, 2]], 212);
        assert_eq!(rule.band_limit(), None);
    }

    #[test]
    fn test_rules_built_from_spec_match_grid() {
        let georef = Georeference::from_origin(0.0, 256.0, 1.0, 1.0, Crs::WEB_MERCATOR);
        let spec = RasterSpec::new(256, 128, 1, georef);

        let sequential = Sequential::for_spec(&spec);
        assert_eq!(sequential.width, 256);
        assert!(sequential.matches_grid(256, &georef));
        assert!(!sequential.matches_grid(1000, &georef));

        let grid = LatLonGrid::for_spec(&spec);
        assert!(grid.matches_grid(256, &georef));
        let shifted = Georeference::from_origin(0.0, 50.0, 1.0, 1.0, Crs::WGS84);
        assert!(!grid.matches_grid(256, &shifted));

        assert!(ConstantPerBand.matches_grid(7, &shifted));
    }
}
