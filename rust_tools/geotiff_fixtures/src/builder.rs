//! Fixture Builder: validate, materialize, write, mask, overviews, tag, close.
//!
//! Any failure aborts the build. The file at `path` may then exist in a
//! partial state and should not be trusted; it is not removed here.

use crate::error::{FixtureError, Result};
use crate::io::RasterWriter;
use crate::overview::{
    build_overviews, tag_provenance, ConfigOptionGuard, OverviewPlacement, INTERNAL_OVERVIEWS_OPTION,
    USE_OVR_OPTION,
};
use crate::rules::{materialize_bands, BandValueRule};
use crate::spec::RasterSpec;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// What a successful build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltRaster {
    pub path: PathBuf,
    pub band_count: usize,
    /// Overview factors actually applied, empty when none were requested
    pub overview_factors: Vec<u32>,
    /// `<path>.ovr` when overviews were stored externally
    pub overview_sidecar: Option<PathBuf>,
}

/// Sidecar GDAL writes external GTiff overviews to
pub fn overview_sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".ovr");
    PathBuf::from(name)
}

/// The sidecar of `path`, or an error if GDAL did not write one.
pub fn confirm_sidecar(path: &Path) -> Result<PathBuf> {
    let sidecar = overview_sidecar_path(path);
    if !sidecar.is_file() {
        return Err(FixtureError::MissingOverviewSidecar(sidecar));
    }
    Ok(sidecar)
}

/// Materialize `spec` at `path`, filling band pixels from `rule`.
pub fn build_raster(path: &Path, spec: &RasterSpec, rule: &dyn BandValueRule) -> Result<BuiltRaster> {
    spec.validate(rule)?;

    info!(
        "Building {} ({}x{}, {} bands, {})",
        path.display(),
        spec.width,
        spec.height,
        spec.band_count,
        spec.georeference.crs
    );

    let bands = materialize_bands(rule, spec.band_count, spec.width, spec.height);

    let mut writer = RasterWriter::create(path, spec)?;
    for (i, band) in bands.iter().enumerate() {
        writer.write_band(i + 1, band)?;
    }

    if let Some(mask) = &spec.mask {
        writer.write_mask(&mask.encode())?;
    }

    let mut overview_factors = Vec::new();
    let mut external = false;

    match &spec.overviews {
        None => writer.close()?,
        Some(plan) => {
            let mut writer = match plan.placement {
                OverviewPlacement::Internal => {
                    build_overviews(writer.dataset_mut(), plan)?;
                    writer
                }
                OverviewPlacement::External => {
                    writer.close()?;
                    let mut reopened = RasterWriter::reopen(path)?;
                    {
                        let _use_ovr = ConfigOptionGuard::set(USE_OVR_OPTION, "YES")?;
                        let _not_internal = ConfigOptionGuard::set(INTERNAL_OVERVIEWS_OPTION, "NO")?;
                        build_overviews(reopened.dataset_mut(), plan)?;
                    }
                    external = true;
                    reopened
                }
            };
            tag_provenance(writer.dataset_mut(), plan)?;
            writer.close()?;
            overview_factors = plan.factors.clone();
        }
    }

    debug!("Closed {}", path.display());

    let overview_sidecar = if external {
        Some(confirm_sidecar(path)?)
    } else {
        None
    };

    Ok(BuiltRaster {
        path: path.to_path_buf(),
        band_count: spec.band_count,
        overview_factors,
        overview_sidecar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_overview_sidecar_path() {
        assert_eq!(
            overview_sidecar_path(Path::new("out/example.tif")),
            PathBuf::from("out/example.tif.ovr")
        );
    }

    #[test]
    fn test_confirm_sidecar() {
        let temp_dir = tempfile::tempdir().unwrap();
        let base = temp_dir.path().join("example.tif");

        let err = confirm_sidecar(&base).unwrap_err();
        assert!(matches!(err, FixtureError::MissingOverviewSidecar(_)));
        assert_eq!(err.kind(), ErrorKind::OverviewBuild);

        std::fs::write(temp_dir.path().join("example.tif.ovr"), b"").unwrap();
        assert_eq!(confirm_sidecar(&base).unwrap(), temp_dir.path().join("example.tif.ovr"));
    }
}
