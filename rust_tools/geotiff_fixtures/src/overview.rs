use crate::error::{AtStep, BuildStep, FixtureError, Result};
use gdal::{Dataset, Metadata};
use log::{debug, info, warn};

/// Metadata domain recording how the overviews were derived
pub const PROVENANCE_NAMESPACE: &str = "overview-provenance";
/// Key under [`PROVENANCE_NAMESPACE`] holding the resampling name
pub const PROVENANCE_RESAMPLING_KEY: &str = "resampling";

/// Makes the GTiff driver build overviews into a `.ovr` sidecar even when
/// the dataset is open for update
pub const USE_OVR_OPTION: &str = "TIFF_USE_OVR";
/// Legacy switch set alongside [`USE_OVR_OPTION`] ("NO" = external)
pub const INTERNAL_OVERVIEWS_OPTION: &str = "GDAL_TIFF_INTERNAL_OVERVIEWS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resampling {
    #[default]
    Nearest,
}

impl Resampling {
    /// Name understood by GDALBuildOverviews
    pub fn as_gdal(&self) -> &'static str {
        match self {
            Resampling::Nearest => "NEAREST",
        }
    }

    /// Name written to the provenance tag
    pub fn tag_value(&self) -> &'static str {
        match self {
            Resampling::Nearest => "nearest",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverviewPlacement {
    /// Stored in the primary file
    Internal,
    /// Stored in a `<path>.ovr` sidecar
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewPlan {
    pub factors: Vec<u32>,
    pub resampling: Resampling,
    pub placement: OverviewPlacement,
}

impl OverviewPlan {
    pub fn new(factors: Vec<u32>, resampling: Resampling, placement: OverviewPlacement) -> Self {
        Self {
            factors,
            resampling,
            placement,
        }
    }

    pub fn internal(factors: Vec<u32>) -> Self {
        Self::new(factors, Resampling::Nearest, OverviewPlacement::Internal)
    }

    pub fn external(factors: Vec<u32>) -> Self {
        Self::new(factors, Resampling::Nearest, OverviewPlacement::External)
    }

    /// Factors must be non-empty, each >= 2, strictly increasing.
    pub fn validate(&self) -> Result<()> {
        let increasing = self.factors.windows(2).all(|w| w[0] < w[1]);
        if self.factors.is_empty() || !increasing || self.factors.iter().any(|&f| f < 2) {
            return Err(FixtureError::InvalidOverviewFactors(self.factors.clone()));
        }
        Ok(())
    }

    /// A factor larger than both raster dimensions would produce a level
    /// smaller than one pixel along every axis.
    pub fn check_fits(&self, width: usize, height: usize) -> Result<()> {
        let largest = width.max(height);
        if let Some(&factor) = self.factors.iter().find(|&&f| f as usize > largest) {
            return Err(FixtureError::OverviewFactorTooLarge {
                factor,
                width,
                height,
            });
        }
        Ok(())
    }
}

/// Sets a thread-local GDAL config option and restores the previous value
/// on drop. Builds on other threads never see the override.
pub struct ConfigOptionGuard {
    key: &'static str,
    previous: Option<String>,
}

impl ConfigOptionGuard {
    pub fn set(key: &'static str, value: &str) -> Result<Self> {
        let previous = gdal::config::get_thread_local_config_option(key, "").at(BuildStep::Configure)?;
        let previous = if previous.is_empty() {
            None
        } else {
            Some(previous)
        };
        gdal::config::set_thread_local_config_option(key, value).at(BuildStep::Configure)?;
        debug!("Set {}={} (was {:?})", key, value, previous);
        Ok(Self { key, previous })
    }
}

impl Drop for ConfigOptionGuard {
    fn drop(&mut self) {
        let restored = match &self.previous {
            Some(value) => gdal::config::set_thread_local_config_option(self.key, value),
            None => gdal::config::clear_thread_local_config_option(self.key),
        };
        if let Err(e) = restored {
            warn!("Failed to restore GDAL config option {}: {}", self.key, e);
        }
    }
}

/// Build the planned overview levels for all bands of `dataset`.
pub fn build_overviews(dataset: &mut Dataset, plan: &OverviewPlan) -> Result<()> {
    let (width, height) = dataset.raster_size();
    plan.check_fits(width, height)?;

    let levels: Vec<i32> = plan.factors.iter().map(|&f| f as i32).collect();
    info!(
        "Creating {} overview levels {:?} ({:?}, {})",
        levels.len(),
        levels,
        plan.placement,
        plan.resampling.as_gdal()
    );

    // Empty bands list means build for all bands
    dataset
        .build_overviews(plan.resampling.as_gdal(), &levels, &[])
        .at(BuildStep::BuildOverviews)?;

    debug!("Overviews created successfully");
    Ok(())
}

/// Record the resampling used for the overviews in the provenance domain.
pub fn tag_provenance(dataset: &mut Dataset, plan: &OverviewPlan) -> Result<()> {
    dataset
        .set_metadata_item(
            PROVENANCE_RESAMPLING_KEY,
            plan.resampling.tag_value(),
            PROVENANCE_NAMESPACE,
        )
        .at(BuildStep::SetTags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_factors_valid() {
        assert!(OverviewPlan::internal(vec![2, 4, 8]).validate().is_ok());
        assert!(OverviewPlan::external(vec![2, 4, 8, 16]).validate().is_ok());
        assert!(OverviewPlan::internal(vec![3]).validate().is_ok());
    }

    #[test]
    fn test_validate_factors_invalid() {
        assert!(OverviewPlan::internal(vec![]).validate().is_err());
        assert!(OverviewPlan::internal(vec![1, 2]).validate().is_err());
        assert!(OverviewPlan::internal(vec![4, 2]).validate().is_err());
        assert!(OverviewPlan::internal(vec![2, 2]).validate().is_err());
    }

    #[test]
    fn test_check_fits() {
        let plan = OverviewPlan::external(vec![2, 4, 8, 16]);
        assert!(plan.check_fits(1000, 1000).is_ok());
        assert!(plan.check_fits(16, 3).is_ok());
        assert!(matches!(
            plan.check_fits(10, 10),
            Err(FixtureError::OverviewFactorTooLarge { factor: 16, .. })
        ));
    }

    #[test]
    fn test_resampling_names() {
        assert_eq!(Resampling::Nearest.as_gdal(), "NEAREST");
        assert_eq!(Resampling::Nearest.tag_value(), "nearest");
    }

    #[test]
    fn test_config_guard_restores_unset_option() {
        let key = "GEOTIFF_FIXTURES_TEST_OPTION";
        {
            let _guard = ConfigOptionGuard::set(key, "NO").unwrap();
            assert_eq!(gdal::config::get_thread_local_config_option(key, "").unwrap(), "NO");
        }
        assert_eq!(gdal::config::get_thread_local_config_option(key, "").unwrap(), "");
    }

    #[test]
    fn test_config_guard_restores_previous_value() {
        let key = "GEOTIFF_FIXTURES_TEST_PREVIOUS";
        gdal::config::set_thread_local_config_option(key, "YES").unwrap();
        {
            let _guard = ConfigOptionGuard::set(key, "NO").unwrap();
            assert_eq!(gdal::config::get_thread_local_config_option(key, "").unwrap(), "NO");
        }
        assert_eq!(gdal::config::get_thread_local_config_option(key, "").unwrap(), "YES");
        gdal::config::clear_thread_local_config_option(key).unwrap();
    }
}
