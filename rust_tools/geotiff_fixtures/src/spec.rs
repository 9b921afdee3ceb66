use crate::crs::Georeference;
use crate::error::{FixtureError, Result};
use crate::layout::{Compression, StorageLayout};
use crate::mask::MaskPlan;
use crate::overview::{OverviewPlacement, OverviewPlan};
use crate::rules::BandValueRule;

/// Everything needed to produce one fixture file. Samples are always `i32`.
#[derive(Debug, Clone)]
pub struct RasterSpec {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub georeference: Georeference,
    pub layout: StorageLayout,
    pub compression: Compression,
    pub overviews: Option<OverviewPlan>,
    pub mask: Option<MaskPlan>,
}

impl RasterSpec {
    pub fn new(width: usize, height: usize, band_count: usize, georeference: Georeference) -> Self {
        Self {
            width,
            height,
            band_count,
            georeference,
            layout: StorageLayout::Striped,
            compression: Compression::None,
            overviews: None,
            mask: None,
        }
    }

    pub fn with_layout(mut self, layout: StorageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_overviews(mut self, plan: OverviewPlan) -> Self {
        self.overviews = Some(plan);
        self
    }

    pub fn with_mask(mut self, mask: MaskPlan) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Checks every invariant that can be decided before touching the disk.
    pub fn validate(&self, rule: &dyn BandValueRule) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FixtureError::InvalidDimensions(self.width, self.height));
        }
        if self.band_count == 0 {
            return Err(FixtureError::NoBands);
        }
        if let Some(limit) = rule.band_limit() {
            if self.band_count > limit {
                return Err(FixtureError::TooManyBands {
                    requested: self.band_count,
                    limit,
                });
            }
        }

        if !rule.matches_grid(self.width, &self.georeference) {
            return Err(FixtureError::RuleGridMismatch(self.width));
        }

        self.georeference.validate()?;
        self.layout.validate()?;

        if let Some(plan) = &self.overviews {
            plan.validate()?;
            if plan.placement == OverviewPlacement::Internal && !self.layout.is_tiled() {
                return Err(FixtureError::UntiledInternalOverviews);
            }
        }

        if let Some(mask) = &self.mask {
            let (mask_height, mask_width) = mask.dim();
            if (mask_height, mask_width) != (self.height, self.width) {
                return Err(FixtureError::MaskShapeMismatch {
                    width: self.width,
                    height: self.height,
                    mask_width,
                    mask_height,
                });
            }
        }

        Ok(())
    }
}
