use crate::error::{AtStep, BuildStep, FixtureError, Result};
use crate::layout::create_dataset_options;
use crate::spec::RasterSpec;
use gdal::cpl::CslStringList;
use gdal::raster::{Buffer, GdalType, RasterBand};
use gdal::{Dataset, DatasetOptions, DriverManager, GdalOpenFlags, Metadata};
use log::{debug, info};
use ndarray::Array2;
use std::path::Path;

/// Open GTiff dataset being written. Dropping it closes the file.
pub struct RasterWriter {
    dataset: Dataset,
    width: usize,
    height: usize,
}

impl RasterWriter {
    /// Create the output file with `Int32` bands, georeferencing and
    /// the creation options derived from the spec's layout and compression.
    pub fn create(path: &Path, spec: &RasterSpec) -> Result<Self> {
        info!("Creating output dataset: {}", path.display());

        let driver = DriverManager::get_driver_by_name("GTiff").at(BuildStep::Open)?;

        let mut gdal_options = CslStringList::new();
        for opt in create_dataset_options(spec.layout, spec.compression) {
            gdal_options.add_string(&opt).at(BuildStep::Open)?;
        }

        let mut dataset = driver
            .create_with_band_type_with_options::<i32, _>(
                path,
                spec.width,
                spec.height,
                spec.band_count,
                &gdal_options,
            )
            .at(BuildStep::Open)?;

        dataset
            .set_geo_transform(&spec.georeference.geo_transform())
            .at(BuildStep::Open)?;
        let srs = spec.georeference.crs.spatial_ref()?;
        dataset.set_spatial_ref(&srs).at(BuildStep::Open)?;

        Ok(Self {
            dataset,
            width: spec.width,
            height: spec.height,
        })
    }

    /// Reopen an existing file in update mode.
    pub fn reopen(path: &Path) -> Result<Self> {
        debug!("Reopening {} for update", path.display());
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_UPDATE | GdalOpenFlags::GDAL_OF_RASTER,
            ..Default::default()
        };
        let dataset = Dataset::open_ex(path, options).at(BuildStep::Reopen)?;
        let (width, height) = dataset.raster_size();
        Ok(Self {
            dataset,
            width,
            height,
        })
    }

    /// Write one whole band. `band_index` is 1-based.
    pub fn write_band(&mut self, band_index: usize, data: &Array2<i32>) -> Result<()> {
        let step = BuildStep::WriteBand(band_index);
        self.check_shape(data.dim())?;

        let mut raster_band = self.dataset.rasterband(band_index).at(step)?;
        let mut buffer = Buffer::new((self.width, self.height), data.iter().copied().collect());
        raster_band
            .write((0, 0), (self.width, self.height), &mut buffer)
            .at(step)?;

        debug!("Wrote band {}", band_index);
        Ok(())
    }

    /// Create the per-dataset mask band and fill it with `encoded`
    /// (0 = invalid, 255 = valid).
    pub fn write_mask(&mut self, encoded: &Array2<u8>) -> Result<()> {
        let step = BuildStep::WriteMask;
        self.check_shape(encoded.dim())?;

        let mut raster_band = self.dataset.rasterband(1).at(step)?;
        raster_band.create_mask_band(true).at(step)?;

        let mut mask_band = raster_band.open_mask_band().at(step)?;
        let mut buffer = Buffer::new((self.width, self.height), encoded.iter().copied().collect());
        mask_band
            .write((0, 0), (self.width, self.height), &mut buffer)
            .at(step)?;

        debug!("Wrote per-dataset mask");
        Ok(())
    }

    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    /// Flush and close, surfacing any error GDAL reports while doing so.
    pub fn close(self) -> Result<()> {
        self.dataset.close().at(BuildStep::Close)
    }

    fn check_shape(&self, (rows, cols): (usize, usize)) -> Result<()> {
        if (rows, cols) != (self.height, self.width) {
            return Err(FixtureError::InvalidDimensions(cols, rows));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RasterSummary {
    pub width: usize,
    pub height: usize,
    pub band_count: usize,
    pub geotransform: [f64; 6],
    pub projection: String,
    pub block_size: (usize, usize),
    pub overview_count: usize,
}

/// Dimensions, georeferencing and layout of an existing raster
pub fn read_summary(path: &Path) -> Result<RasterSummary> {
    let dataset = Dataset::open(path)?;
    let (width, height) = dataset.raster_size();
    let rasterband: RasterBand = dataset.rasterband(1)?;

    Ok(RasterSummary {
        width,
        height,
        band_count: dataset.raster_count(),
        geotransform: dataset.geo_transform()?,
        projection: dataset.projection(),
        block_size: rasterband.block_size(),
        overview_count: rasterband.overview_count()?.max(0) as usize,
    })
}

fn read_whole<T: GdalType + Copy>(rasterband: &RasterBand) -> Result<Array2<T>> {
    let width = rasterband.x_size();
    let height = rasterband.y_size();
    let buffer = rasterband.read_as::<T>((0, 0), (width, height), (width, height), None)?;
    let data_vec: Vec<T> = buffer.into_iter().collect();
    Ok(Array2::from_shape_vec((height, width), data_vec)?)
}

/// Read a full-resolution band (1-based index)
pub fn read_band(path: &Path, band_index: usize) -> Result<Array2<i32>> {
    let dataset = Dataset::open(path)?;
    let rasterband = dataset.rasterband(band_index)?;
    read_whole(&rasterband)
}

/// Read the mask band attached to band 1
pub fn read_mask(path: &Path) -> Result<Array2<u8>> {
    let dataset = Dataset::open(path)?;
    let rasterband = dataset.rasterband(1)?;
    let mask_band = rasterband.open_mask_band()?;
    read_whole(&mask_band)
}

/// Read overview `level` (0 = first, least reduced) of a band
pub fn read_overview(path: &Path, band_index: usize, level: usize) -> Result<Array2<i32>> {
    let dataset = Dataset::open(path)?;
    let rasterband = dataset.rasterband(band_index)?;
    let overview = rasterband.overview(level)?;
    read_whole(&overview)
}

/// Dataset-level metadata item from `domain`
pub fn read_tag(path: &Path, key: &str, domain: &str) -> Result<Option<String>> {
    let dataset = Dataset::open(path)?;
    Ok(dataset.metadata_item(key, domain))
}
