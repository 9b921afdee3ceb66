use std::fmt;
use thiserror::Error;

/// Broad failure classes. Every variant is fatal to the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSpec,
    Io,
    OverviewBuild,
}

/// The collaborator call that was running when GDAL reported an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Open,
    WriteBand(usize),
    WriteMask,
    Reopen,
    Configure,
    BuildOverviews,
    SetTags,
    Close,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::Open => write!(f, "open"),
            BuildStep::WriteBand(index) => write!(f, "write band {}", index),
            BuildStep::WriteMask => write!(f, "write mask"),
            BuildStep::Reopen => write!(f, "reopen for update"),
            BuildStep::Configure => write!(f, "configure"),
            BuildStep::BuildOverviews => write!(f, "build overviews"),
            BuildStep::SetTags => write!(f, "set tags"),
            BuildStep::Close => write!(f, "close"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("{step} failed: {source}")]
    Step {
        step: BuildStep,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Band count must be at least 1")]
    NoBands,

    #[error("Value rule populates at most {limit} bands, {requested} requested")]
    TooManyBands { requested: usize, limit: usize },

    #[error("Value rule was derived from a different grid than the {0}-pixel-wide raster")]
    RuleGridMismatch(usize),

    #[error("Pixel size is non-positive or not finite: {0}x{1}")]
    InvalidPixelSize(f64, f64),

    #[error("Invalid tile size: {0} (must be multiple of 16)")]
    InvalidTileSize(usize),

    #[error("Invalid overview factors {0:?} (must be non-empty, strictly increasing, each >= 2)")]
    InvalidOverviewFactors(Vec<u32>),

    #[error("Internal overviews require a tiled layout")]
    UntiledInternalOverviews,

    #[error("Mask shape {mask_width}x{mask_height} does not match raster {width}x{height}")]
    MaskShapeMismatch {
        width: usize,
        height: usize,
        mask_width: usize,
        mask_height: usize,
    },

    #[error("External overview sidecar was not created: {}", .0.display())]
    MissingOverviewSidecar(std::path::PathBuf),

    #[error("Overview factor {factor} exceeds raster size {width}x{height}")]
    OverviewFactorTooLarge {
        factor: u32,
        width: usize,
        height: usize,
    },
}

impl FixtureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FixtureError::Gdal(_) | FixtureError::Io(_) => ErrorKind::Io,
            FixtureError::Step { step, .. } => match step {
                BuildStep::BuildOverviews => ErrorKind::OverviewBuild,
                _ => ErrorKind::Io,
            },
            FixtureError::OverviewFactorTooLarge { .. } | FixtureError::MissingOverviewSidecar(_) => {
                ErrorKind::OverviewBuild
            }
            FixtureError::ShapeError(_)
            | FixtureError::InvalidDimensions(..)
            | FixtureError::NoBands
            | FixtureError::TooManyBands { .. }
            | FixtureError::RuleGridMismatch(_)
            | FixtureError::InvalidPixelSize(..)
            | FixtureError::InvalidTileSize(_)
            | FixtureError::InvalidOverviewFactors(_)
            | FixtureError::UntiledInternalOverviews
            | FixtureError::MaskShapeMismatch { .. } => ErrorKind::InvalidSpec,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;

/// Tags a GDAL result with the step it came from.
pub(crate) trait AtStep<T> {
    fn at(self, step: BuildStep) -> Result<T>;
}

impl<T> AtStep<T> for std::result::Result<T, gdal::errors::GdalError> {
    fn at(self, step: BuildStep) -> Result<T> {
        self.map_err(|source| FixtureError::Step { step, source })
    }
}
