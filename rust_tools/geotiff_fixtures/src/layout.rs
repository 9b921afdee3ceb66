use crate::error::{FixtureError, Result};

/// On-disk block organisation of the GTiff file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageLayout {
    /// Untiled, one strip per block
    #[default]
    Striped,
    /// Square tiles of `block_size` pixels
    Tiled { block_size: usize },
}

impl StorageLayout {
    pub fn is_tiled(&self) -> bool {
        matches!(self, StorageLayout::Tiled { .. })
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            StorageLayout::Striped => Ok(()),
            StorageLayout::Tiled { block_size } => validate_tile_size(block_size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    None,
    Deflate,
}

impl Compression {
    pub fn as_gdal(&self) -> &'static str {
        match self {
            Compression::None => "NONE",
            Compression::Deflate => "DEFLATE",
        }
    }
}

/// Validate tile size (must be multiple of 16)
pub fn validate_tile_size(tile_size: usize) -> Result<()> {
    if tile_size == 0 || tile_size % 16 != 0 {
        return Err(FixtureError::InvalidTileSize(tile_size));
    }
    Ok(())
}

/// GTiff creation options for the given layout and compression
pub fn create_dataset_options(layout: StorageLayout, compression: Compression) -> Vec<String> {
    let mut options = vec![format!("COMPRESS={}", compression.as_gdal())];
    match layout {
        StorageLayout::Striped => options.push("TILED=NO".to_string()),
        StorageLayout::Tiled { block_size } => {
            options.push("TILED=YES".to_string());
            options.push(format!("BLOCKXSIZE={}", block_size));
            options.push(format!("BLOCKYSIZE={}", block_size));
        }
    }
    options
}
