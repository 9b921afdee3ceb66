use ndarray::Array2;

/// Stored value of an invalid (masked) pixel
pub const MASK_INVALID: u8 = 0;
/// Stored value of a valid pixel
pub const MASK_VALID: u8 = 255;

/// Per-dataset validity mask, `true` meaning valid.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskPlan {
    valid: Array2<bool>,
}

impl MaskPlan {
    pub fn from_fn<F>(height: usize, width: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> bool,
    {
        Self {
            valid: Array2::from_shape_fn((height, width), |(row, col)| f(row, col)),
        }
    }

    /// Columns `0..valid_cols` valid, the rest invalid.
    pub fn left_columns_valid(height: usize, width: usize, valid_cols: usize) -> Self {
        Self::from_fn(height, width, |_, col| col < valid_cols)
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.valid.dim()
    }

    /// Two-level encoding handed to GDAL: 0 invalid, 255 valid.
    pub fn encode(&self) -> Array2<u8> {
        self.valid
            .mapv(|valid| if valid { MASK_VALID } else { MASK_INVALID })
    }
}
