//! Dataset post-processing for decoded records
//!
//! These helpers consume the output of the reader; the reader itself never
//! rescales or reshapes data.

use crate::element::Element;
use crate::error::IdxError;

/// Scale unsigned-byte pixels to `f32` in `[0, 1]`
pub fn normalize_pixels(pixels: &[u8]) -> Vec<f32> {
    pixels.iter().map(|&p| p as f32 / 255.0).collect()
}

/// Widen any decoded record to `f64`
pub fn to_f64<T: Element>(values: &[T]) -> Vec<f64> {
    values.iter().map(|&v| v.to_f64()).collect()
}

/// Split a flat row-major record into `rows` rows of `cols` elements
pub fn to_rows<T: Copy>(values: &[T], rows: usize, cols: usize) -> Result<Vec<Vec<T>>, IdxError> {
    let expected = rows
        .checked_mul(cols)
        .ok_or_else(|| IdxError::Size(format!("{} x {} overflows", rows, cols)))?;
    if values.len() != expected {
        return Err(IdxError::RecordLength {
            expected,
            actual: values.len(),
        });
    }
    if cols == 0 {
        return Ok(vec![Vec::new(); rows]);
    }
    Ok(values.chunks(cols).map(|row| row.to_vec()).collect())
}
