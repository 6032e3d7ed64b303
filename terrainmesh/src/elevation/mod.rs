//! Terrain-RGB elevation decoding.
//!
//! Terrain-RGB rasters pack an elevation into the red, green and blue
//! channels of each pixel:
//!
//! ```text
//! elevation = -10000 + (R × 65536 + G × 256 + B) × 0.1   (metres)
//! ```
//!
//! Decoding is pure: it takes an interleaved RGBA buffer (as produced by any
//! image decoder) and never performs I/O.

use thiserror::Error;

/// Bytes per interleaved RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Elevation at the lowest encodable value, in metres.
const BASE_ELEVATION: f64 = -10000.0;

/// Metres per encoded step.
const ELEVATION_STEP: f64 = 0.1;

/// Errors raised when an elevation grid does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElevationError {
    /// The number of samples is not a perfect square.
    #[error("Elevation grid with {0} samples is not square")]
    NotSquare(usize),

    /// The grid has no samples at all.
    #[error("Elevation grid is empty")]
    Empty,
}

/// Decodes a single terrain-RGB pixel into metres.
#[inline]
pub fn rgb_to_elevation(r: u8, g: u8, b: u8) -> f64 {
    let packed = r as u32 * 65536 + g as u32 * 256 + b as u32;
    BASE_ELEVATION + packed as f64 * ELEVATION_STEP
}

/// Decodes an interleaved RGBA buffer into an elevation grid.
///
/// The alpha channel is ignored, as is any trailing partial pixel.
pub fn decode_elevations(pixels: &[u8]) -> ElevationGrid {
    let samples = pixels
        .chunks_exact(BYTES_PER_PIXEL)
        .map(|px| rgb_to_elevation(px[0], px[1], px[2]))
        .collect();

    ElevationGrid { samples }
}

/// Row-major elevation samples in metres, one per raster pixel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElevationGrid {
    samples: Vec<f64>,
}

impl ElevationGrid {
    /// Wraps already-decoded samples.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Edge length of the (square) raster.
    pub fn dimension(&self) -> Result<u32, ElevationError> {
        if self.samples.is_empty() {
            return Err(ElevationError::Empty);
        }

        let dim = (self.samples.len() as f64).sqrt().round() as usize;
        if dim * dim != self.samples.len() {
            return Err(ElevationError::NotSquare(self.samples.len()));
        }
        Ok(dim as u32)
    }

    /// Sample at (`row`, `col`) of a grid with edge length `dim`.
    #[inline]
    pub fn get(&self, row: u32, col: u32, dim: u32) -> Option<f64> {
        self.samples
            .get(row as usize * dim as usize + col as usize)
            .copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_pixel_is_base_elevation() {
        let grid = decode_elevations(&[0, 0, 0, 255]);
        assert_eq!(grid.as_slice(), &[-10000.0]);
    }

    #[test]
    fn test_white_pixel_is_max_elevation() {
        let grid = decode_elevations(&[255, 255, 255, 255]);
        assert_eq!(grid.len(), 1);
        // -10000 + 16777215 * 0.1
        assert!((grid.as_slice()[0] - 1_667_721.5).abs() < 1e-6);
    }

    #[test]
    fn test_sea_level() {
        // 100000 steps of 0.1 m = 10000 m
        // 100000 = 1 * 65536 + 134 * 256 + 160
        assert!(rgb_to_elevation(1, 134, 160).abs() < 1e-9);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let opaque = decode_elevations(&[1, 2, 3, 255]);
        let clear = decode_elevations(&[1, 2, 3, 0]);
        assert_eq!(opaque, clear);
    }

    #[test]
    fn test_output_length_and_order() {
        let pixels = [0, 0, 0, 255, 0, 0, 10, 255, 0, 1, 0, 255];
        let grid = decode_elevations(&pixels);

        assert_eq!(grid.len(), 3);
        assert!((grid.as_slice()[1] - (-9999.0)).abs() < 1e-9);
        assert!((grid.as_slice()[2] - (-9974.4)).abs() < 1e-9);
    }

    #[test]
    fn test_trailing_partial_pixel_is_dropped() {
        let grid = decode_elevations(&[0, 0, 0, 255, 9, 9]);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_dimension_of_square_grid() {
        let grid = ElevationGrid::from_samples(vec![0.0; 16]);
        assert_eq!(grid.dimension(), Ok(4));
        assert_eq!(grid.get(3, 3, 4), Some(0.0));
        assert_eq!(grid.get(4, 0, 4), None);
    }

    #[test]
    fn test_dimension_rejects_non_square() {
        let grid = ElevationGrid::from_samples(vec![0.0; 12]);
        assert_eq!(grid.dimension(), Err(ElevationError::NotSquare(12)));
        assert_eq!(ElevationGrid::default().dimension(), Err(ElevationError::Empty));
    }
}
