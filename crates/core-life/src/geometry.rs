//! Strip geometry: dimensions, stride, packed-layout offsets, and canvas
//! partitioning.
//!
//! A strip is `width` cells across and `height` rows tall, padded on the
//! right by `padding` columns so that horizontal wraparound has scratch
//! space that never aliases payload. Cells pack two per byte, low nibble
//! first. All offsets below are derived once and treated as constants by the
//! kernel.

use thiserror::Error;

/// Padding columns appended to each row. Wrap masks copy `padding/2` columns
/// per side, so this must stay a multiple of 4.
pub const DEFAULT_PADDING: u32 = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("canvas width must be even, got {0}")]
    OddWidth(u32),
    #[error("padding must be a multiple of 4 and at least 4, got {0}")]
    BadPadding(u32),
    #[error("canvas width {width} is smaller than the padding {padding}")]
    WidthTooSmall { width: u32, padding: u32 },
    #[error("strip height must be at least 1 row")]
    ZeroHeight,
    #[error("strip count must be at least 1")]
    ZeroStrips,
    #[error("cannot split {height} rows across {strips} strips")]
    TooManyStrips { height: u32, strips: usize },
}

/// Validated dimensions of one strip plus every derived layout constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripGeometry {
    width: u32,
    height: u32,
    padding: u32,
}

impl StripGeometry {
    pub fn new(width: u32, height: u32, padding: u32) -> Result<Self, GeometryError> {
        if width == 0 || width % 2 != 0 {
            return Err(GeometryError::OddWidth(width));
        }
        if padding < 4 || padding % 4 != 0 {
            return Err(GeometryError::BadPadding(padding));
        }
        if width < padding {
            return Err(GeometryError::WidthTooSmall { width, padding });
        }
        if height == 0 {
            return Err(GeometryError::ZeroHeight);
        }
        Ok(Self {
            width,
            height,
            padding,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    /// Cells per row including padding.
    pub fn stride(&self) -> usize {
        (self.width + self.padding) as usize
    }

    /// Bytes holding one packed row (2 cells per byte).
    pub fn row_bytes(&self) -> usize {
        self.stride() / 2
    }

    /// Bytes holding the whole packed strip.
    pub fn state_bytes(&self) -> usize {
        self.row_bytes() * self.height as usize
    }

    /// Bytes holding the canvas cells of one row, excluding padding.
    pub fn canvas_row_bytes(&self) -> usize {
        self.width as usize / 2
    }

    /// Nibbles of zero below the canvas. Sized so the upper halo row sits at
    /// nibble 2 and canvas row 0 at nibble `bias`.
    pub fn bias_nibbles(&self) -> usize {
        self.stride() + 2
    }

    /// Bit shift that moves the working state by one full row.
    pub fn colshift_bits(&self) -> usize {
        self.stride() * 4
    }

    /// Bit shift that moves a cell to its horizontal wrap position.
    pub fn width_bits(&self) -> usize {
        self.width as usize * 4
    }

    /// Byte offset of canvas row 0 inside the working state.
    pub fn canvas_byte_offset(&self) -> usize {
        self.bias_nibbles() / 2
    }

    /// Byte offset at which the upper halo row (canvas row −1) is spliced in.
    pub fn top_halo_byte_offset(&self) -> usize {
        1
    }

    /// Byte offset at which the lower halo row (canvas row `height`) is
    /// spliced in.
    pub fn bottom_halo_byte_offset(&self) -> usize {
        self.canvas_byte_offset() + self.state_bytes()
    }

    /// Working-state capacity: bias, the `height + 2` extended rows, and
    /// enough headroom that a one-row upward shift of the lower halo drops
    /// off the top instead of aliasing payload.
    pub fn capacity_nibbles(&self) -> usize {
        self.bias_nibbles() + (self.height as usize + 2) * self.stride()
    }
}

/// One strip's place in the full canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripBand {
    pub index: usize,
    pub y_offset: u32,
    pub geometry: StripGeometry,
}

/// Split `height` rows across `strips` workers.
///
/// Balanced remainder policy: with `R = height % strips`, the first
/// `strips − R` bands get the floor height and the last `R` get one extra
/// row. Divisibility is never required.
pub fn partition(
    width: u32,
    height: u32,
    padding: u32,
    strips: usize,
) -> Result<Vec<StripBand>, GeometryError> {
    if strips == 0 {
        return Err(GeometryError::ZeroStrips);
    }
    if height == 0 {
        return Err(GeometryError::ZeroHeight);
    }
    if strips as u64 > u64::from(height) {
        return Err(GeometryError::TooManyStrips { height, strips });
    }
    let base = height / strips as u32;
    let remainder = height as usize % strips;
    let mut bands = Vec::with_capacity(strips);
    let mut y_offset = 0;
    for index in 0..strips {
        let rows = if index < strips - remainder {
            base
        } else {
            base + 1
        };
        bands.push(StripBand {
            index,
            y_offset,
            geometry: StripGeometry::new(width, rows, padding)?,
        });
        y_offset += rows;
    }
    debug_assert_eq!(y_offset, height);
    tracing::debug!(
        target: "life.geometry",
        width,
        height,
        strips,
        floor = base,
        tall = remainder,
        "canvas partitioned"
    );
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_constants() {
        let g = StripGeometry::new(32, 8, 4).unwrap();
        assert_eq!(g.stride(), 36);
        assert_eq!(g.row_bytes(), 18);
        assert_eq!(g.state_bytes(), 144);
        assert_eq!(g.bias_nibbles(), 38);
        assert_eq!(g.canvas_byte_offset(), 19);
        assert_eq!(g.bottom_halo_byte_offset(), 19 + 144);
        assert_eq!(g.colshift_bits(), 144);
        assert_eq!(g.width_bits(), 128);
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            StripGeometry::new(31, 8, 4),
            Err(GeometryError::OddWidth(31))
        );
        assert_eq!(
            StripGeometry::new(32, 8, 6),
            Err(GeometryError::BadPadding(6))
        );
        assert_eq!(
            StripGeometry::new(32, 8, 2),
            Err(GeometryError::BadPadding(2))
        );
        assert_eq!(
            StripGeometry::new(8, 8, 16),
            Err(GeometryError::WidthTooSmall {
                width: 8,
                padding: 16
            })
        );
        assert_eq!(StripGeometry::new(32, 0, 4), Err(GeometryError::ZeroHeight));
    }

    #[test]
    fn partition_balances_remainder() {
        let bands = partition(32, 10, 4, 4).unwrap();
        let heights: Vec<u32> = bands.iter().map(|b| b.geometry.height()).collect();
        assert_eq!(heights, vec![2, 2, 3, 3]);
        let offsets: Vec<u32> = bands.iter().map(|b| b.y_offset).collect();
        assert_eq!(offsets, vec![0, 2, 4, 7]);
    }

    #[test]
    fn partition_exact_division() {
        let bands = partition(32, 8, 4, 4).unwrap();
        assert!(bands.iter().all(|b| b.geometry.height() == 2));
    }

    #[test]
    fn partition_rejects_bad_counts() {
        assert_eq!(partition(32, 8, 4, 0), Err(GeometryError::ZeroStrips));
        assert_eq!(
            partition(32, 8, 4, 9),
            Err(GeometryError::TooManyStrips {
                height: 8,
                strips: 9
            })
        );
    }
}
