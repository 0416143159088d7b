//! Mask derivation.
//!
//! Every mask is a bit-0-per-nibble pattern (except the comparator masks,
//! which repeat a full nibble value), assembled as little-endian bytes and
//! spliced into a zero `WideUint` at the layout offset the geometry
//! dictates. Masks are derived once per worker and never mutated.

use crate::geometry::StripGeometry;
use core_wide::WideUint;

/// The constant masks one strip's kernel operates with.
#[derive(Debug, Clone)]
pub struct StripMasks {
    /// Bit 0 of every nibble across the canvas rows, padding included.
    pub ones: WideUint,
    /// `ones` restricted to payload cells: padding columns zeroed.
    pub canvas: WideUint,
    /// Leftmost `padding/2` canvas columns of all `height + 2` extended rows.
    pub wrap_left: WideUint,
    /// Rightmost `padding/2` canvas columns of the same rows.
    pub wrap_right: WideUint,
}

fn repeat_rows(geo: &StripGeometry, row: &[u8], rows: usize, byte_offset: usize) -> WideUint {
    debug_assert_eq!(row.len(), geo.row_bytes());
    let mut bytes = Vec::with_capacity(row.len() * rows);
    for _ in 0..rows {
        bytes.extend_from_slice(row);
    }
    let mut mask = WideUint::zero(geo.capacity_nibbles());
    mask.or_bytes_at(&bytes, byte_offset);
    mask
}

impl StripMasks {
    pub fn derive(geo: &StripGeometry) -> Self {
        let height = geo.height() as usize;
        let extended_rows = height + 2;
        let row_bytes = geo.row_bytes();
        let wrap_cols_bytes = geo.padding() as usize / 4;
        let canvas_bytes = geo.canvas_row_bytes();

        let ones_row = vec![0x11u8; row_bytes];
        let ones = repeat_rows(geo, &ones_row, height, geo.canvas_byte_offset());

        let mut canvas_row = vec![0u8; row_bytes];
        canvas_row[..canvas_bytes].fill(0x11);
        let canvas = repeat_rows(geo, &canvas_row, height, geo.canvas_byte_offset());

        let mut left_row = vec![0u8; row_bytes];
        left_row[..wrap_cols_bytes].fill(0x11);
        let wrap_left = repeat_rows(geo, &left_row, extended_rows, geo.top_halo_byte_offset());

        let mut right_row = vec![0u8; row_bytes];
        right_row[canvas_bytes - wrap_cols_bytes..canvas_bytes].fill(0x11);
        let wrap_right = repeat_rows(geo, &right_row, extended_rows, geo.top_halo_byte_offset());

        Self {
            ones,
            canvas,
            wrap_left,
            wrap_right,
        }
    }

    /// Comparator constant for one neighbourhood sum: every canvas nibble
    /// holds `15 XOR sum` (the product `MASK_1 · (15 XOR sum)`, assembled
    /// here as shifted copies of [`StripMasks::ones`]), so
    /// `summed XOR comparator` is all-ones exactly in nibbles that summed
    /// to `sum`.
    pub fn comparator(&self, sum: u32) -> WideUint {
        debug_assert!(sum <= 9);
        let nibble = 15 ^ sum;
        let capacity = self.ones.capacity_nibbles();
        let mut mask = WideUint::zero(capacity);
        let mut shifted = WideUint::zero(capacity);
        for bit in 0..4 {
            if nibble & (1 << bit) != 0 {
                shifted.shl_from(&self.ones, bit);
                mask.or_assign(&shifted);
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> StripGeometry {
        StripGeometry::new(16, 4, 4).unwrap()
    }

    #[test]
    fn population_counts() {
        let g = geo();
        let masks = StripMasks::derive(&g);
        assert_eq!(
            masks.ones.count_ones(),
            (g.stride() * g.height() as usize) as u64
        );
        assert_eq!(masks.canvas.count_ones(), 16 * 4);
        // padding/2 = 2 columns per side, height + 2 extended rows
        assert_eq!(masks.wrap_left.count_ones(), 2 * 6);
        assert_eq!(masks.wrap_right.count_ones(), 2 * 6);
    }

    #[test]
    fn canvas_mask_is_subset_of_ones() {
        let masks = StripMasks::derive(&geo());
        let mut overlap = masks.canvas.clone();
        overlap.and_assign(&masks.ones);
        assert_eq!(overlap, masks.canvas);
    }

    #[test]
    fn wrap_masks_are_disjoint() {
        let masks = StripMasks::derive(&geo());
        let mut overlap = masks.wrap_left.clone();
        overlap.and_assign(&masks.wrap_right);
        assert!(overlap.is_zero());
    }

    #[test]
    fn comparator_bytes() {
        let g = geo();
        let masks = StripMasks::derive(&g);
        let mut row = vec![0u8; g.row_bytes()];
        masks
            .comparator(3)
            .copy_bytes_to(&mut row, g.canvas_byte_offset());
        assert!(row.iter().all(|&b| b == 0xCC));
        masks
            .comparator(7)
            .copy_bytes_to(&mut row, g.canvas_byte_offset());
        assert!(row.iter().all(|&b| b == 0x88));
        masks
            .comparator(4)
            .copy_bytes_to(&mut row, g.canvas_byte_offset());
        assert!(row.iter().all(|&b| b == 0xBB));
    }
}
