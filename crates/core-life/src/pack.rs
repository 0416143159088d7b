//! Packed-state helpers: seeding, sanitization, and cell access.
//!
//! Packed state is the wire format of the pipeline: `stride/2` bytes per
//! row, two cells per byte, low nibble first, nibble values strictly 0 or 1
//! with padding bytes zero. Everything that creates packed bytes goes
//! through [`sanitize`] so that invariant holds from generation 0.

use crate::geometry::StripGeometry;
use rand::rngs::OsRng;
use rand::RngCore;

/// Force `bytes` into canonical packed form: cell nibbles masked to their
/// low bit, padding columns zeroed.
pub fn sanitize(geo: &StripGeometry, bytes: &mut [u8]) {
    debug_assert_eq!(bytes.len(), geo.state_bytes());
    let row_bytes = geo.row_bytes();
    let canvas_bytes = geo.canvas_row_bytes();
    for row in bytes.chunks_mut(row_bytes) {
        for (i, b) in row.iter_mut().enumerate() {
            *b = if i < canvas_bytes { *b & 0x11 } else { 0 };
        }
    }
}

/// Random soup from the OS entropy source, sanitized.
pub fn random_seed(geo: &StripGeometry) -> Vec<u8> {
    let mut bytes = vec![0u8; geo.state_bytes()];
    OsRng.fill_bytes(&mut bytes);
    sanitize(geo, &mut bytes);
    bytes
}

/// An all-dead strip.
pub fn empty_seed(geo: &StripGeometry) -> Vec<u8> {
    vec![0u8; geo.state_bytes()]
}

pub fn set_cell(geo: &StripGeometry, bytes: &mut [u8], x: u32, y: u32, alive: bool) {
    debug_assert!(x < geo.width() && y < geo.height());
    let idx = y as usize * geo.row_bytes() + x as usize / 2;
    let shift = (x % 2) * 4;
    if alive {
        bytes[idx] |= 1 << shift;
    } else {
        bytes[idx] &= !(0x0F << shift);
    }
}

pub fn cell(geo: &StripGeometry, bytes: &[u8], x: u32, y: u32) -> bool {
    debug_assert!(x < geo.width() && y < geo.height());
    let idx = y as usize * geo.row_bytes() + x as usize / 2;
    let shift = (x % 2) * 4;
    bytes[idx] >> shift & 1 != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> StripGeometry {
        StripGeometry::new(8, 2, 4).unwrap()
    }

    #[test]
    fn cell_round_trip() {
        let g = geo();
        let mut bytes = empty_seed(&g);
        set_cell(&g, &mut bytes, 0, 0, true);
        set_cell(&g, &mut bytes, 7, 1, true);
        set_cell(&g, &mut bytes, 3, 0, true);
        assert!(cell(&g, &bytes, 0, 0));
        assert!(cell(&g, &bytes, 7, 1));
        assert!(cell(&g, &bytes, 3, 0));
        assert!(!cell(&g, &bytes, 1, 0));
        set_cell(&g, &mut bytes, 3, 0, false);
        assert!(!cell(&g, &bytes, 3, 0));
        // neighbouring nibble untouched
        assert!(cell(&g, &bytes, 0, 0) || !cell(&g, &bytes, 2, 0));
    }

    #[test]
    fn sanitize_clears_padding_and_high_bits() {
        let g = geo();
        let mut bytes = vec![0xFFu8; g.state_bytes()];
        sanitize(&g, &mut bytes);
        for row in bytes.chunks(g.row_bytes()) {
            assert!(row[..g.canvas_row_bytes()].iter().all(|&b| b == 0x11));
            assert!(row[g.canvas_row_bytes()..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn random_seed_is_canonical() {
        let g = StripGeometry::new(64, 16, 16).unwrap();
        let bytes = random_seed(&g);
        assert_eq!(bytes.len(), g.state_bytes());
        for row in bytes.chunks(g.row_bytes()) {
            assert!(row[..g.canvas_row_bytes()].iter().all(|&b| b & !0x11 == 0));
            assert!(row[g.canvas_row_bytes()..].iter().all(|&b| b == 0));
        }
    }
}
