//! Blitter stage: packed 4-bpp strips to RGBA surfaces.
//!
//! One thread per strip, downstream of a worker's frame channel and
//! upstream of the presenter's capacity-1 surface queue. The expansion
//! walks each packed row's canvas bytes low nibble first, so pixel order
//! equals cell order and display order equals geometric order.

use crate::stop::StopFlag;
use crate::PipelineError;
use core_life::StripGeometry;
use crossbeam_channel::{Receiver, Sender};
use std::thread::{Builder, JoinHandle};
use tracing::{debug, error};

/// Two-entry RGBA palette: index 0 (dead) and index 1 (live).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub off: [u8; 4],
    pub on: [u8; 4],
}

impl Palette {
    /// Black background, white cells.
    pub const MONOCHROME: Self = Self {
        off: [0, 0, 0, 255],
        on: [255, 255, 255, 255],
    };
}

/// An owned 32-bpp surface for one strip, tightly packed (pitch = width·4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaFrame {
    pub fn pitch(&self) -> usize {
        self.width as usize * 4
    }
}

/// Expand one packed strip through the palette. Padding columns are skipped
/// via the row stride; they never reach the screen.
pub fn convert(geo: &StripGeometry, packed: &[u8], palette: &Palette) -> RgbaFrame {
    debug_assert_eq!(packed.len(), geo.state_bytes());
    let mut pixels = Vec::with_capacity(geo.width() as usize * geo.height() as usize * 4);
    for row in packed.chunks(geo.row_bytes()) {
        for &byte in &row[..geo.canvas_row_bytes()] {
            let lo = if byte & 1 != 0 { palette.on } else { palette.off };
            let hi = if byte >> 4 & 1 != 0 {
                palette.on
            } else {
                palette.off
            };
            pixels.extend_from_slice(&lo);
            pixels.extend_from_slice(&hi);
        }
    }
    RgbaFrame {
        width: geo.width(),
        height: geo.height(),
        pixels,
    }
}

pub(crate) struct BlitterSpec {
    pub index: usize,
    pub geometry: StripGeometry,
    pub palette: Palette,
    pub frame_rx: Receiver<Vec<u8>>,
    pub surface_tx: Sender<RgbaFrame>,
    pub stop: StopFlag,
}

pub(crate) fn spawn(spec: BlitterSpec) -> std::io::Result<JoinHandle<()>> {
    Builder::new()
        .name(format!("blit-{}", spec.index))
        .spawn(move || run(spec))
}

fn run(spec: BlitterSpec) {
    let BlitterSpec {
        index,
        geometry,
        palette,
        frame_rx,
        surface_tx,
        stop,
    } = spec;
    loop {
        if stop.is_set() {
            // One final non-blocking read so a worker parked on a full frame
            // channel can proceed to its own stop check; dropping the
            // receiver below unblocks it for good.
            let _ = frame_rx.try_recv();
            debug!(target: "pipeline.blitter", strip = index, "graceful exit");
            return;
        }
        let packed = match frame_rx.recv() {
            Ok(frame) => frame,
            Err(_) => {
                debug!(target: "pipeline.blitter", strip = index, "frame channel closed");
                return;
            }
        };
        if packed.len() != geometry.state_bytes() {
            let violation = PipelineError::Protocol {
                channel: "frame",
                expected: geometry.state_bytes(),
                got: packed.len(),
            };
            error!(target: "pipeline.blitter", strip = index, %violation, "tearing down");
            return;
        }
        if surface_tx.send(convert(&geometry, &packed, &palette)).is_err() {
            debug!(target: "pipeline.blitter", strip = index, "surface queue closed");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_life::pack;

    #[test]
    fn convert_is_low_nibble_first_and_skips_padding() {
        let geo = StripGeometry::new(4, 2, 4).unwrap();
        let mut packed = pack::empty_seed(&geo);
        pack::set_cell(&geo, &mut packed, 0, 0, true);
        pack::set_cell(&geo, &mut packed, 3, 1, true);

        let frame = convert(&geo, &packed, &Palette::MONOCHROME);
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.pixels.len(), 4 * 2 * 4);
        assert_eq!(frame.pitch(), 16);

        let on = Palette::MONOCHROME.on;
        let off = Palette::MONOCHROME.off;
        let px = |x: usize, y: usize| &frame.pixels[(y * 4 + x) * 4..][..4];
        assert_eq!(px(0, 0), on);
        assert_eq!(px(1, 0), off);
        assert_eq!(px(2, 1), off);
        assert_eq!(px(3, 1), on);
    }

    #[test]
    fn palette_colours_flow_through() {
        let geo = StripGeometry::new(4, 1, 4).unwrap();
        let mut packed = pack::empty_seed(&geo);
        pack::set_cell(&geo, &mut packed, 1, 0, true);
        let palette = Palette {
            off: [10, 20, 30, 255],
            on: [200, 100, 50, 255],
        };
        let frame = convert(&geo, &packed, &palette);
        assert_eq!(&frame.pixels[..4], palette.off);
        assert_eq!(&frame.pixels[4..8], palette.on);
    }
}
