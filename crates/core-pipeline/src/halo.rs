//! The halo ring.
//!
//! `K` bidirectional links arranged in a ring: link `i` joins worker `i`
//! (its bottom edge) to worker `(i+1) mod K` (its top edge), each direction
//! a bounded FIFO byte channel carrying exactly one packed row per message.
//! Worker 0's top edge joins worker `K−1`'s bottom edge, so toroidal wrap
//! falls out of the indexing; with `K = 1` both handles loop back to the
//! single worker and self-exchange implements the wrap.
//!
//! Capacity 2 gives each producer one tick of slack beyond the pre-seeded
//! row; the per-tick send-before-receive discipline (see `worker`) keeps
//! the ring deadlock-free at any capacity ≥ 1.

use crossbeam_channel::{bounded, Receiver, Sender};

const HALO_CAPACITY: usize = 2;

/// One worker's four halo endpoints.
#[derive(Debug)]
pub(crate) struct HaloLinks {
    /// Carries this strip's top row to the strip above.
    pub top_tx: Sender<Vec<u8>>,
    /// Delivers the bottom row of the strip above (canvas row −1 here).
    pub top_rx: Receiver<Vec<u8>>,
    /// Carries this strip's bottom row to the strip below.
    pub bottom_tx: Sender<Vec<u8>>,
    /// Delivers the top row of the strip below (canvas row `height` here).
    pub bottom_rx: Receiver<Vec<u8>>,
}

fn channels(count: usize) -> (Vec<Sender<Vec<u8>>>, Vec<Receiver<Vec<u8>>>) {
    (0..count).map(|_| bounded(HALO_CAPACITY)).unzip()
}

/// Build the ring and hand each worker its endpoints.
pub(crate) fn ring(strips: usize) -> Vec<HaloLinks> {
    debug_assert!(strips >= 1);
    // Downward link i: worker i → worker i+1. Upward link i: worker i+1 →
    // worker i. Rotating the "previous link" vectors right by one aligns
    // worker i with link i−1 mod K.
    let (down_tx, mut down_rx) = channels(strips);
    let (mut up_tx, up_rx) = channels(strips);
    up_tx.rotate_right(1);
    down_rx.rotate_right(1);

    down_tx
        .into_iter()
        .zip(up_rx)
        .zip(up_tx)
        .zip(down_rx)
        .map(|(((bottom_tx, bottom_rx), top_tx), top_rx)| HaloLinks {
            top_tx,
            top_rx,
            bottom_tx,
            bottom_rx,
        })
        .collect()
}
