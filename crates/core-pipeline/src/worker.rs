//! Strip workers.
//!
//! One thread per strip, owning its kernel and working state. Per tick:
//! receive both halo rows, step the kernel, send the new edge rows, and
//! every `frameskip`-th tick push the packed strip to the blitter. The seed
//! edge rows are pre-sent before the loop so every worker's first receive
//! finds data; thereafter each tick's sends happen strictly before the
//! receives that consume them on the other side, which keeps the ring free
//! of cycles of blocked peers.
//!
//! Workers never report errors upstream. They exit on the stop flag, on any
//! disconnected channel (the cancellation cascade), or on a malformed halo
//! message; dropping their endpoints propagates the exit around the ring
//! and down the frame channel.

use crate::halo::HaloLinks;
use crate::stop::StopFlag;
use crate::PipelineError;
use core_life::StepKernel;
use crossbeam_channel::{SendError, Sender};
use std::thread::{Builder, JoinHandle};
use tracing::{debug, error, trace};

pub(crate) struct WorkerSpec {
    pub index: usize,
    pub kernel: StepKernel,
    pub seed: Vec<u8>,
    pub frameskip: u64,
    pub links: HaloLinks,
    pub frame_tx: Sender<Vec<u8>>,
    pub stop: StopFlag,
}

pub(crate) fn spawn(spec: WorkerSpec) -> std::io::Result<JoinHandle<()>> {
    Builder::new()
        .name(format!("life-{}", spec.index))
        .spawn(move || run(spec))
}

fn send_edge_rows(
    links: &HaloLinks,
    packed: &[u8],
    row_bytes: usize,
) -> Result<(), SendError<Vec<u8>>> {
    links.top_tx.send(packed[..row_bytes].to_vec())?;
    links
        .bottom_tx
        .send(packed[packed.len() - row_bytes..].to_vec())?;
    Ok(())
}

fn run(spec: WorkerSpec) {
    let WorkerSpec {
        index,
        mut kernel,
        seed,
        frameskip,
        links,
        frame_tx,
        stop,
    } = spec;
    let row_bytes = kernel.geometry().row_bytes();
    let mut state = kernel.state_from_packed(&seed);

    // Canonical packed form of the seed: the raw seed bytes may be anything,
    // but what goes on the wire must satisfy the packed-state invariant.
    let packed = kernel.export_packed(&state);
    if send_edge_rows(&links, &packed, row_bytes).is_err() {
        debug!(target: "pipeline.worker", strip = index, "exit before first tick");
        return;
    }

    let mut ticks: u64 = 0;
    loop {
        if stop.is_set() {
            debug!(target: "pipeline.worker", strip = index, ticks, "graceful exit");
            return;
        }
        let (top, bottom) = match (links.top_rx.recv(), links.bottom_rx.recv()) {
            (Ok(top), Ok(bottom)) => (top, bottom),
            _ => {
                debug!(target: "pipeline.worker", strip = index, ticks, "halo ring closed");
                return;
            }
        };
        for (channel, row) in [("halo_up", &top), ("halo_down", &bottom)] {
            if row.len() != row_bytes {
                let violation = PipelineError::Protocol {
                    channel,
                    expected: row_bytes,
                    got: row.len(),
                };
                error!(target: "pipeline.worker", strip = index, %violation, "tearing down");
                return;
            }
        }

        kernel.step(&mut state, &top, &bottom);
        let packed = kernel.export_packed(&state);
        if send_edge_rows(&links, &packed, row_bytes).is_err() {
            debug!(target: "pipeline.worker", strip = index, ticks, "halo ring closed");
            return;
        }

        ticks += 1;
        if ticks % frameskip == 0 {
            trace!(target: "pipeline.worker", strip = index, ticks, "frame out");
            if frame_tx.send(packed).is_err() {
                debug!(target: "pipeline.worker", strip = index, ticks, "frame channel closed");
                return;
            }
        }
    }
}
