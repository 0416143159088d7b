//! Lifecycle coordination: spawn order, wiring, and deadlock-free shutdown.

use crate::blitter::{self, BlitterSpec, Palette, RgbaFrame};
use crate::halo;
use crate::stop::StopFlag;
use crate::worker::{self, WorkerSpec};
use crate::PipelineError;
use core_life::{pack, partition, Rule, StepKernel, StripBand};
use crossbeam_channel::{bounded, Receiver};
use std::thread::JoinHandle;
use tracing::{debug, info};

/// Full-canvas configuration for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub strips: usize,
    pub rule: Rule,
    pub frameskip: u64,
    pub palette: Palette,
}

/// A running set of workers and blitters plus the presenter-facing queues.
///
/// Start order is geometry → channels → workers → blitters; the presenter
/// (whoever consumes [`Pipeline::surfaces`]) comes last, outside this type.
pub struct Pipeline {
    bands: Vec<StripBand>,
    surfaces: Vec<Receiver<RgbaFrame>>,
    workers: Vec<JoinHandle<()>>,
    blitters: Vec<JoinHandle<()>>,
    stop: StopFlag,
}

impl Pipeline {
    /// Launch with explicit per-strip seeds (deterministic runs and tests).
    pub fn launch(config: &PipelineConfig, seeds: Vec<Vec<u8>>) -> Result<Self, PipelineError> {
        if config.frameskip < 1 {
            return Err(PipelineError::BadFrameskip);
        }
        let bands = partition(config.width, config.height, config.padding, config.strips)?;
        if seeds.len() != bands.len() {
            return Err(PipelineError::SeedCount {
                expected: bands.len(),
                got: seeds.len(),
            });
        }
        for (band, seed) in bands.iter().zip(&seeds) {
            if seed.len() != band.geometry.state_bytes() {
                return Err(PipelineError::SeedSize {
                    strip: band.index,
                    expected: band.geometry.state_bytes(),
                    got: seed.len(),
                });
            }
        }

        let stop = StopFlag::new();
        let mut links = halo::ring(bands.len());
        let mut workers = Vec::with_capacity(bands.len());
        let mut blitters = Vec::with_capacity(bands.len());
        let mut surfaces = Vec::with_capacity(bands.len());

        for (band, seed) in bands.iter().zip(seeds) {
            let (frame_tx, frame_rx) = bounded(1);
            let (surface_tx, surface_rx) = bounded(1);
            workers.push(worker::spawn(WorkerSpec {
                index: band.index,
                kernel: StepKernel::new(band.geometry, config.rule),
                seed,
                frameskip: config.frameskip,
                links: links.remove(0),
                frame_tx,
                stop: stop.clone(),
            })?);
            blitters.push(blitter::spawn(BlitterSpec {
                index: band.index,
                geometry: band.geometry,
                palette: config.palette,
                frame_rx,
                surface_tx,
                stop: stop.clone(),
            })?);
            surfaces.push(surface_rx);
        }

        info!(
            target: "pipeline",
            width = config.width,
            height = config.height,
            strips = bands.len(),
            frameskip = config.frameskip,
            "pipeline launched"
        );
        Ok(Self {
            bands,
            surfaces,
            workers,
            blitters,
            stop,
        })
    }

    /// Launch with a fresh random soup per strip.
    pub fn launch_random(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let bands = partition(config.width, config.height, config.padding, config.strips)?;
        let seeds = bands
            .iter()
            .map(|band| pack::random_seed(&band.geometry))
            .collect();
        Self::launch(config, seeds)
    }

    pub fn bands(&self) -> &[StripBand] {
        &self.bands
    }

    /// One capacity-1 surface queue per strip, in geometric order.
    pub fn surfaces(&self) -> &[Receiver<RgbaFrame>] {
        &self.surfaces
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Tear everything down without data-loss concerns, in bounded time.
    ///
    /// Order matters: the flag first, then a queue drain so blitters parked
    /// on a full queue can reach their stop check, then the blitter joins
    /// (each drops its frame receiver, unblocking its worker), a residual
    /// drain, and finally the worker joins. Halo channels close by drop.
    pub fn shutdown(mut self) {
        info!(target: "pipeline", "shutdown initiated");
        self.stop.set();
        for rx in &self.surfaces {
            while rx.try_recv().is_ok() {}
        }
        for handle in self.blitters.drain(..) {
            if handle.join().is_err() {
                debug!(target: "pipeline", "blitter thread panicked during shutdown");
            }
        }
        for rx in &self.surfaces {
            while rx.try_recv().is_ok() {}
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                debug!(target: "pipeline", "worker thread panicked during shutdown");
            }
        }
        info!(target: "pipeline", "shutdown complete");
    }
}
