//! Strip-parallel evaluation pipeline.
//!
//! `K` worker threads each own one horizontal strip of the canvas and
//! exchange halo rows around a toroidal ring every generation; `K` blitter
//! threads expand finished strips to RGBA; capacity-1 queues hand the
//! surfaces to a presenter, which therefore always sees one consistent
//! generation across all strips. The [`Pipeline`] type owns spawn order and
//! the deadlock-free shutdown sequence.

use thiserror::Error;

mod blitter;
mod halo;
mod pipeline;
mod stop;
mod worker;

pub use blitter::{convert, Palette, RgbaFrame};
pub use pipeline::{Pipeline, PipelineConfig};
pub use stop::StopFlag;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Geometry(#[from] core_life::GeometryError),
    #[error("frameskip must be at least 1")]
    BadFrameskip,
    #[error("expected {expected} strip seeds, got {got}")]
    SeedCount { expected: usize, got: usize },
    #[error("seed for strip {strip} has {got} bytes, expected {expected}")]
    SeedSize {
        strip: usize,
        expected: usize,
        got: usize,
    },
    #[error("message on {channel} channel has {got} bytes, expected {expected}")]
    Protocol {
        channel: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("failed to spawn pipeline thread")]
    Spawn(#[from] std::io::Error),
}
