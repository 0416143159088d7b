//! Cellular-automaton core: strip geometry, derived masks, rule
//! descriptors, and the SWAR step kernel.
//!
//! The representation packs 8 cells into 32 bits (one nibble per cell) and
//! advances a whole strip per wide-integer operation; see [`kernel`] for the
//! algorithm and [`geometry`] for the layout constants everything else
//! hangs off.

pub mod geometry;
pub mod kernel;
pub mod masks;
pub mod pack;
pub mod rule;

pub use geometry::{partition, GeometryError, StripBand, StripGeometry, DEFAULT_PADDING};
pub use kernel::StepKernel;
pub use masks::StripMasks;
pub use rule::Rule;
