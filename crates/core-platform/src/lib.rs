//! Graphics platform layer.
//!
//! Everything the core delegates to SDL2 lives here: video init, desktop
//! display-mode query, window/renderer/texture management, event polling,
//! and the presenter loop that assembles per-strip surfaces into the final
//! window frame. Nothing outside this crate touches SDL types.

use thiserror::Error;

mod fps;
mod video;

pub use fps::FpsCounter;
pub use video::{Video, VideoConfig};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("SDL initialisation failed: {0}")]
    Init(String),
    #[error("window creation failed: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),
    #[error("renderer creation failed: {0}")]
    Renderer(sdl2::IntegerOrSdlError),
    #[error("texture creation failed: {0}")]
    Texture(#[from] sdl2::render::TextureValueError),
    #[error("texture upload failed: {0}")]
    TextureUpdate(#[from] sdl2::render::UpdateTextureError),
    #[error("draw failed: {0}")]
    Draw(String),
    #[error("window title rejected: {0}")]
    Title(#[from] std::ffi::NulError),
    #[error("pipeline disconnected while presenting")]
    PipelineClosed,
}
