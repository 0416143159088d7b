//! SDL2 window, renderer, and the presenter loop.
//!
//! The presenter owns the main thread: it polls input, pulls one surface
//! per strip per frame from the capacity-1 queues (so a presented frame is
//! always one consistent generation), streams each into that strip's GPU
//! texture, and presents. SDL resources live as locals of [`Video::run`]
//! and unwind-release through their own `Drop` impls on every exit path.

use crate::fps::FpsCounter;
use crate::PlatformError;
use core_life::StripBand;
use core_pipeline::{RgbaFrame, StopFlag};
use crossbeam_channel::Receiver;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use sdl2::{Sdl, VideoSubsystem};
use tracing::{debug, info, trace};

#[derive(Debug, Clone)]
pub struct VideoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub fullscreen: bool,
}

/// An initialised SDL video subsystem. Window and renderer are created
/// later, inside [`Video::run`], so the pipeline can be spawned in between
/// (start order: geometry → channels → workers → blitters → presenter).
pub struct Video {
    sdl: Sdl,
    video: VideoSubsystem,
    config: VideoConfig,
}

/// Quit paths: window close (SDL also maps Ctrl+C here), Escape, Q.
fn wants_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Quit { .. }
            | Event::KeyDown {
                keycode: Some(Keycode::Escape | Keycode::Q),
                ..
            }
    )
}

impl Video {
    pub fn init(config: VideoConfig) -> Result<Self, PlatformError> {
        let sdl = sdl2::init().map_err(PlatformError::Init)?;
        let video = sdl.video().map_err(PlatformError::Init)?;
        Ok(Self { sdl, video, config })
    }

    /// Canvas size in cells. Fullscreen overrides the configured size with
    /// the desktop resolution, clamped to an even width.
    pub fn canvas_size(&self) -> Result<(u32, u32), PlatformError> {
        if !self.config.fullscreen {
            return Ok((self.config.width, self.config.height));
        }
        let mode = self
            .video
            .desktop_display_mode(0)
            .map_err(PlatformError::Init)?;
        let width = (mode.w.max(0) as u32) & !1;
        let height = mode.h.max(0) as u32;
        debug!(target: "platform", width, height, "fullscreen desktop mode");
        Ok((width, height))
    }

    /// Present frames until the user quits or the pipeline disconnects.
    ///
    /// A disconnected surface queue is an error unless the stop flag is
    /// already set, in which case it is the cooperative shutdown path.
    pub fn run(
        &self,
        bands: &[StripBand],
        surfaces: &[Receiver<RgbaFrame>],
        stop: &StopFlag,
        frameskip: u64,
    ) -> Result<(), PlatformError> {
        let (width, height) = self.canvas_size()?;
        let mut builder = self.video.window(&self.config.title, width, height);
        builder.position_centered();
        if self.config.fullscreen {
            builder.fullscreen_desktop();
        }
        let window = builder.build()?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if self.config.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let mut canvas = canvas_builder.build().map_err(PlatformError::Renderer)?;
        let texture_creator = canvas.texture_creator();
        let mut textures = Vec::with_capacity(bands.len());
        for band in bands {
            textures.push(texture_creator.create_texture_streaming(
                PixelFormatEnum::ABGR8888,
                band.geometry.width(),
                band.geometry.height(),
            )?);
        }
        let mut events = self.sdl.event_pump().map_err(PlatformError::Init)?;
        let mut fps = FpsCounter::new();
        info!(target: "platform", width, height, strips = bands.len(), "presenting");

        'present: loop {
            for event in events.poll_iter() {
                if wants_quit(&event) {
                    info!(target: "platform", "quit requested");
                    break 'present;
                }
            }

            for (band, (texture, rx)) in bands.iter().zip(textures.iter_mut().zip(surfaces)) {
                let frame = match rx.recv() {
                    Ok(frame) => frame,
                    Err(_) if stop.is_set() => break 'present,
                    Err(_) => return Err(PlatformError::PipelineClosed),
                };
                texture.update(None, &frame.pixels, frame.pitch())?;
                canvas
                    .copy(
                        texture,
                        None,
                        Rect::new(
                            0,
                            band.y_offset as i32,
                            band.geometry.width(),
                            band.geometry.height(),
                        ),
                    )
                    .map_err(PlatformError::Draw)?;
            }
            canvas.present();

            let rate = fps.tick();
            let tps = rate * frameskip as f64;
            trace!(target: "platform", fps = rate, tps, "frame presented");
            canvas
                .window_mut()
                .set_title(&format!("{} - {rate:.1} fps ({tps:.1} tps)", self.config.title))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdl2::keyboard::Mod;

    fn key_down(keycode: Keycode) -> Event {
        Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(keycode),
            scancode: None,
            keymod: Mod::empty(),
            repeat: false,
        }
    }

    #[test]
    fn quit_event_mapping() {
        assert!(wants_quit(&Event::Quit { timestamp: 0 }));
        assert!(wants_quit(&key_down(Keycode::Escape)));
        assert!(wants_quit(&key_down(Keycode::Q)));
        assert!(!wants_quit(&key_down(Keycode::Space)));
    }
}
