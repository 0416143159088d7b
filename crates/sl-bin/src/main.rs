//! swarlife entrypoint: CLI, logging, wiring, shutdown.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use core_life::{Rule, DEFAULT_PADDING};
use core_pipeline::{Palette, Pipeline, PipelineConfig};
use core_platform::{Video, VideoConfig};
use std::sync::Once;
use tracing::info;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "swarlife", version, about = "SWAR Game of Life on a strip-parallel pipeline")]
struct Args {
    /// Framebuffer width in cells.
    #[arg(long, default_value_t = 1280)]
    width: u32,
    /// Framebuffer height in cells.
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Sync presentation to the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
    /// Fullscreen at desktop resolution; overrides width/height.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    fullscreen: bool,
    /// Use the Drylife variant (B37/S23) instead of Life (B3/S23).
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    drylife: bool,
    /// Present one frame per N simulated generations.
    #[arg(long, default_value_t = 1)]
    frameskip: u64,
    /// Number of strips, one worker thread each.
    #[arg(long, default_value_t = 8)]
    num_procs: usize,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let video = Video::init(VideoConfig {
        title: "swarlife".to_string(),
        width: args.width,
        height: args.height,
        vsync: args.vsync,
        fullscreen: args.fullscreen,
    })
    .context("graphics platform initialisation failed")?;
    let (width, height) = video
        .canvas_size()
        .context("desktop display mode query failed")?;

    let rule = if args.drylife {
        Rule::drylife()
    } else {
        Rule::life()
    };
    let pipeline = Pipeline::launch_random(&PipelineConfig {
        width,
        height,
        padding: DEFAULT_PADDING,
        strips: args.num_procs,
        rule,
        frameskip: args.frameskip,
        palette: Palette::MONOCHROME,
    })
    .context("invalid configuration")?;

    info!(
        target: "runtime.startup",
        width,
        height,
        strips = args.num_procs,
        drylife = args.drylife,
        frameskip = args.frameskip,
        vsync = args.vsync,
        fullscreen = args.fullscreen,
        "bootstrap complete"
    );

    let stop = pipeline.stop_flag();
    let outcome = video.run(pipeline.bands(), pipeline.surfaces(), &stop, args.frameskip);
    pipeline.shutdown();
    outcome.context("presenter failed")?;
    info!(target: "runtime", "bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_contract() {
        let args = Args::try_parse_from(["swarlife"]).unwrap();
        assert_eq!(args.width, 1280);
        assert_eq!(args.height, 720);
        assert!(args.vsync);
        assert!(!args.fullscreen);
        assert!(args.drylife);
        assert_eq!(args.frameskip, 1);
        assert_eq!(args.num_procs, 8);
    }

    #[test]
    fn value_taking_booleans_parse() {
        let args = Args::try_parse_from([
            "swarlife",
            "--vsync",
            "false",
            "--drylife",
            "false",
            "--fullscreen",
            "true",
            "--num-procs",
            "4",
            "--frameskip",
            "8",
        ])
        .unwrap();
        assert!(!args.vsync);
        assert!(!args.drylife);
        assert!(args.fullscreen);
        assert_eq!(args.num_procs, 4);
        assert_eq!(args.frameskip, 8);
    }

    #[test]
    fn garbage_arguments_are_rejected() {
        assert!(Args::try_parse_from(["swarlife", "--width", "wide"]).is_err());
        assert!(Args::try_parse_from(["swarlife", "--unknown"]).is_err());
    }
}
