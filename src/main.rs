// src/main.rs

// Declare modules
pub mod config;
pub mod display;
pub mod driver;
pub mod framebuffer;
pub mod geometry;
pub mod math;
pub mod projection;
pub mod renderer;
pub mod shade;
pub mod transform;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    config::Config,
    display::{ConsolePresenter, FrameStyle, TerminalGuard},
    driver::{DriverStatus, FrameDriver},
    framebuffer::FrameBuffer,
    geometry::Torus,
    projection::Projector,
    renderer::Renderer,
    shade::Ramp,
};

/// Entry point: render a rotating torus to the terminal.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    // Zero-argument invocation runs the built-in defaults; one optional
    // argument names a JSON config file.
    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("loading configuration from {}", path.display());
            Config::from_file(&path)?
        }
        None => {
            debug!("no config file given; using defaults");
            Config::default()
        }
    };
    config.validate().context("invalid configuration")?;

    let torus = Torus::new(
        config.torus.tube_radius,
        config.torus.ring_radius,
        config.torus.theta_step,
        config.torus.phi_step,
    )
    .context("invalid torus geometry")?;
    let projector = Projector::new(
        config.screen.width,
        config.screen.height,
        config.camera.distance_to_eye,
        config.camera.distance_to_object,
    )
    .context("invalid camera setup")?;
    let ramp = Ramp::new(&config.shading.ramp).context("invalid brightness ramp")?;
    let renderer = Renderer::new(projector, ramp, config.shading.light);
    let framebuffer = FrameBuffer::new(config.screen.width, config.screen.height);

    let mut style = FrameStyle::empty();
    if config.screen.border {
        style |= FrameStyle::BORDER;
    }
    if config.screen.cursor_home {
        style |= FrameStyle::CURSOR_HOME;
    }

    let guard = TerminalGuard::install().context("failed to prepare terminal")?;
    // Border adds a character on every side.
    let border_cells = if config.screen.border { 2 } else { 0 };
    guard.check_fit(
        config.screen.width + border_cells,
        config.screen.height + border_cells,
    );

    let stdout = io::stdout().lock();
    let presenter = ConsolePresenter::new(stdout, style);
    let mut driver = FrameDriver::new(
        torus,
        renderer,
        framebuffer,
        presenter,
        config.animation.mode,
        config.animation.phases.clone(),
    );

    info!(
        "starting animation: {}x{} grid, {:?} mode",
        config.screen.width, config.screen.height, config.animation.mode
    );
    let frame_delay = std::time::Duration::from_millis(config.animation.frame_delay_ms);
    loop {
        match driver.step().context("frame render failed")? {
            DriverStatus::Running => std::thread::sleep(frame_delay),
            DriverStatus::Done => break,
        }
    }
    info!(
        "animation finished after {} frames",
        driver.frames_rendered()
    );

    Ok(())
}
