//! # Weather EPD Application Entry Point
//!
//! Fetches a report (or synthesises one when offline), renders the dashboard
//! into an in-memory tri-colour frame buffer and writes it out as a PNG.
//! `--stdout` additionally prints an ASCII preview for development without a
//! panel.

#[cfg(test)]
mod tests;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use weather_epd::{
    canvas::Canvas, config::Config, config::CONFIG_FILE, dashboard::render_dashboard, fallback,
    framebuffer::FrameBuffer, weather_data, WeatherSnapshot,
};

/// Render a weather dashboard for a tri-colour e-paper panel.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// PNG file to write the rendered frame to
    #[arg(short, long, default_value = "weather.png")]
    output: PathBuf,

    /// Also print an ASCII preview of the frame
    #[arg(long)]
    stdout: bool,

    /// Skip the network and render the synthetic offline report
    #[arg(long)]
    offline: bool,

    /// Outline measured text bounds
    #[arg(long)]
    outline: bool,

    /// Horizontal downsampling of the ASCII preview
    #[arg(long, default_value_t = 4)]
    ascii_scale: u32,
}

fn load_snapshot(config: &Config, offline: bool) -> anyhow::Result<WeatherSnapshot> {
    if offline {
        info!("Offline mode requested");
        return Ok(fallback::approximate(None));
    }

    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(async {
        weather_data::fetch(config).await.unwrap_or_else(|error| {
            warn!("Weather fetch failed: {}", error);
            warn!("Falling back to offline weather model");
            fallback::approximate(None)
        })
    }))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = Config::load_from_path(&args.config);
    config.display.outline_text |= args.outline;

    let snapshot = load_snapshot(&config, args.offline)?;

    let mut frame = FrameBuffer::new(config.display.width, config.display.height);
    {
        let mut canvas = Canvas::new(&mut frame);
        render_dashboard(&mut canvas, &snapshot, &config, Utc::now());
    }

    frame
        .save_png(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!("Frame written to {}", args.output.display());

    if args.stdout {
        print!("{}", frame.to_ascii(args.ascii_scale));
    }

    Ok(())
}
