//! Departure board simulator for desktop.
//!
//! Runs the board engine in an `embedded-graphics-simulator` window, fed by
//! the demo data source. Close the window or press `Escape`/`Q` to quit.
//!
//! Logging follows `RUST_LOG` (default `info`); settings come from `BOARD_*`
//! environment variables, see [`config`].

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod config;
mod demo;
mod window;

use std::fs;
use std::sync::mpsc::TryRecvError;
use std::time::Instant;

use anyhow::Context;
use board_common::controller::FrameController;
use board_common::feed::{ClockTime, FeedState};
use board_common::metrics::RenderMetrics;
use chrono::{Local, Timelike};
use embedded_graphics::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::SimulatorConfig;
use crate::demo::FeedUpdate;
use crate::window::WindowSurface;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = SimulatorConfig::load().context("invalid BOARD_* configuration")?;
    info!(?config, "starting simulator");

    let size = Size::new(config.board.display_width, config.board.display_height);
    let mut surface = WindowSurface::open(&config.board.title, size, config.scale);

    let start = Instant::now();
    let mut controller = FrameController::new(config.board.clone(), start);
    if let Some(path) = &config.icon_strip {
        let bytes = fs::read(path).with_context(|| format!("cannot read icon strip {}", path.display()))?;
        controller = controller.with_icon_strip(&bytes, config.icon_frame_width);
    }

    let (updates, _feed) = demo::spawn(config.refresh_interval(), config.demo_outage_every);
    let mut feed = FeedState::new(start);

    loop {
        let now = Instant::now();

        loop {
            match updates.try_recv() {
                Ok(FeedUpdate::Snapshot(stations)) => feed.record_success(stations, now),
                Ok(FeedUpdate::Failed) => feed.record_failure(now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("demo feed gone, showing last data");
                    break;
                }
            }
        }

        let status = feed.status(now, local_clock());
        if !controller.tick_at(&mut surface, feed.stations(), &status, now)?.should_continue() {
            break;
        }

        let metrics = controller.metrics();
        if config.metrics_every > 0 && metrics.total_frames % config.metrics_every == 0 {
            log_metrics(metrics);
        }
    }

    log_metrics(controller.metrics());
    info!(failures = feed.failures(), "simulator stopped");
    Ok(())
}

fn local_clock() -> ClockTime {
    let now = Local::now();
    ClockTime::new(now.hour() as u8, now.minute() as u8, now.second() as u8)
}

fn log_metrics(metrics: &RenderMetrics) {
    info!(
        uptime = %metrics.uptime_string(),
        frames = metrics.total_frames,
        frame_avg_us = metrics.frame_time_avg_us(),
        frame_max_us = metrics.frame_time_max_us,
        render_us = metrics.render_time_us,
        rows = metrics.rows_drawn,
        recovered = metrics.recovered_total(),
        labels = metrics.labels_live,
        cache_entries = metrics.cache_entries,
        cache_hits = metrics.cache_hits,
        cache_misses = metrics.cache_misses,
        "render metrics"
    );
}
