//! Rendering and animation engine for a live departure board.
//!
//! This crate contains everything that decides what a frame looks like,
//! independent of the display it ends up on:
//!
//! - [`snapshot`]: Station and departure records as delivered by the data source
//! - [`feed`]: Liveness tracking, clock and staleness readout
//! - [`layout`]: Column split and row geometry
//! - [`departure`]: Row coloring rules and station column rendering
//! - [`chrome`]: Header, legend and divider
//! - [`scroll`]: Marquee labels for long directions
//! - [`icon`]: Connectivity icon animation
//! - [`cache`]: Memoized text rasterization
//! - [`controller`]: The fixed-rate frame loop
//! - [`surface`]: The seam between the engine and a concrete display
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Instant;
//!
//! use board_common::controller::FrameController;
//! use board_common::feed::FeedStatus;
//! use board_common::framebuffer::FrameBuffer;
//! use board_common::{BoardConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
//! use embedded_graphics::prelude::Size;
//!
//! let mut surface = FrameBuffer::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
//! let mut controller = FrameController::new(BoardConfig::default(), Instant::now());
//! while controller.tick(&mut surface, &[], &FeedStatus::default())?.should_continue() {}
//! # Ok::<(), board_common::error::SurfaceError>(())
//! ```

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod blink;
pub mod cache;
pub mod chrome;
pub mod colors;
pub mod config;
pub mod controller;
pub mod departure;
pub mod error;
pub mod feed;
pub mod fonts;
pub mod framebuffer;
pub mod icon;
pub mod layout;
pub mod metrics;
pub mod raster;
pub mod scroll;
pub mod snapshot;
pub mod surface;

// Re-export commonly used items
pub use colors::*;
pub use config::*;
pub use controller::{ControllerState, FrameController, Pacing};
pub use error::{AssetError, RecordError, SurfaceError};
pub use snapshot::{DepartureRecord, DisruptionKind, DisruptionRecord, ProductKind, StationSnapshot};
pub use surface::{InputPoll, Surface};
