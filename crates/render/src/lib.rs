#![deny(unsafe_code)]
//! Renderer collaborator for `rdk-core`: projects a [`Snapshot`] onto pixels.
//!
//! The engine emits positions and visibility only. This crate owns the
//! mapping from dot index to drawn disc, so neither side holds a handle into
//! the other. PNG output is gated behind the `png` feature (default on).
//!
//! [`Snapshot`]: rdk_core::Snapshot

pub mod pixel;

#[cfg(feature = "png")]
pub mod frame;

pub use pixel::{rasterize, Style, Viewport};
