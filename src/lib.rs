//! Weather watch face core.
//!
//! Paints the time, date and a weather summary received from a paired
//! phone, and decides when to repaint. Platform drawing, timers, the
//! data-sync client and timezone notifications sit behind the port traits
//! in [`app::ports`]; [`adapters`] holds host-side implementations.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod error;
pub mod ingest;
pub mod mode;
pub mod payload;
pub mod render;
pub mod scheduler;
pub mod weather;

pub use error::{Error, Result};
