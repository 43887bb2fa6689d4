//! Face core: pure display and scheduling logic, zero platform I/O.
//!
//! The [`engine`] reacts to host lifecycle events and inbound weather
//! payloads. All interaction with the platform happens through **port
//! traits** defined in [`ports`], keeping this layer testable with mock
//! adapters.

pub mod commands;
pub mod engine;
pub mod events;
pub mod ports;
