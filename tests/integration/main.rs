//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem against
//! recording mock adapters. Everything runs on the host.

mod engine_tests;
mod mock_host;
