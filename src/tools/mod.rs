//! Command-line helpers for the pitch analyzer.
//!
//! This module is gated behind the `tools` feature flag.

pub mod demo;
