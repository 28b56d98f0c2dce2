//! Python bindings for the `bigleaf` canopy engine.
//!
//! Re-exports the core crate for Rust users and exposes a NumPy-based daily
//! simulation entry point to Python.

pub use bigleaf_core::*;

pub mod python;
