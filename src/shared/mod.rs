//! Shared utilities used across layers.

pub mod error;
