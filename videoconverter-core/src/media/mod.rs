//! Media description module
//!
//! This module turns the JSON document produced by ffprobe into typed track
//! tables that the selection and planning stages work from.

pub mod catalog;

// Re-export commonly used types
pub use catalog::{Catalog, Track, TrackKind, build_catalog};
