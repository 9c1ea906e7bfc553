//! areaclaim - Geofenced capture-the-area game core

pub mod claim;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod geometry;
pub mod store;
