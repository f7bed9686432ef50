//! Library side of the score card reconciler CLI: settings, logging and the
//! ingest, combine and render pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
