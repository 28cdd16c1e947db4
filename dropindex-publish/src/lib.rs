//! # dropindex-publish
//!
//! Manifest cycle orchestration and the atomic output writer.
//!
//! Call [`ManifestPipeline::run_cycle`] to scan a drop folder, render the
//! document and publish it to an [`OutputSink`] (normally a [`FileSink`]).

pub mod error;
pub mod pipeline;
pub mod writer;

pub use error::PublishError;
pub use pipeline::{CycleReport, ManifestPipeline};
pub use writer::{atomic_write, FileSink, OutputSink, WriteResult};
