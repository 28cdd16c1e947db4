//! # dropindex-scanner
//!
//! Read-only filesystem inspection for both engines:
//!
//! - [`snapshot::scan`] walks a drop folder into a [`Manifest`](dropindex_core::Manifest)
//! - [`changes::ChangeDetector`] turns successive folder listings into deltas
//!
//! All reads go through [`reader::DirectoryReader`]; [`FsReader`] is the
//! `std::fs` implementation and [`TimeoutReader`] bounds each read of another
//! reader.

pub mod changes;
pub mod error;
pub mod reader;
pub mod snapshot;

pub use changes::{read_listing, ChangeDelta, ChangeDetector, DetectorState};
pub use error::ScanError;
pub use reader::{DirEntryInfo, DirectoryReader, EntryKind, FsReader, TimeoutReader};
pub use snapshot::{scan, ScanIssue, Snapshot};
