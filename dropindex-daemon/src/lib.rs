//! # dropindex-daemon
//!
//! Long-running side of dropindex: one tokio task per configured manifest or
//! notifier, each a sleep loop that stops on ctrl-c.
//!
//! - [`ManifestScheduler`] republishes a drop folder's HTML manifest every interval
//! - [`NotificationScheduler`] alerts on names never seen before in a watched folder
//! - [`sink`] holds the alert destinations

mod error;
pub mod manifest;
pub mod notifier;
mod runtime;
pub mod sink;

pub use error::DaemonError;
pub use manifest::ManifestScheduler;
pub use notifier::{Clock, NotificationScheduler, NotifyOutcome, SystemClock};
pub use runtime::{init_tracing, run, run_with_shutdown, start_blocking, LogFormat};
pub use sink::{sink_for, Acknowledgement, CommandSink, ConsoleSink, Notification, NotificationSink};
