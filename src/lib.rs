//! # timberlog
//!
//! A single-sink, leveled, timestamped line logger.
//!
//! ## Features
//!
//! - One sink: standard output (the default), an append-mode file, or a pipe
//! - One minimum severity threshold, INFO by default
//! - Every entry is written as `[YYYY-MM-DD HH:MM:SS] [LEVEL] message` and flushed
//! - FATAL entries terminate the process with status 1 after they are written
//! - Owned [`Logger`] instances for isolation, plus a process-wide logger
//! - Optional bridge for the `log` facade
//!
//! ## Example
//!
//! ```rust,no_run
//! use timberlog::{Severity, Target};
//!
//! fn main() -> Result<(), timberlog::Error> {
//!     timberlog::init(Target::file("app.log"), Severity::Debug)?;
//!
//!     timberlog::info!("hello {}", "world");
//!     timberlog::debug!("cache warmed in {} ms", 12);
//!
//!     timberlog::close();
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod format;
mod level;
mod logger;
mod macros;
mod sink;

pub mod bridge;
pub mod global;

pub use config::{LoggerConfig, FILE_ENV, LEVEL_ENV};
pub use error::{Error, Result};
pub use format::{format_entry, timestamp, TIMESTAMP_FORMAT};
pub use global::{close, fatal_and_exit, init, init_with_config, log};
pub use level::Severity;
pub use logger::{Disposition, Logger, State};
pub use sink::{SinkKind, Target};
