// timberlog: single-sink leveled logging
// global.rs - The process-wide logger

use std::cell::Cell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::process;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Local;

use crate::config::LoggerConfig;
use crate::error::{Error, Result};
use crate::format::format_entry;
use crate::level::Severity;
use crate::logger::{Disposition, Logger, State};
use crate::sink::{SinkKind, Target};

static LOGGER: Mutex<Logger> = Mutex::new(Logger::new());

thread_local! {
    static HELD: Cell<bool> = const { Cell::new(false) };
}

/// The locked process-wide logger, marked as held by the current thread.
struct Held(MutexGuard<'static, Logger>);

impl Deref for Held {
    type Target = Logger;

    fn deref(&self) -> &Logger {
        &self.0
    }
}

impl DerefMut for Held {
    fn deref_mut(&mut self) -> &mut Logger {
        &mut self.0
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        HELD.with(|held| held.set(false));
    }
}

// None when this thread already holds the logger, i.e. a pipe writer is
// logging from inside a write. A panic while holding the lock leaves the
// logger itself consistent, so poisoning is ignored.
fn try_lock() -> Option<Held> {
    if HELD.with(Cell::get) {
        return None;
    }
    let guard = LOGGER.lock().unwrap_or_else(PoisonError::into_inner);
    HELD.with(|held| held.set(true));
    Some(Held(guard))
}

/// Configure the process-wide sink and threshold.
///
/// See [`Logger::init`]. A successful call releases the previous sink.
pub fn init(target: Target, min_level: Severity) -> Result<()> {
    try_lock().ok_or(Error::Reentrant)?.init(target, min_level)
}

/// Configure the process-wide logger from a [`LoggerConfig`]
pub fn init_with_config(config: &LoggerConfig) -> Result<()> {
    init(config.target(), config.log_level)
}

/// Write an entry through the process-wide logger.
///
/// The message is rendered before the logger is locked, so a `Display`
/// impl in the arguments may itself log. Entries logged by a pipe writer
/// while it is being written to are dropped.
///
/// Logging at [`Severity::Fatal`] writes and flushes the entry, releases the
/// sink, and terminates the process with status 1.
pub fn log(level: Severity, args: fmt::Arguments<'_>) {
    let line = is_enabled(level).then(|| format_entry(&Local::now(), level, args));

    if let Some(mut logger) = try_lock() {
        if logger.write_rendered(level, line.as_deref()) == Disposition::Fatal {
            exit_with(logger);
        }
    }
}

/// Write a FATAL entry and terminate the process with status 1
pub fn fatal_and_exit(args: fmt::Arguments<'_>) -> ! {
    let line = format_entry(&Local::now(), Severity::Fatal, args);

    match try_lock() {
        Some(mut logger) => {
            let _ = logger.write_rendered(Severity::Fatal, Some(&line));
            exit_with(logger)
        }
        None => process::exit(1),
    }
}

/// Release the process-wide sink if it is a file or pipe
pub fn close() {
    if let Some(mut logger) = try_lock() {
        logger.close();
    }
}

/// Whether an entry at `level` would be written. False from inside a pipe
/// writer, where nested entries are dropped.
pub fn is_enabled(level: Severity) -> bool {
    try_lock().map_or(false, |logger| logger.is_enabled(level))
}

// The accessors below block on the lock and must not be called from a
// pipe writer.

pub fn threshold() -> Severity {
    lock().threshold()
}

pub fn set_threshold(level: Severity) {
    lock().set_threshold(level);
}

pub fn state() -> State {
    lock().state()
}

pub fn sink_kind() -> Option<SinkKind> {
    lock().sink_kind()
}

fn lock() -> MutexGuard<'static, Logger> {
    LOGGER.lock().unwrap_or_else(PoisonError::into_inner)
}

fn exit_with(mut logger: Held) -> ! {
    logger.release_for_exit();
    drop(logger);
    process::exit(1)
}
