// timberlog: single-sink leveled logging
// logger.rs - Logger state machine: init, log, close

use std::fmt;
use std::mem;
use std::process;

use chrono::Local;

use crate::error::{Error, Result};
use crate::format::format_entry;
use crate::level::Severity;
use crate::sink::{Sink, SinkKind, Target};

/// Lifecycle of a logger's sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No sink yet. The first `log` falls back to standard output.
    Unconfigured,
    /// A sink is open.
    Configured,
    /// The sink was released by `close`. The next `log` falls back to standard output.
    Closed,
}

/// What a `log` call did.
#[must_use = "a Fatal disposition means the caller is expected to terminate"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Below the threshold; nothing was written.
    Suppressed,
    /// The entry was written and flushed.
    Written,
    /// A FATAL entry was written and flushed.
    Fatal,
}

enum Slot {
    Unconfigured,
    Open(Sink),
    Closed,
}

/// A single-sink, leveled line logger.
///
/// Each instance owns its sink and threshold, so independent loggers never
/// share state. The process-wide logger in [`crate::global`] wraps one of
/// these behind a mutex.
pub struct Logger {
    slot: Slot,
    threshold: Severity,
}

impl Logger {
    /// Create an unconfigured logger with an INFO threshold
    pub const fn new() -> Self {
        Logger {
            slot: Slot::Unconfigured,
            threshold: Severity::Info,
        }
    }

    /// Point the logger at `target` and set its threshold.
    ///
    /// The threshold is applied even if the target cannot be opened. On
    /// failure the current sink is kept and a diagnostic naming the path is
    /// printed to standard error. On success the previous sink is released.
    pub fn init(&mut self, target: Target, min_level: Severity) -> Result<()> {
        self.threshold = min_level;

        match Sink::open(target) {
            Ok(sink) => {
                if let Slot::Open(previous) = mem::replace(&mut self.slot, Slot::Open(sink)) {
                    previous.release();
                }
                Ok(())
            }
            Err(err) => {
                if let Error::SinkOpen { path, .. } = &err {
                    eprintln!("Error: Could not open log file {}", path.display());
                }
                Err(err)
            }
        }
    }

    /// Write one entry if `level` passes the threshold.
    ///
    /// Never terminates the process: a FATAL entry comes back as
    /// [`Disposition::Fatal`] for the caller to act on. Use [`Logger::fatal`]
    /// to write and exit in one step. Write errors are ignored.
    pub fn log(&mut self, level: Severity, args: fmt::Arguments<'_>) -> Disposition {
        let line = self
            .is_enabled(level)
            .then(|| format_entry(&Local::now(), level, args));
        self.write_rendered(level, line.as_deref())
    }

    /// Write an entry rendered by [`format_entry`].
    ///
    /// `line` is `None` when the caller skipped rendering for a level it saw
    /// as suppressed. The threshold is checked again here.
    pub(crate) fn write_rendered(&mut self, level: Severity, line: Option<&str>) -> Disposition {
        let threshold = self.threshold;
        let sink = self.sink_or_default();
        match line {
            Some(line) if level >= threshold => {
                let _ = sink.write_line(line);
            }
            _ => return Disposition::Suppressed,
        }

        if level == Severity::Fatal {
            Disposition::Fatal
        } else {
            Disposition::Written
        }
    }

    /// Write a FATAL entry, release the sink, and exit with status 1.
    pub fn fatal(&mut self, args: fmt::Arguments<'_>) -> ! {
        let _ = self.log(Severity::Fatal, args);
        self.release_for_exit();
        process::exit(1)
    }

    /// Release a file or pipe sink. No-op for standard output or when no
    /// sink is open, so calling it twice is harmless.
    pub fn close(&mut self) {
        match mem::replace(&mut self.slot, Slot::Closed) {
            Slot::Open(sink) if sink.is_default() => self.slot = Slot::Open(sink),
            Slot::Open(sink) => sink.release(),
            Slot::Unconfigured => self.slot = Slot::Unconfigured,
            Slot::Closed => {}
        }
    }

    pub fn state(&self) -> State {
        match self.slot {
            Slot::Unconfigured => State::Unconfigured,
            Slot::Open(_) => State::Configured,
            Slot::Closed => State::Closed,
        }
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    pub fn set_threshold(&mut self, level: Severity) {
        self.threshold = level;
    }

    /// Whether an entry at `level` would be written.
    pub fn is_enabled(&self, level: Severity) -> bool {
        level >= self.threshold
    }

    /// The kind of sink currently held, if any.
    pub fn sink_kind(&self) -> Option<SinkKind> {
        match &self.slot {
            Slot::Open(sink) => Some(sink.kind()),
            _ => None,
        }
    }

    // process::exit skips destructors, so release explicitly.
    pub(crate) fn release_for_exit(&mut self) {
        if let Slot::Open(sink) = mem::replace(&mut self.slot, Slot::Closed) {
            sink.release();
        }
    }

    fn sink_or_default(&mut self) -> &mut Sink {
        if !matches!(self.slot, Slot::Open(_)) {
            self.slot = Slot::Open(Sink::Stdout);
        }
        match &mut self.slot {
            Slot::Open(sink) => sink,
            _ => unreachable!("slot was just opened"),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("state", &self.state())
            .field("sink", &self.sink_kind())
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use regex::Regex;
    use std::fs;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn entry_pattern(level: &str, message: &str) -> Regex {
        Regex::new(&format!(
            r"^\[\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}}\] \[{}\] {}$",
            level,
            regex::escape(message)
        ))
        .unwrap()
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut logger = Logger::new();
        logger.init(Target::file(&path), Severity::Debug).unwrap();
        assert_eq!(logger.log(Severity::Info, format_args!("hello {}", "world")), Disposition::Written);
        logger.close();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(contents.ends_with('\n'));
        assert!(entry_pattern("INFO", "hello world").is_match(lines[0]), "got {:?}", lines[0]);
    }

    #[test]
    fn test_lazy_default_sink() {
        let mut logger = Logger::new();
        assert_eq!(logger.state(), State::Unconfigured);
        assert_eq!(logger.threshold(), Severity::Info);

        assert_eq!(logger.log(Severity::Info, format_args!("to stdout")), Disposition::Written);
        assert_eq!(logger.state(), State::Configured);
        assert_eq!(logger.sink_kind(), Some(SinkKind::Stdout));
    }

    #[test]
    fn test_suppressed_call_still_resolves_default_sink() {
        let mut logger = Logger::new();
        assert_eq!(logger.log(Severity::Debug, format_args!("quiet")), Disposition::Suppressed);
        assert_eq!(logger.sink_kind(), Some(SinkKind::Stdout));
    }

    #[test]
    fn test_fatal_threshold_boundary() {
        let buffer = SharedBuffer::default();
        let mut logger = Logger::new();
        logger.init(Target::pipe(buffer.clone()), Severity::Fatal).unwrap();

        for level in [Severity::Debug, Severity::Info, Severity::Warning, Severity::Error] {
            assert_eq!(logger.log(level, format_args!("dropped")), Disposition::Suppressed);
        }
        assert_eq!(buffer.contents(), "");

        assert_eq!(logger.log(Severity::Fatal, format_args!("boom")), Disposition::Fatal);
        let contents = buffer.contents();
        assert!(entry_pattern("FATAL", "boom").is_match(contents.trim_end_matches('\n')));
    }

    #[test]
    fn test_close_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut logger = Logger::new();
        logger.close();
        assert_eq!(logger.state(), State::Unconfigured);

        logger.init(Target::file(&path), Severity::Info).unwrap();
        logger.close();
        assert_eq!(logger.state(), State::Closed);
        logger.close();
        assert_eq!(logger.state(), State::Closed);
        assert_eq!(logger.sink_kind(), None);
    }

    #[test]
    fn test_close_keeps_stdout() {
        let mut logger = Logger::new();
        logger.init(Target::Stdout, Severity::Info).unwrap();
        logger.close();
        assert_eq!(logger.state(), State::Configured);
        assert_eq!(logger.sink_kind(), Some(SinkKind::Stdout));
    }

    #[test]
    fn test_log_after_close_falls_back_to_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.log");

        let mut logger = Logger::new();
        logger.init(Target::file(&path), Severity::Info).unwrap();
        let _ = logger.log(Severity::Info, format_args!("first"));
        logger.close();

        let _ = logger.log(Severity::Info, format_args!("second"));
        assert_eq!(logger.sink_kind(), Some(SinkKind::Stdout));

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("first"));
    }

    #[test]
    fn test_failed_init_keeps_previous_sink() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.log");
        let bad = temp_dir.path().join("missing").join("bad.log");

        let mut logger = Logger::new();
        logger.init(Target::file(&good), Severity::Info).unwrap();

        let err = logger.init(Target::file(&bad), Severity::Warning).unwrap_err();
        assert!(matches!(err, Error::SinkOpen { .. }));
        assert_eq!(logger.sink_kind(), Some(SinkKind::File(good.clone())));
        // The threshold is applied regardless of the open result.
        assert_eq!(logger.threshold(), Severity::Warning);

        let _ = logger.log(Severity::Error, format_args!("still here"));
        logger.close();
        assert!(fs::read_to_string(&good).unwrap().contains("[ERROR] still here"));
    }

    #[test]
    fn test_failed_init_when_unconfigured() {
        let temp_dir = TempDir::new().unwrap();
        let bad = temp_dir.path().join("missing").join("bad.log");

        let mut logger = Logger::new();
        assert!(logger.init(Target::file(&bad), Severity::Debug).is_err());
        assert_eq!(logger.state(), State::Unconfigured);

        assert_eq!(logger.log(Severity::Debug, format_args!("fallback")), Disposition::Written);
        assert_eq!(logger.sink_kind(), Some(SinkKind::Stdout));
    }

    #[test]
    fn test_reinit_releases_previous_sink() {
        let first = SharedBuffer::default();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("second.log");

        let mut logger = Logger::new();
        logger.init(Target::pipe(first.clone()), Severity::Info).unwrap();
        let _ = logger.log(Severity::Info, format_args!("one"));

        logger.init(Target::file(&path), Severity::Info).unwrap();
        let _ = logger.log(Severity::Info, format_args!("two"));

        // The pipe was dropped by re-init, leaving this handle as the only owner.
        assert_eq!(Arc::strong_count(&first.0), 1);
        assert!(first.contents().contains("one"));
        assert!(!first.contents().contains("two"));
        assert!(fs::read_to_string(&path).unwrap().contains("two"));
    }

    #[test]
    fn test_closed_logger_can_be_reinitialized() {
        let buffer = SharedBuffer::default();
        let mut logger = Logger::new();
        logger.init(Target::pipe(SharedBuffer::default()), Severity::Info).unwrap();
        logger.close();

        logger.init(Target::pipe(buffer.clone()), Severity::Debug).unwrap();
        assert_eq!(logger.state(), State::Configured);
        let _ = logger.log(Severity::Debug, format_args!("back"));
        assert!(buffer.contents().contains("[DEBUG] back"));
    }

    #[test]
    fn test_threshold_accessors() {
        let mut logger = Logger::default();
        assert!(!logger.is_enabled(Severity::Debug));
        logger.set_threshold(Severity::Debug);
        assert!(logger.is_enabled(Severity::Debug));
        assert!(format!("{:?}", logger).contains("Unconfigured"));
    }

    fn any_severity() -> impl Strategy<Value = Severity> {
        prop::sample::select(Severity::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_written_iff_at_or_above_threshold(level in any_severity(), threshold in any_severity()) {
            let buffer = SharedBuffer::default();
            let mut logger = Logger::new();
            logger.init(Target::pipe(buffer.clone()), threshold).unwrap();

            let disposition = logger.log(level, format_args!("entry"));

            if level >= threshold {
                prop_assert_ne!(disposition, Disposition::Suppressed);
                prop_assert_eq!(buffer.contents().lines().count(), 1);
            } else {
                prop_assert_eq!(disposition, Disposition::Suppressed);
                prop_assert!(buffer.contents().is_empty());
            }
        }
    }
}
