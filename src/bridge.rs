// timberlog: single-sink leveled logging
// bridge.rs - Route the `log` facade into the process-wide logger

use log::{LevelFilter, Log, Metadata, Record};

use crate::error::Result;
use crate::global;
use crate::level::Severity;

/// `log::Log` adapter over the process-wide logger.
///
/// Filtering uses the process-wide threshold. The facade has no FATAL
/// level, so nothing routed through here terminates the process.
pub struct LogBridge;

static BRIDGE: LogBridge = LogBridge;

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        global::is_enabled(Severity::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        let level = Severity::from(record.level());
        if global::is_enabled(level) {
            global::log(level, *record.args());
        }
    }

    // Every entry is flushed when written.
    fn flush(&self) {}
}

/// Install the bridge as the `log` crate's logger.
///
/// Fails with [`crate::Error::AlreadyInstalled`] if any logger was set before.
pub fn install() -> Result<()> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
