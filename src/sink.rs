// timberlog: single-sink leveled logging
// sink.rs - Output targets and the open sink behind them

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Where a logger should write.
pub enum Target {
    /// The process's standard output stream. Never released by the logger.
    Stdout,
    /// A file opened in append mode, created if missing.
    File(PathBuf),
    /// Any caller-supplied stream. Owned by the logger and dropped on close.
    Pipe(Box<dyn Write + Send>),
}

impl Target {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Target::File(path.into())
    }

    pub fn pipe(writer: impl Write + Send + 'static) -> Self {
        Target::Pipe(Box::new(writer))
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::Stdout
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Stdout => f.write_str("Stdout"),
            Target::File(path) => f.debug_tuple("File").field(path).finish(),
            Target::Pipe(_) => f.write_str("Pipe(..)"),
        }
    }
}

/// What kind of sink a logger currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkKind {
    Stdout,
    File(PathBuf),
    Pipe,
}

/// An open sink. Dropping it releases the underlying resource.
pub(crate) enum Sink {
    Stdout,
    File { path: PathBuf, file: File },
    Pipe(Box<dyn Write + Send>),
}

impl Sink {
    /// Open the resource a target names
    pub(crate) fn open(target: Target) -> Result<Self> {
        match target {
            Target::Stdout => Ok(Sink::Stdout),
            Target::File(path) => {
                let file = open_append(&path).map_err(|source| Error::SinkOpen {
                    path: path.clone(),
                    source,
                })?;
                Ok(Sink::File { path, file })
            }
            Target::Pipe(writer) => Ok(Sink::Pipe(writer)),
        }
    }

    pub(crate) fn kind(&self) -> SinkKind {
        match self {
            Sink::Stdout => SinkKind::Stdout,
            Sink::File { path, .. } => SinkKind::File(path.clone()),
            Sink::Pipe(_) => SinkKind::Pipe,
        }
    }

    /// True for the default stream, which close never releases.
    pub(crate) fn is_default(&self) -> bool {
        matches!(self, Sink::Stdout)
    }

    /// Write one rendered entry and flush it through.
    pub(crate) fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line.as_bytes())?;
                out.flush()
            }
            Sink::File { file, .. } => {
                file.write_all(line.as_bytes())?;
                file.flush()
            }
            Sink::Pipe(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.flush()
            }
        }
    }

    /// Flush and drop. Consuming `self` makes a second release impossible.
    pub(crate) fn release(mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Error: Could not flush log sink: {}", e);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::File { file, .. } => file.flush(),
            Sink::Pipe(writer) => writer.flush(),
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
