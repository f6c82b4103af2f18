use std::io;
use crate::session::Report;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing the save file
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("file was not opened properly for {action}: {path}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file could not be read: {path}")]
    Malformed { path: PathBuf },
}

/// Why tree growth stopped early
#[derive(Debug, Error)]
pub enum GrowError {
    /// The user asked to quit; unwinds every branch and ends the session
    #[error("interrupted by key press")]
    Cancelled,
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// The terminal failed partway through a session. `report` holds what had
/// been grown so the tree can still be saved.
#[derive(Debug, Error)]
#[error("terminal error: {source}")]
pub struct SessionError {
    pub report: Report,
    #[source]
    pub source: io::Error,
}
