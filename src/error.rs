// src/error.rs
//! Error types for the bridge layer
//!
//! `BridgeError` is what crosses the HTTP boundary and gets rendered through
//! the error envelope. `CoreError` is reported by the messaging core itself.
//! `EntropyError` is kept apart on purpose: it is never rendered for a
//! client, the process supervisor decides what to do with it.

use std::io;
use thiserror::Error;

/// Errors reported by the messaging core
#[derive(Debug, Error)]
pub enum CoreError {
    /// The core has no friend with this number
    #[error("No friend with number {0}")]
    FriendNotFound(i32),

    /// The state blob handed to the core could not be imported
    #[error("Invalid state data: {0}")]
    InvalidState(String),

    /// The core could not serialize its state
    #[error("State export failed: {0}")]
    ExportFailed(String),

    /// The core rejected a value (bad status code, bad id length, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Any other failure inside the core
    #[error("Core failure: {0}")]
    Other(String),
}

/// Errors that propagate to the caller and are rendered at the boundary
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A load or save was requested with a zero-length path
    #[error("Empty path")]
    EmptyPath,

    /// Reading or writing the state file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The core refused the state blob
    #[error("Core import failed: {0}")]
    CoreImport(#[source] CoreError),

    /// The core could not produce a state blob
    #[error("Core export failed: {0}")]
    CoreExport(#[source] CoreError),

    /// The core could not list its contacts
    #[error("Could not enumerate friends: {0}")]
    Enumeration(#[source] CoreError),

    /// A presence wire string that does not name a settable status
    #[error("Invalid status: {0:?}")]
    InvalidStatus(String),

    /// The core rejected a presence change
    #[error("Could not update status: {0}")]
    StatusUpdate(#[source] CoreError),

    /// A lock around the core handle was poisoned by a panicking holder
    #[error("Messaging core handle is poisoned")]
    CorePoisoned,

    /// Rendering a response body failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BridgeError {
    /// Machine-readable code for the error envelope
    ///
    /// `None` means the failure is uncategorized and must be reported with
    /// the default envelope instead of leaking internal detail.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            BridgeError::EmptyPath => Some("empty_path"),
            BridgeError::Io(_) => Some("io_failure"),
            BridgeError::CoreImport(_) => Some("core_import_failure"),
            BridgeError::CoreExport(_) => Some("core_export_failure"),
            BridgeError::Enumeration(_) => Some("enumeration_failure"),
            BridgeError::InvalidStatus(_) => Some("invalid_status"),
            BridgeError::StatusUpdate(_) => Some("status_update_failure"),
            BridgeError::CorePoisoned | BridgeError::Serialization(_) => None,
        }
    }
}

/// The operating system entropy source could not supply bytes
#[derive(Debug, Error)]
#[error("Entropy source failure: {0}")]
pub struct EntropyError(#[from] pub rand::Error);

pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
