// Bridge between a peer-to-peer messaging core and JSON clients:
// friend list snapshots, state persistence, credentials and error envelopes.
pub mod config;
pub mod messaging;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod models;
pub mod persistence;
pub mod presence;
pub mod snapshot;
pub mod status;

// Re-export main types for convenience
pub use crate::messaging::{CoreHandle, MemoryCore, MessagingCore};
pub use error::{BridgeError, BridgeResult, CoreError, EntropyError};
pub use models::*;
