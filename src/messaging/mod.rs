// src/messaging/mod.rs
//! Seam to the messaging core
//!
//! The messaging core (connections, encryption, routing) lives outside this
//! crate. Everything here talks to it through `MessagingCore`, and shares a
//! single instance through `CoreHandle`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{BridgeError, CoreError};
use crate::models::PUBLIC_ID_SIZE;

pub mod memory;

pub use memory::MemoryCore;

/// Operations the bridge needs from the messaging core
///
/// Every per-friend query is an independent call and may fail on its own.
pub trait MessagingCore {
    /// Friend numbers in the core's own order
    fn friend_list(&self) -> Result<Vec<i32>, CoreError>;

    fn public_id(&self, friend: i32) -> Result<[u8; PUBLIC_ID_SIZE], CoreError>;

    fn name(&self, friend: i32) -> Result<String, CoreError>;

    fn is_connected(&self, friend: i32) -> Result<bool, CoreError>;

    /// Raw user status code, see `PresenceStatus::from_core`
    fn user_status(&self, friend: i32) -> Result<u8, CoreError>;

    /// Status message bytes as stored by the core, not necessarily UTF-8
    fn status_message(&self, friend: i32) -> Result<Vec<u8>, CoreError>;

    /// Set our own status from a raw code
    fn set_user_status(&mut self, raw: u8) -> Result<(), CoreError>;

    /// Replace the whole core state with an exported blob (all-or-nothing)
    fn load_state(&mut self, data: &[u8]) -> Result<(), CoreError>;

    /// Export the whole core state
    fn save_state(&self) -> Result<Vec<u8>, CoreError>;
}

/// Shared, lock-guarded access to one messaging core
///
/// Snapshots and saves take the read side; state import and presence
/// changes take the write side.
pub struct CoreHandle<C> {
    inner: Arc<RwLock<C>>,
}

impl<C> Clone for CoreHandle<C> {
    fn clone(&self) -> Self {
        CoreHandle { inner: Arc::clone(&self.inner) }
    }
}

impl<C: MessagingCore> CoreHandle<C> {
    pub fn new(core: C) -> Self {
        CoreHandle { inner: Arc::new(RwLock::new(core)) }
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, C>, BridgeError> {
        self.inner.read().map_err(|_| BridgeError::CorePoisoned)
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, C>, BridgeError> {
        self.inner.write().map_err(|_| BridgeError::CorePoisoned)
    }
}
