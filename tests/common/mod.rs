// Common test utilities for integration tests
// This module contains shared code for all integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Once;

use log::LevelFilter;

use toxbridge::{CoreError, MemoryCore, MessagingCore, PUBLIC_ID_SIZE};

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

pub fn public_id(byte: u8) -> [u8; PUBLIC_ID_SIZE] {
    [byte; PUBLIC_ID_SIZE]
}

/// A memory core populated with three friends: alice (online, AWAY),
/// bob (offline, BUSY) and carol (online, NONE)
pub fn three_friend_core() -> MemoryCore {
    let mut core = MemoryCore::new();
    let alice = core.add_friend(public_id(0xa1), "alice").unwrap();
    let bob = core.add_friend(public_id(0xb2), "bob").unwrap();
    let carol = core.add_friend(public_id(0xc3), "carol").unwrap();

    core.set_connected(alice, true).unwrap();
    core.set_friend_status(alice, 1).unwrap();
    core.set_status_message(alice, b"coffee").unwrap();

    core.set_friend_status(bob, 2).unwrap();
    core.set_status_message(bob, b"in a meeting").unwrap();

    core.set_connected(carol, true).unwrap();
    core
}

/// Wraps a memory core and fails selected queries
#[derive(Default)]
pub struct FlakyCore {
    pub inner: MemoryCore,
    pub fail_enumeration: bool,
    pub fail_name_for: HashSet<i32>,
    pub fail_status_for: HashSet<i32>,
    pub fail_export: bool,
}

impl FlakyCore {
    pub fn new(inner: MemoryCore) -> Self {
        FlakyCore { inner, ..Default::default() }
    }
}

impl MessagingCore for FlakyCore {
    fn friend_list(&self) -> Result<Vec<i32>, CoreError> {
        if self.fail_enumeration {
            return Err(CoreError::Other("friend list unavailable".to_string()));
        }
        self.inner.friend_list()
    }

    fn public_id(&self, friend: i32) -> Result<[u8; PUBLIC_ID_SIZE], CoreError> {
        self.inner.public_id(friend)
    }

    fn name(&self, friend: i32) -> Result<String, CoreError> {
        if self.fail_name_for.contains(&friend) {
            return Err(CoreError::Other(format!("name of {} unavailable", friend)));
        }
        self.inner.name(friend)
    }

    fn is_connected(&self, friend: i32) -> Result<bool, CoreError> {
        self.inner.is_connected(friend)
    }

    fn user_status(&self, friend: i32) -> Result<u8, CoreError> {
        if self.fail_status_for.contains(&friend) {
            return Err(CoreError::Other(format!("status of {} unavailable", friend)));
        }
        self.inner.user_status(friend)
    }

    fn status_message(&self, friend: i32) -> Result<Vec<u8>, CoreError> {
        self.inner.status_message(friend)
    }

    fn set_user_status(&mut self, raw: u8) -> Result<(), CoreError> {
        self.inner.set_user_status(raw)
    }

    fn load_state(&mut self, data: &[u8]) -> Result<(), CoreError> {
        self.inner.load_state(data)
    }

    fn save_state(&self) -> Result<Vec<u8>, CoreError> {
        if self.fail_export {
            return Err(CoreError::ExportFailed("export disabled".to_string()));
        }
        self.inner.save_state()
    }
}
