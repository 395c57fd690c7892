// src/messaging/memory.rs
//! In-process messaging core
//!
//! Holds a friend table in memory and exports it as a small binary blob. It is
//! what the `toxbridge` binary drives and what the tests use as a stand-in for
//! a networked core. Connection flags are runtime-only and are not persisted.

use log::debug;
use serde::{Deserialize, Serialize};

use super::MessagingCore;
use crate::error::CoreError;
use crate::models::PUBLIC_ID_SIZE;

/// Leading bytes of every exported state blob
pub const STATE_MAGIC: &[u8; 4] = b"TXB1";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MemoryFriend {
    number: i32,
    public_id: [u8; PUBLIC_ID_SIZE],
    name: String,
    status: u8,
    status_message: Vec<u8>,
    #[serde(skip)]
    connected: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoredState {
    self_status: u8,
    friends: Vec<MemoryFriend>,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryCore {
    state: StoredState,
}

impl MemoryCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a friend and return the number the core assigned
    ///
    /// Numbers are the lowest value not currently in use, so a removed
    /// friend's number may be handed out again.
    pub fn add_friend(&mut self, public_id: [u8; PUBLIC_ID_SIZE], name: &str) -> Result<i32, CoreError> {
        if self.state.friends.iter().any(|f| f.public_id == public_id) {
            return Err(CoreError::InvalidInput(format!(
                "friend {} already exists",
                hex::encode_upper(public_id)
            )));
        }

        let mut number = 0;
        while self.state.friends.iter().any(|f| f.number == number) {
            number += 1;
        }

        self.state.friends.push(MemoryFriend {
            number,
            public_id,
            name: name.to_string(),
            status: 0,
            status_message: Vec::new(),
            connected: false,
        });
        debug!("Added friend {} as number {}", name, number);
        Ok(number)
    }

    pub fn remove_friend(&mut self, friend: i32) -> Result<(), CoreError> {
        let before = self.state.friends.len();
        self.state.friends.retain(|f| f.number != friend);
        if self.state.friends.len() == before {
            return Err(CoreError::FriendNotFound(friend));
        }
        Ok(())
    }

    pub fn set_connected(&mut self, friend: i32, connected: bool) -> Result<(), CoreError> {
        self.friend_mut(friend)?.connected = connected;
        Ok(())
    }

    /// Record a friend's raw status code as reported by the network
    pub fn set_friend_status(&mut self, friend: i32, raw: u8) -> Result<(), CoreError> {
        self.friend_mut(friend)?.status = raw;
        Ok(())
    }

    pub fn set_status_message(&mut self, friend: i32, message: &[u8]) -> Result<(), CoreError> {
        self.friend_mut(friend)?.status_message = message.to_vec();
        Ok(())
    }

    pub fn self_status(&self) -> u8 {
        self.state.self_status
    }

    fn friend(&self, friend: i32) -> Result<&MemoryFriend, CoreError> {
        self.state
            .friends
            .iter()
            .find(|f| f.number == friend)
            .ok_or(CoreError::FriendNotFound(friend))
    }

    fn friend_mut(&mut self, friend: i32) -> Result<&mut MemoryFriend, CoreError> {
        self.state
            .friends
            .iter_mut()
            .find(|f| f.number == friend)
            .ok_or(CoreError::FriendNotFound(friend))
    }
}

impl MessagingCore for MemoryCore {
    fn friend_list(&self) -> Result<Vec<i32>, CoreError> {
        Ok(self.state.friends.iter().map(|f| f.number).collect())
    }

    fn public_id(&self, friend: i32) -> Result<[u8; PUBLIC_ID_SIZE], CoreError> {
        Ok(self.friend(friend)?.public_id)
    }

    fn name(&self, friend: i32) -> Result<String, CoreError> {
        Ok(self.friend(friend)?.name.clone())
    }

    fn is_connected(&self, friend: i32) -> Result<bool, CoreError> {
        Ok(self.friend(friend)?.connected)
    }

    fn user_status(&self, friend: i32) -> Result<u8, CoreError> {
        Ok(self.friend(friend)?.status)
    }

    fn status_message(&self, friend: i32) -> Result<Vec<u8>, CoreError> {
        Ok(self.friend(friend)?.status_message.clone())
    }

    fn set_user_status(&mut self, raw: u8) -> Result<(), CoreError> {
        if raw > 2 {
            return Err(CoreError::InvalidInput(format!("unknown status code {}", raw)));
        }
        self.state.self_status = raw;
        Ok(())
    }

    fn load_state(&mut self, data: &[u8]) -> Result<(), CoreError> {
        let body = data
            .strip_prefix(STATE_MAGIC.as_slice())
            .ok_or_else(|| CoreError::InvalidState("missing state header".to_string()))?;
        let state: StoredState =
            bincode::deserialize(body).map_err(|e| CoreError::InvalidState(e.to_string()))?;

        // Only swap in a fully decoded table
        self.state = state;
        debug!("Imported state with {} friends", self.state.friends.len());
        Ok(())
    }

    fn save_state(&self) -> Result<Vec<u8>, CoreError> {
        let body = bincode::serialize(&self.state).map_err(|e| CoreError::ExportFailed(e.to_string()))?;
        let mut data = Vec::with_capacity(STATE_MAGIC.len() + body.len());
        data.extend_from_slice(STATE_MAGIC);
        data.extend_from_slice(&body);
        Ok(data)
    }
}
