// Setting our own presence from a client request

use log::info;

use crate::messaging::{CoreHandle, MessagingCore};
use crate::error::{BridgeError, BridgeResult};
use crate::models::PresenceStatus;
use crate::status;

/// Apply a presence wire string to the core
///
/// `INVALID` and unrecognized strings are rejected before reaching the core.
pub fn set_presence<C: MessagingCore + ?Sized>(core: &mut C, wire: &str) -> BridgeResult<PresenceStatus> {
    let presence = status::from_wire_string(wire);
    let raw = presence
        .to_core()
        .ok_or_else(|| BridgeError::InvalidStatus(wire.to_string()))?;

    core.set_user_status(raw).map_err(BridgeError::StatusUpdate)?;
    info!("Own status set to {}", status::to_wire_string(presence));
    Ok(presence)
}

pub fn set_presence_shared<C: MessagingCore>(handle: &CoreHandle<C>, wire: &str) -> BridgeResult<PresenceStatus> {
    let mut core = handle.write()?;
    set_presence(&mut *core, wire)
}
