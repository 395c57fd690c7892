// src/snapshot.rs
//! Friend list snapshots
//!
//! A snapshot is built fresh for every request from independent per-friend
//! queries. Only the enumeration step can fail the whole snapshot; a failed
//! detail lookup degrades that one field to its zero value, is logged and is
//! counted in `field_fallback_count`.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error, warn};

use crate::messaging::{CoreHandle, MessagingCore};
use crate::error::{BridgeError, BridgeResult, CoreError};
use crate::models::{ContactRecord, FieldLookup, PresenceStatus, PUBLIC_ID_SIZE};

static FIELD_FALLBACKS: AtomicU64 = AtomicU64::new(0);

/// Number of per-field lookups that fell back to a zero value since start
pub fn field_fallback_count() -> u64 {
    FIELD_FALLBACKS.load(Ordering::Relaxed)
}

/// Per-friend query results before zero-value fallback
#[derive(Debug, Clone, PartialEq)]
pub struct ContactLookup {
    pub number: i32,
    pub public_id: FieldLookup<[u8; PUBLIC_ID_SIZE]>,
    pub name: FieldLookup<String>,
    pub online: FieldLookup<bool>,
    pub status: FieldLookup<u8>,
    pub status_msg: FieldLookup<Vec<u8>>,
}

impl ContactLookup {
    /// Names of the fields whose lookup failed
    pub fn unavailable_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.public_id.is_unavailable() {
            fields.push("id");
        }
        if self.name.is_unavailable() {
            fields.push("name");
        }
        if self.online.is_unavailable() {
            fields.push("online");
        }
        if self.status.is_unavailable() {
            fields.push("status");
        }
        if self.status_msg.is_unavailable() {
            fields.push("status_msg");
        }
        fields
    }

    pub fn into_record(self) -> ContactRecord {
        let public_id = self.public_id.unwrap_or([0u8; PUBLIC_ID_SIZE]);
        // A failed status lookup reads as the core's zero code, like the other fields
        let status = PresenceStatus::from_core(self.status.unwrap_or_default());
        let status_msg = self.status_msg.unwrap_or_default();

        ContactRecord {
            number: self.number,
            public_id: hex::encode_upper(public_id),
            chat: Vec::new(),
            name: self.name.unwrap_or_default(),
            status,
            status_msg: String::from_utf8_lossy(&status_msg).into_owned(),
            online: self.online.unwrap_or_default(),
        }
    }
}

fn lookup<T>(number: i32, field: &str, result: Result<T, CoreError>) -> FieldLookup<T> {
    if let Err(e) = &result {
        warn!("Lookup of {} for friend {} failed, using empty value: {}", field, number, e);
        FIELD_FALLBACKS.fetch_add(1, Ordering::Relaxed);
    }
    result.into()
}

/// Query every friend's details without collapsing failures
pub fn lookup_contacts<C: MessagingCore + ?Sized>(core: &C) -> BridgeResult<Vec<ContactLookup>> {
    let numbers = core.friend_list().map_err(|e| {
        error!("Failed to enumerate friends: {}", e);
        BridgeError::Enumeration(e)
    })?;

    let contacts: Vec<ContactLookup> = numbers
        .into_iter()
        .map(|number| ContactLookup {
            number,
            public_id: lookup(number, "id", core.public_id(number)),
            name: lookup(number, "name", core.name(number)),
            online: lookup(number, "online", core.is_connected(number)),
            status: lookup(number, "status", core.user_status(number)),
            status_msg: lookup(number, "status_msg", core.status_message(number)),
        })
        .collect();

    debug!("Looked up {} friends", contacts.len());
    Ok(contacts)
}

/// Build the friend list in the core's own order
pub fn build_snapshot<C: MessagingCore + ?Sized>(core: &C) -> BridgeResult<Vec<ContactRecord>> {
    Ok(lookup_contacts(core)?
        .into_iter()
        .map(ContactLookup::into_record)
        .collect())
}

/// Friend list rendered as the JSON body sent to clients
pub fn snapshot_json<C: MessagingCore + ?Sized>(core: &C) -> BridgeResult<String> {
    let records = build_snapshot(core)?;
    Ok(serde_json::to_string(&records)?)
}

/// Build a snapshot while holding the read side of a shared handle
pub fn build_snapshot_shared<C: MessagingCore>(handle: &CoreHandle<C>) -> BridgeResult<Vec<ContactRecord>> {
    let core = handle.read()?;
    build_snapshot(&*core)
}
