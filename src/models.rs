use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::status;

/// Length in bytes of a contact's long-term public identifier
pub const PUBLIC_ID_SIZE: usize = 32;

/// A contact's self-reported availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceStatus {
    None,
    Away,
    Busy,
    Invalid, // Decode and encode fallback, never an error
}

impl PresenceStatus {
    /// Map a raw status code reported by the messaging core
    pub fn from_core(raw: u8) -> Self {
        match raw {
            0 => PresenceStatus::None,
            1 => PresenceStatus::Away,
            2 => PresenceStatus::Busy,
            _ => PresenceStatus::Invalid,
        }
    }

    /// Raw code understood by the messaging core
    pub fn to_core(self) -> Option<u8> {
        match self {
            PresenceStatus::None => Some(0),
            PresenceStatus::Away => Some(1),
            PresenceStatus::Busy => Some(2),
            PresenceStatus::Invalid => None,
        }
    }
}

impl Serialize for PresenceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(status::to_wire_string(*self))
    }
}

impl<'de> Deserialize<'de> for PresenceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = String::deserialize(deserializer)?;
        Ok(status::from_wire_string(&wire))
    }
}

/// One entry of a friend list snapshot, as sent to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub number: i32,
    #[serde(rename = "id")]
    pub public_id: String,
    pub chat: Vec<String>,
    pub name: String,
    pub status: PresenceStatus,
    pub status_msg: String,
    pub online: bool,
}

/// Outcome of a single best-effort field query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLookup<T> {
    Value(T),
    Unavailable,
}

impl<T> FieldLookup<T> {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FieldLookup::Unavailable)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            FieldLookup::Value(v) => Some(v),
            FieldLookup::Unavailable => None,
        }
    }

    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            FieldLookup::Value(v) => v,
            FieldLookup::Unavailable => fallback,
        }
    }
}

impl<T: Default> FieldLookup<T> {
    /// The value, or the zero value when the lookup failed
    pub fn unwrap_or_default(self) -> T {
        self.unwrap_or(T::default())
    }
}

impl<T, E> From<Result<T, E>> for FieldLookup<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => FieldLookup::Value(v),
            Err(_) => FieldLookup::Unavailable,
        }
    }
}
