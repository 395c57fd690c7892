// Presence status mapping between the messaging core and the JSON wire format

use crate::models::PresenceStatus;

pub const WIRE_NONE: &str = "NONE";
pub const WIRE_AWAY: &str = "AWAY";
pub const WIRE_BUSY: &str = "BUSY";
pub const WIRE_INVALID: &str = "INVALID";

/// Render a presence value for clients
pub fn to_wire_string(status: PresenceStatus) -> &'static str {
    match status {
        PresenceStatus::None => WIRE_NONE,
        PresenceStatus::Away => WIRE_AWAY,
        PresenceStatus::Busy => WIRE_BUSY,
        PresenceStatus::Invalid => WIRE_INVALID,
    }
}

/// Parse a presence value sent by a client
///
/// Matching is exact and case-sensitive. Anything unrecognized is
/// `PresenceStatus::Invalid`, never an error.
pub fn from_wire_string(wire: &str) -> PresenceStatus {
    match wire {
        WIRE_NONE => PresenceStatus::None,
        WIRE_AWAY => PresenceStatus::Away,
        WIRE_BUSY => PresenceStatus::Busy,
        _ => PresenceStatus::Invalid,
    }
}

/// Render a raw core status code for clients
pub fn core_to_wire_string(raw: u8) -> &'static str {
    to_wire_string(PresenceStatus::from_core(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_defined_values() {
        for status in [PresenceStatus::None, PresenceStatus::Away, PresenceStatus::Busy] {
            assert_eq!(from_wire_string(to_wire_string(status)), status);
        }
    }

    #[test]
    fn test_unknown_strings_are_invalid() {
        for wire in ["", "none", "Away", "ONLINE", "INVALID", " BUSY", "BUSY\n"] {
            assert_eq!(from_wire_string(wire), PresenceStatus::Invalid, "{:?}", wire);
        }
    }

    #[test]
    fn test_unknown_core_values_render_invalid() {
        assert_eq!(to_wire_string(PresenceStatus::Invalid), "INVALID");
        assert_eq!(core_to_wire_string(3), "INVALID");
        assert_eq!(core_to_wire_string(200), "INVALID");
        assert_eq!(core_to_wire_string(1), "AWAY");
    }
}
