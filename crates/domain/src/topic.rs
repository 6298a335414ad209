//! Fixed messaging topics.

/// Inbound topic carrying trunk toggle requests.
pub const OPEN_TRUNK_REQUEST: &str = "deliveryapp/openTrunk/request";

/// Outbound topic carrying exactly one response per toggle request.
pub const OPEN_TRUNK_RESPONSE: &str = "deliveryapp/openTrunk/response";

/// Outbound topic mirroring every trunk open/closed signal change.
pub const TRUNK_STATE: &str = "deliveryapp/trunkState";
