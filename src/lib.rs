//! `engine-gateway-n2k`: the telemetry-publishing core of an engine-monitoring
//! NMEA 2000 gateway, for `no_std` environments. The crate exposes the
//! infrastructure modules (wire codec, unit conversions), the protocol layer
//! (CAN identifiers, Fast Packet framing, message encoders), the collaborator
//! interfaces (sensors, operator port), and the multi-rate publication
//! scheduler that ties them together.
#![no_std]
//==================================================================================
/// Domain and low-level errors (CAN identifier construction, payload
/// encoding, transmission, and related issues).
pub mod error;
/// Wire-level building blocks: payload writer and unit conversions.
pub mod infra;
/// NMEA 2000 protocol implementation: CAN transport, Fast Packet framing,
/// and the engine/battery/environment message encoders.
pub mod protocol;
/// Multi-rate publication scheduler, engine-running hysteresis, and the
/// diagnostic dump.
pub mod publisher;
/// Pull-style collaborator interfaces: engine sensors, atmospheric sensor,
/// and the operator text channel.
pub mod sensors;
//==================================================================================
