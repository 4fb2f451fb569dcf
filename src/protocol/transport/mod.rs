//! NMEA 2000 transport layer: CAN frame representation, 29-bit identifier
//! management, Fast Packet framing, and the bus/clock abstraction traits.

pub mod can_frame;
pub mod can_id;
pub mod fast_packet;
pub mod traits;

/// Minimal delay between two frames of the same Fast Packet message (ms).
///
/// The specification permits back-to-back frames, but a small delay avoids
/// saturating embedded CAN TX buffers (notably ESP32 TWAI with a three-frame
/// buffer) and improves interoperability with slow receivers.
pub const FAST_PACKET_INTER_FRAME_DELAY_MS: u32 = 2;

/// Recommended timeout for sending a single CAN frame (ms).
///
/// [`CanBus`](traits::can_bus::CanBus) implementations should enforce a
/// timeout on `send()` so a faulty or disconnected bus never blocks the
/// publication loop indefinitely. At 250 kbps a frame needs ~0.5 ms without
/// contention and ~10-20 ms under arbitration; 100 ms leaves a wide margin.
pub const CAN_SEND_TIMEOUT_MS: u32 = 100;
