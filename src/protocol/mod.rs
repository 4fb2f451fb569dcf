//! NMEA 2000 protocol layer: transmitted message encoders and the CAN
//! transport underneath them.
pub mod messages;
pub mod transport;
