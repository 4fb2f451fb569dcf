//! Infrastructure layer shared by the message encoders.
pub mod codec;
pub mod units;
