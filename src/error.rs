//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (CAN ID construction,
//! payload encoding, message transmission).
use thiserror_no_std::Error;

#[derive(Error, Debug)]
/// Errors that can occur while building a 29-bit CAN identifier.
pub enum CanIdBuildError {
    /// Attempt to build a broadcast message (PDU2) with PF < 240.
    #[error("Invalid for broadcast message: PF is too low")]
    InvalidForBroadcast,
    /// Attempt to send an addressed message (PDU1) with PF >= 240.
    #[error("Invalid for addressed message: PF is too high: {pgn}")]
    InvalidForAddressedMessage { pgn: u8 },
    /// In PDU1 the lower 8 bits of the PGN must remain zero.
    #[error("PDU1 PGNs require PS = 0")]
    PsMustBeNullForAddressed,
    /// Payload exceeds the Fast Packet limit and cannot be framed.
    #[error("Payload too long for Fast Packet framing")]
    PayloadTooLong,
}

//==================================================================================ENCODE_ERROR
#[derive(Debug, Error)]
/// Issues encountered while encoding a message into a payload buffer.
pub enum EncodeError {
    /// Provided buffer is too small for the payload.
    #[error("Buffer too small -> needed: {needed}, available: {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

//==================================================================================SEND_ERROR
#[derive(Debug, Error)]
/// Errors encountered when publishing a message (encode + frame + transmit).
pub enum SendMessageError<E: core::fmt::Debug> {
    /// Message encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// CAN identifier or frame sequence could not be built.
    #[error("Frame build failed: {0:?}")]
    Build(CanIdBuildError),
    /// CAN layer refused or failed to send a frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}
