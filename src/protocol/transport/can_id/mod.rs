//! Creation and extraction of the 29-bit CAN identifiers used by
//! NMEA 2000 (derived from the SAE J1939 specification).
use crate::error::CanIdBuildError;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Extended CAN identifier (29 bits) with accessors for priority, PGN,
/// destination, and source address.
pub struct CanId(pub u32);

impl CanId {
    /// Creates a pre-configured [`CanIdBuilder`] for a PGN and source address.
    pub fn builder(pgn: u32, source_address: u8) -> CanIdBuilder {
        CanIdBuilder::new(pgn, source_address)
    }

    /// Returns the priority (3 bits, value 0-7) encoded in the CAN ID.
    pub fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// Extracts the 18-bit PGN, handling the PDU1/PDU2 distinction.
    pub fn pgn(&self) -> u32 {
        let ps = (self.0 >> 8) & 0xFF;
        let pf = (self.0 >> 16) & 0xFF;
        let dp = (self.0 >> 24) & 0x01;
        let r = (self.0 >> 25) & 0x01;

        if pf >= 240 {
            // PDU2: implicit destination, PS is part of the PGN.
            (r << 17) | (dp << 16) | (pf << 8) | ps
        } else {
            // PDU1: PS carries the explicit destination, not the PGN.
            (r << 17) | (dp << 16) | (pf << 8)
        }
    }

    /// Returns the destination address (PDU1) when the PGN carries one.
    pub fn destination(&self) -> Option<u8> {
        let pf = (self.0 >> 16) & 0xFF;
        if pf >= 240 {
            None
        } else {
            Some(((self.0 >> 8) & 0xFF) as u8)
        }
    }

    /// Eight-bit source address (logical node identifier on the N2K network).
    pub fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug)]
/// Fluent builder that enforces the PDU1/PDU2 rules.
pub struct CanIdBuilder {
    priority: u8,
    pgn: u32,
    source_address: u8,
    destination: Option<u8>,
}

impl CanIdBuilder {
    /// Initializes the builder for a given PGN and source address.
    pub fn new(pgn: u32, source_address: u8) -> Self {
        Self {
            priority: 6, // Default priority
            pgn,
            source_address,
            destination: None,
        }
    }

    /// Sets the priority (3 bits) to use during construction.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority & 0x07;
        self
    }

    /// Assigns a destination address (PDU1). Implies a directed message.
    pub fn to_destination(mut self, destination_address: u8) -> Self {
        self.destination = Some(destination_address);
        self
    }

    /// Builds the CAN identifier while applying the J1939 rules:
    /// - PF < 240 -> addressed message (PDU1): `destination` mandatory and
    ///   the PGN's PS byte must be `0`
    /// - PF >= 240 -> broadcast (PDU2): `destination` must not be provided
    /// - R/DP/PF/PS bits are copied from the provided PGN
    pub fn build(self) -> Result<CanId, CanIdBuildError> {
        let r = (self.pgn >> 17) & 0x01;
        let dp = (self.pgn >> 16) & 0x01;
        let pf = ((self.pgn >> 8) & 0xFF) as u8;
        let ps = (self.pgn & 0xFF) as u8;

        let ps_bits = match self.destination {
            None => {
                if pf < 240 {
                    return Err(CanIdBuildError::InvalidForBroadcast);
                }
                ps
            }
            Some(destination) => {
                if pf >= 240 {
                    return Err(CanIdBuildError::InvalidForAddressedMessage { pgn: pf });
                }
                if ps != 0 {
                    return Err(CanIdBuildError::PsMustBeNullForAddressed);
                }
                destination
            }
        };

        let id = ((self.priority as u32) << 26)
            | (r << 25)
            | (dp << 24)
            | ((pf as u32) << 16)
            | ((ps_bits as u32) << 8)
            | (self.source_address as u32);
        Ok(CanId(id))
    }
}
