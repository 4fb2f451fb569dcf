//! CAN frame generation for outgoing messages. Payloads of eight bytes or
//! less go out as a single frame; longer payloads (PGN 127489's 26 bytes)
//! are segmented into a Fast Packet sequence.
use crate::error::CanIdBuildError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
#[cfg(target_has_atomic = "8")]
use core::sync::atomic::{AtomicU8, Ordering};

/// Maximum application payload a Fast Packet sequence can carry.
pub const MAX_MESSAGE_PAYLOAD: usize = 223;

#[cfg(target_has_atomic = "8")]
static GLOBAL_SEQUENCE_ID: AtomicU8 = AtomicU8::new(0);

#[cfg(not(target_has_atomic = "8"))]
// Only safe when the caller guarantees exclusive access (single-thread
// execution or interrupts disabled during construction). On MCUs without
// atomics, wrap the call in a critical section if multiple contexts can
// emit concurrently.
static mut GLOBAL_SEQUENCE_ID: u8 = 0;

fn next_sequence_id() -> u8 {
    #[cfg(target_has_atomic = "8")]
    {
        // The wrapping u8 counter masked to 3 bits cycles 0..=7 without a
        // discontinuity at the overflow.
        GLOBAL_SEQUENCE_ID.fetch_add(1, Ordering::AcqRel) & 0x07
    }

    #[cfg(not(target_has_atomic = "8"))]
    unsafe {
        let current = GLOBAL_SEQUENCE_ID & 0x07;
        GLOBAL_SEQUENCE_ID = (current + 1) & 0x07;
        current
    }
}

#[derive(Debug)]
/// Shared parameters for all frames composing one outgoing message.
pub struct FrameBuilder<'a> {
    pgn: u32,
    priority: u8,
    source_address: u8,
    destination: Option<u8>,
    payload: &'a [u8],
    sequence_id: u8,
}

impl<'a> FrameBuilder<'a> {
    /// Create a frame builder; the single-frame/Fast-Packet decision is made
    /// lazily from the payload length.
    pub fn new(
        pgn: u32,
        priority: u8,
        source_address: u8,
        destination: Option<u8>,
        payload: &'a [u8],
    ) -> Self {
        Self {
            pgn,
            priority,
            source_address,
            destination,
            payload,
            sequence_id: next_sequence_id(),
        }
    }

    /// Override the 3-bit Fast Packet sequence identifier.
    ///
    /// Intended for tests and traffic replay; in production let
    /// [`FrameBuilder::new`] auto-increment to avoid collisions.
    pub fn with_sequence_id(mut self, sequence_id: u8) -> Self {
        self.sequence_id = sequence_id & 0x07;
        self
    }

    /// Start the iteration; each call to `next` yields the next frame.
    pub fn build(self) -> FrameIterator<'a> {
        FrameIterator {
            builder: self,
            frame_index: 0,
            bytes_emitted: 0,
        }
    }
}

/// Lazy iterator returning frames one by one as they are encoded.
pub struct FrameIterator<'a> {
    builder: FrameBuilder<'a>,
    frame_index: u8,
    bytes_emitted: usize,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = Result<CanFrame, CanIdBuildError>;

    fn next(&mut self) -> Option<Self::Item> {
        let total_len = self.builder.payload.len();
        if self.bytes_emitted >= total_len {
            return None;
        }

        if total_len > MAX_MESSAGE_PAYLOAD {
            self.bytes_emitted = total_len;
            return Some(Err(CanIdBuildError::PayloadTooLong));
        }

        let mut id_builder = CanId::builder(self.builder.pgn, self.builder.source_address)
            .with_priority(self.builder.priority);
        if let Some(destination) = self.builder.destination {
            id_builder = id_builder.to_destination(destination);
        }
        let id = match id_builder.build() {
            Ok(id) => id,
            Err(err) => {
                self.bytes_emitted = total_len;
                return Some(Err(err));
            }
        };

        // Payload fits one classic frame: no Fast Packet framing.
        if total_len <= 8 {
            let mut data = [0xFF; 8];
            data[..total_len].copy_from_slice(self.builder.payload);
            self.bytes_emitted = total_len;

            return Some(Ok(CanFrame {
                id,
                data,
                len: total_len,
            }));
        }

        // Fast Packet segmentation. Every frame of a sequence goes out
        // with DLC 8, 0xFF-padded, matching on-the-wire behavior of
        // commercial devices.
        let header = ((self.builder.sequence_id & 0x07) << 5) | (self.frame_index & 0x1F);
        let frame = if self.bytes_emitted == 0 {
            // First frame: sequence header, total length, six payload bytes.
            let mut data = [0xFF; 8];
            data[0] = header;
            data[1] = total_len as u8;
            let chunk = 6.min(total_len);
            data[2..2 + chunk].copy_from_slice(&self.builder.payload[..chunk]);
            self.bytes_emitted += chunk;

            CanFrame { id, data, len: 8 }
        } else {
            // Continuation frame: sequence header, seven payload bytes.
            let mut data = [0xFF; 8];
            data[0] = header;
            let chunk = 7.min(total_len - self.bytes_emitted);
            data[1..1 + chunk]
                .copy_from_slice(&self.builder.payload[self.bytes_emitted..self.bytes_emitted + chunk]);
            self.bytes_emitted += chunk;

            CanFrame { id, data, len: 8 }
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        Some(Ok(frame))
    }
}
