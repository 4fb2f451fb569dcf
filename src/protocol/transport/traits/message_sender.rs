//! `CanBus` extension providing a high-level API to publish messages: it
//! serializes the structure, builds Fast Packet frames when needed, and
//! transmits them in sequence with the appropriate inter-frame delays.
use crate::{
    error::SendMessageError,
    infra::codec::ToPayload,
    protocol::transport::fast_packet::{FrameBuilder, MAX_MESSAGE_PAYLOAD},
    protocol::transport::traits::{can_bus::CanBus, clock::MonotonicClock},
    protocol::transport::FAST_PACKET_INTER_FRAME_DELAY_MS,
};

/// Trait extending [`CanBus`] with an ergonomic message-publishing helper.
///
/// Transparently handles single-frame messages (payload <= 8 bytes) and
/// Fast Packet segmentation above that, inserting an inter-frame delay
/// between consecutive frames of a multi-frame sequence to avoid TX buffer
/// saturation on embedded controllers.
pub trait MessageSender: CanBus {
    /// Serialize, frame, and send a broadcast message over the CAN bus.
    ///
    /// # Arguments
    ///
    /// * `message` - message structure implementing [`ToPayload`]
    /// * `pgn` - Parameter Group Number
    /// * `priority` - message priority (0-7, lower wins arbitration)
    /// * `source_address` - source address (0-253)
    /// * `clock` - clock enforcing inter-frame delays
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`SendMessageError::Encode`] when serialization fails
    /// - [`SendMessageError::Build`] when frame construction fails
    /// - [`SendMessageError::Send`] when bus transmission fails
    fn send_message<'a, M: ToPayload, K: MonotonicClock>(
        &'a mut self,
        message: &'a M,
        pgn: u32,
        priority: u8,
        source_address: u8,
        clock: &'a mut K,
    ) -> impl core::future::Future<Output = Result<(), SendMessageError<Self::Error>>> + 'a;
}

impl<C: CanBus> MessageSender for C {
    fn send_message<'a, M: ToPayload, K: MonotonicClock>(
        &'a mut self,
        message: &'a M,
        pgn: u32,
        priority: u8,
        source_address: u8,
        clock: &'a mut K,
    ) -> impl core::future::Future<Output = Result<(), SendMessageError<Self::Error>>> + 'a {
        async move {
            // Stack-allocated buffer; no heap in the publication path.
            let mut payload_buffer = [0u8; MAX_MESSAGE_PAYLOAD];
            let len = message.to_payload(&mut payload_buffer)?;
            let payload = &payload_buffer[..len];

            let builder = FrameBuilder::new(pgn, priority, source_address, None, payload);
            let mut is_first_frame = true;

            for frame_result in builder.build() {
                let frame = frame_result.map_err(SendMessageError::Build)?;

                // Throttle between frames of a multi-frame sequence
                // (skip before the first frame to minimize latency).
                if !is_first_frame && payload.len() > 8 {
                    clock.delay_ms(FAST_PACKET_INTER_FRAME_DELAY_MS).await;
                }

                self.send(&frame).await.map_err(SendMessageError::Send)?;

                is_first_frame = false;
            }

            Ok(())
        }
    }
}
