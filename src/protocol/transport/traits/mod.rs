//! Abstraction traits plugging the gateway into concrete hardware: CAN bus
//! drivers, monotonic clocks, and the high-level message sending helper.
pub mod can_bus;
pub mod clock;
pub mod message_sender;
