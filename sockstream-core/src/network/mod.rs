//! TCP side of the client: connection lifecycle and event delivery.

pub mod connection;

pub use connection::{DataReceiver, EventReceiver, EventSender, ReceiverConfig};
