// WebSocket link to the simulation server

mod client;
mod protocol;

pub use client::{spawn, ConnectionState, TransportError, TransportEvent, TransportHandle};
pub use protocol::{ClientCommand, StartData};
