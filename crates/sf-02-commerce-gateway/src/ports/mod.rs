//! Ports layer (hexagonal architecture boundaries).

pub mod inbound;
pub mod outbound;

pub use inbound::CommerceApi;
pub use outbound::{HttpTransport, TransportError, TransportRequest, TransportResponse};
