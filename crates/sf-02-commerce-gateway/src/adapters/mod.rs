//! Adapters layer: concrete transports.

pub mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;
