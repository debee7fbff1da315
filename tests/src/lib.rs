//! # Storefront Test Suite
//!
//! Unified test crate for behaviour that spans crates.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs       # Session auth → attribution → order creation
//!     └── transport.rs   # reqwest adapter against a loopback socket
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sf-tests
//! cargo test -p sf-tests integration::transport
//! ```

#![allow(dead_code)]

pub mod integration;
