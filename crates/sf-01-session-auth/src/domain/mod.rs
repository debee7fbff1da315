//! # Domain Layer
//!
//! Pure authentication logic. No I/O, no clock access: the current time is
//! always passed in by the service layer.

pub mod claims;
pub mod config;
pub mod errors;
pub mod signature;
pub mod verdict;

pub use claims::{parse_payload, ClaimValue, Claims, SessionUser};
pub use config::AuthConfig;
pub use errors::{IdentityError, StructuralError};
pub use verdict::{Freshness, IdentityContext, Rejection, Verdict};
