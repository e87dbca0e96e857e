//! # Authenticated Encryption (AE)
//!
//! 认证加密: Authentication + Confidentiality,
//!

mod gcm;
pub use gcm::{DEFAULT_TAG_SIZE, GCM, PAYLOAD_LIMIT};
