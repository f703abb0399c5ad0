//! # IO Module
//!
//! Boundary between the client logic and the outside world: the REST API
//! contract and request cancellation.

pub mod cancel;
pub mod rest;

pub use cancel::FetchScope;
pub use rest::{bearer, decode_body, endpoints, extract_error_message, ApiError, BrainBridgeApi};
