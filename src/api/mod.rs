//! Remote API gateway.
//!
//! The slices only see the [`ApiGateway`] trait; [`HttpGateway`] is the
//! reqwest-backed implementation used by the binary.

mod error;
mod gateway;
mod http;

pub use error::{extract_message, ApiError};
pub use gateway::ApiGateway;
pub use http::HttpGateway;
