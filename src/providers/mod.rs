//! Statistics provider implementations

pub mod http;

pub use http::{ApiRequest, HttpProvider, decode_response};
