//! HTTP handlers for authentication endpoints.

pub mod oauth;
pub mod session;
