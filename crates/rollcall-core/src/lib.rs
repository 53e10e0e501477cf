//! Shared service plumbing: health endpoints, tracing setup, request-id
//! middleware, and serialization helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
