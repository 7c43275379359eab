//! Cross-cutting HTTP plumbing shared by World Bite services: response
//! envelope, validated JSON bodies, health checks, request ids, tracing and
//! environment configuration.

pub mod config;
pub mod envelope;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
pub mod validate;
