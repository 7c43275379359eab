//! Test utilities for World Bite services.
//!
//! Provides signed `Authorization` headers for customers and restaurants and
//! a helper to read failure/success envelopes off a response.
//! Import from `[dev-dependencies]` only, never from production code.

pub mod auth;
pub mod response;
