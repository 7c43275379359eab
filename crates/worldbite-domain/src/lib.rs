//! Domain types shared across World Bite services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod contact;
pub mod dish;
pub mod order;
pub mod pagination;
pub mod tax_id;
