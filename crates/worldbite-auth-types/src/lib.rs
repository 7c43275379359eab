//! Auth types shared across World Bite services.
//!
//! Provides JWT issuing/validation, the refresh-token cookie, and the
//! `CustomerIdentity` (Bearer) and `RestaurantTaxId` (CNPJ) extractors.

pub mod cookie;
pub mod identity;
pub mod restaurant;
pub mod token;
