//! `Authorization: CNPJ <taxId>` extractor for restaurant-scoped endpoints.
//!
//! This scheme is a placeholder and carries no proof of identity: any caller
//! that knows a tax id can act as that restaurant.

use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use http::{StatusCode, header};
use worldbite_core::error::error_response;
use worldbite_domain::tax_id::TaxId;

#[derive(Debug, Clone)]
pub struct RestaurantTaxId(pub TaxId);

#[derive(Debug, thiserror::Error)]
pub enum RestaurantRejection {
    #[error("missing CNPJ authorization")]
    Missing,
    #[error("invalid CNPJ in authorization header")]
    Invalid,
}

impl IntoResponse for RestaurantRejection {
    fn into_response(self) -> Response {
        error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", &self.to_string())
    }
}

impl<S> FromRequestParts<S> for RestaurantTaxId
where
    S: Send + Sync,
{
    type Rejection = RestaurantRejection;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let raw = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("CNPJ "))
            .map(str::to_owned);

        async move {
            let raw = raw.ok_or(RestaurantRejection::Missing)?;
            let tax_id = TaxId::parse(&raw).map_err(|_| RestaurantRejection::Invalid)?;
            Ok(Self(tax_id))
        }
    }
}
