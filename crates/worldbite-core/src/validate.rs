use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::RequestError;

/// JSON body that has been deserialized **and** passed its `validator` rules.
///
/// Handlers receiving a `ValidatedJson<T>` never see a body with missing or
/// malformed fields; those requests are rejected with 400 and the failure
/// envelope before any workflow code runs.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = RequestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| RequestError::MalformedBody(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| RequestError::Invalid(errors.to_string().replace('\n', "; ")))?;
        Ok(Self(value))
    }
}
