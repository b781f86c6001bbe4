//! Custom Axum extractors

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use shelf_kernel::Validate;

use crate::error::AppError;

/// JSON body that has been deserialized and passed its field rules.
///
/// Malformed JSON, missing required fields and rule violations all reject
/// with 400.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        value.validate()?;
        Ok(Self(value))
    }
}
