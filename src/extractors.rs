//! Request extractors shared by the CRUD handlers.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use axum_valid::{Valid, ValidRejection};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::store::{StoreError, NON_FIELD_ERRORS};

/// JSON body that has been deserialized and validated.
///
/// Bodies that are not valid JSON or do not match the form's types (e.g. a
/// string where `hogeId` expects an integer) are reported as validation
/// errors instead of axum's plain-text rejection.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = StoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| StoreError::validation(NON_FIELD_ERRORS, e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Query string that has been deserialized and validated.
///
/// Range violations are reported under the offending parameter; query
/// strings that do not parse at all go under `__all__`.
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = StoreError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Valid(Query(value)) = Valid::<Query<T>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| match rejection {
                ValidRejection::Valid(errors) => StoreError::from(errors),
                ValidRejection::Inner(e) => StoreError::validation(NON_FIELD_ERRORS, e.body_text()),
            })?;

        Ok(ValidatedQuery(value))
    }
}
