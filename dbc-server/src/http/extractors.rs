//! Custom Axum extractors

use axum::extract::{FromRequestParts, Path, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::{Code, ValidationError};

/// Extract and validate a single reference code from the path
pub struct ValidCode(pub Code);

impl<S> FromRequestParts<S> for ValidCode
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(code): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "code" }))?;

        Ok(Self(Code::new("code", &code)?))
    }
}

/// `{specialisme_cd}/{diagnose_cd}` path pair
pub struct DiagnosePath {
    pub specialisme_cd: Code,
    pub diagnose_cd: Code,
}

impl<S> FromRequestParts<S> for DiagnosePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((specialisme_cd, diagnose_cd)): Path<(String, String)> =
            Path::from_request_parts(parts, state).await.map_err(|_| {
                ApiError::Validation(ValidationError::Empty {
                    field: "specialisme_cd/diagnose_cd",
                })
            })?;

        Ok(Self {
            specialisme_cd: Code::new("specialisme_cd", &specialisme_cd)?,
            diagnose_cd: Code::new("diagnose_cd", &diagnose_cd)?,
        })
    }
}

/// Query string extractor that rejects with a JSON validation error
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::Validation(ValidationError::InvalidQueryString {
                    reason: rejection.body_text(),
                })
            })?;

        Ok(Self(params))
    }
}
