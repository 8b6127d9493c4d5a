use crate::utils::error::CatalogError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Header carrying the authenticated subject, set by the gateway that
/// terminates authentication in front of this service.
pub const SUBJECT_HEADER: &str = "x-subject";

/// The caller's subject identifier. Create operations take it as an
/// explicit input; a missing subject is a typed error, not a fault.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let subject = parts
            .headers
            .get(SUBJECT_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(CatalogError::MissingIdentity)?;
        Ok(Identity(subject.to_string()))
    }
}
