use crate::api::identity::Identity;
use crate::api::AppState;
use crate::domain::model::TechEntity;
use crate::domain::ports::DocumentSession;
use crate::utils::error::{CatalogError, Result};
use crate::utils::validation::{is_valid_email, FieldErrors};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTechRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TechsResponse {
    pub techs: Vec<TechResponse>,
}

impl CreateTechRequest {
    fn into_response(self, id: Uuid) -> TechResponse {
        TechResponse {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

impl TechResponse {
    fn into_entity(self, added_on: DateTime<Utc>, added_by: String) -> TechEntity {
        TechEntity {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            added_on,
            added_by: Some(added_by),
        }
    }
}

impl From<TechEntity> for TechResponse {
    // Read-path projection; creation metadata stays out of the response.
    fn from(entity: TechEntity) -> Self {
        TechResponse {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            phone: entity.phone,
        }
    }
}

/// Field validation for tech creation. The email uniqueness rule is the
/// only one that reads from the store.
pub async fn validate_create_tech(
    request: &CreateTechRequest,
    session: &dyn DocumentSession,
) -> Result<FieldErrors> {
    let mut errors = FieldErrors::new();

    if request.first_name.trim().is_empty() {
        errors.push("firstName", "firstName must not be empty");
    }

    if request.last_name.trim().is_empty() {
        errors.push("lastName", "lastName must not be empty");
    }
    let last_name_len = request.last_name.chars().count();
    if !(3..=20).contains(&last_name_len) {
        errors.push("lastName", "lastName must be between 3 and 20 characters");
    }

    if request.email.trim().is_empty() {
        errors.push("email", "email must not be empty");
    } else if !is_valid_email(&request.email) {
        errors.push("email", "email is not a valid email address");
    } else if session.tech_by_email(&request.email).await?.is_some() {
        errors.push("email", "a tech with this email is already registered");
    }

    if request.phone.trim().is_empty() {
        errors.push("phone", "Give us a company phone number, please");
    }

    Ok(errors)
}

pub async fn add_tech(
    State(state): State<AppState>,
    Identity(added_by): Identity,
    Json(request): Json<CreateTechRequest>,
) -> Result<impl IntoResponse> {
    let mut session = state.store.open_session();

    let errors = validate_create_tech(&request, session.as_ref()).await?;
    if !errors.is_empty() {
        tracing::debug!("Rejected tech creation: {:?}", errors);
        return Err(CatalogError::ValidationError(errors));
    }

    let response = request.into_response(Uuid::new_v4());
    let entity = response.clone().into_entity(state.clock.now_utc(), added_by);
    session.store_tech(entity);
    session.save_changes().await?;

    tracing::debug!("Created tech {}", response.id);
    let location = format!("/techs/{}", response.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(response),
    ))
}

pub async fn get_tech_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TechResponse>> {
    let session = state.store.open_session();
    let entity = session.tech_by_id(id).await?.ok_or(CatalogError::NotFound)?;
    Ok(Json(TechResponse::from(entity)))
}

#[derive(Debug, Deserialize)]
pub struct TechsQuery {
    pub email: Option<String>,
}

pub async fn list_techs(
    State(state): State<AppState>,
    Query(query): Query<TechsQuery>,
) -> Result<Json<TechsResponse>> {
    let session = state.store.open_session();
    let filter = query.email.as_deref().filter(|email| !email.is_empty());
    let techs = session.techs(filter).await?;
    Ok(Json(TechsResponse {
        techs: techs.into_iter().map(TechResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::domain::ports::SessionStore;

    fn valid_request() -> CreateTechRequest {
        CreateTechRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_valid_request_has_no_errors() {
        let store = MemoryStore::new();
        let session = store.open_session();
        let errors = validate_create_tech(&valid_request(), session.as_ref())
            .await
            .unwrap();
        assert!(errors.is_empty());
    }

    #[tokio::test]
    async fn test_short_last_name_is_rejected() {
        let store = MemoryStore::new();
        let session = store.open_session();
        let request = CreateTechRequest {
            last_name: "Jo".to_string(),
            ..valid_request()
        };
        let errors = validate_create_tech(&request, session.as_ref()).await.unwrap();
        assert_eq!(
            errors.messages("lastName"),
            &["lastName must be between 3 and 20 characters".to_string()]
        );
        assert!(errors.messages("email").is_empty());
    }

    #[tokio::test]
    async fn test_empty_fields_collect_all_messages() {
        let store = MemoryStore::new();
        let session = store.open_session();
        let errors = validate_create_tech(&CreateTechRequest::default(), session.as_ref())
            .await
            .unwrap();
        assert_eq!(errors.messages("firstName").len(), 1);
        // Empty last name violates both the presence and the length rule.
        assert_eq!(errors.messages("lastName").len(), 2);
        assert_eq!(
            errors.messages("phone"),
            &["Give us a company phone number, please".to_string()]
        );
    }

    #[tokio::test]
    async fn test_malformed_email_is_rejected() {
        let store = MemoryStore::new();
        let session = store.open_session();
        let request = CreateTechRequest {
            email: "not-an-email".to_string(),
            ..valid_request()
        };
        let errors = validate_create_tech(&request, session.as_ref()).await.unwrap();
        assert_eq!(
            errors.messages("email"),
            &["email is not a valid email address".to_string()]
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let mut session = store.open_session();
        let existing = valid_request()
            .into_response(Uuid::new_v4())
            .into_entity(Utc::now(), "admin-1".to_string());
        session.store_tech(existing);
        session.save_changes().await.unwrap();

        let errors = validate_create_tech(&valid_request(), session.as_ref())
            .await
            .unwrap();
        assert_eq!(
            errors.messages("email"),
            &["a tech with this email is already registered".to_string()]
        );
    }

    #[test]
    fn test_entity_projection_drops_creation_metadata() {
        let entity = valid_request()
            .into_response(Uuid::new_v4())
            .into_entity(Utc::now(), "admin-1".to_string());
        let projected = TechResponse::from(entity.clone());
        assert_eq!(projected.id, entity.id);

        let json = serde_json::to_value(&projected).unwrap();
        assert!(json.get("addedOn").is_none());
        assert!(json.get("addedBy").is_none());
        assert!(json.get("firstName").is_some());
    }
}
