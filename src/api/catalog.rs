use crate::api::identity::Identity;
use crate::api::AppState;
use crate::domain::model::SoftwareEntity;
use crate::utils::error::{CatalogError, Result};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateNewSoftwareRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSoftwareResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub added_on: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SoftwareListResponse {
    pub data: Vec<NewSoftwareResponse>,
}

impl CreateNewSoftwareRequest {
    fn into_response(
        self,
        id: Uuid,
        added_on: DateTime<Utc>,
        created_by: String,
    ) -> NewSoftwareResponse {
        NewSoftwareResponse {
            id,
            title: self.title,
            description: self.description,
            created_by,
            added_on,
        }
    }
}

impl NewSoftwareResponse {
    fn into_entity(self) -> SoftwareEntity {
        SoftwareEntity {
            id: self.id,
            title: self.title,
            description: self.description,
            created_by: self.created_by,
            added_on: self.added_on,
        }
    }
}

impl From<SoftwareEntity> for NewSoftwareResponse {
    fn from(entity: SoftwareEntity) -> Self {
        NewSoftwareResponse {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            created_by: entity.created_by,
            added_on: entity.added_on,
        }
    }
}

pub async fn get_the_catalog() -> Json<&'static str> {
    Json("The catalog goes here")
}

// Title and description are accepted as-is; catalog items carry no field
// validation, unlike tech creation.
pub async fn add_new_software(
    State(state): State<AppState>,
    Identity(created_by): Identity,
    Json(request): Json<CreateNewSoftwareRequest>,
) -> Result<impl IntoResponse> {
    let mut session = state.store.open_session();

    let response = request.into_response(Uuid::new_v4(), state.clock.now_utc(), created_by);
    let entity = response.clone().into_entity();
    session.store_software(entity);
    session.save_changes().await?;

    tracing::debug!("Added software {} to the catalog", response.id);
    let location = format!("/new-software/{}", response.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(response),
    ))
}

pub async fn get_software_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NewSoftwareResponse>> {
    let session = state.store.open_session();
    let entity = session
        .software_by_id(id)
        .await?
        .ok_or(CatalogError::NotFound)?;
    Ok(Json(NewSoftwareResponse::from(entity)))
}

pub async fn list_software(
    State(state): State<AppState>,
) -> Result<Json<SoftwareListResponse>> {
    let session = state.store.open_session();
    let items = session.software().await?;
    Ok(Json(SoftwareListResponse {
        data: items.into_iter().map(NewSoftwareResponse::from).collect(),
    }))
}

// No existence check and no ownership check; restricting deletion to the
// original creator is a deferred business rule.
pub async fn delete_software(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let mut session = state.store.open_session();
    session.delete_software(id);
    session.save_changes().await?;
    Ok(StatusCode::NO_CONTENT)
}
