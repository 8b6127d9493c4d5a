pub mod catalog;
pub mod identity;
pub mod techs;

use crate::domain::ports::{Clock, SessionStore};
use crate::utils::error::CatalogError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/catalog/", get(catalog::get_the_catalog))
        .route(
            "/new-software/",
            axum::routing::post(catalog::add_new_software).get(catalog::list_software),
        )
        .route(
            "/new-software/{id}",
            get(catalog::get_software_by_id).delete(catalog::delete_software),
        )
        .route(
            "/techs",
            axum::routing::post(techs::add_tech).get(techs::list_techs),
        )
        .route("/techs/{id}", get(techs::get_tech_by_id))
        .with_state(state)
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        match self {
            CatalogError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "title": "One or more validation errors occurred.",
                    "status": 422,
                    "errors": errors,
                })),
            )
                .into_response(),
            CatalogError::NotFound => StatusCode::NOT_FOUND.into_response(),
            CatalogError::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "title": "Caller identity is required.",
                    "status": 401,
                })),
            )
                .into_response(),
            // Store and serialization failures are not handled locally.
            error => {
                tracing::error!("Request failed: {}", error);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
