use crate::domain::model::{SoftwareEntity, TechEntity};
use crate::domain::ports::{DocumentSession, PendingWrite, SessionStore};
use crate::utils::error::{CatalogError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// CouchDB-backed document store. One database per entity kind; documents
/// are addressed by their entity id.
#[derive(Debug, Clone)]
pub struct CouchStore {
    client: Client,
    base_url: String,
    techs_db: String,
    software_db: String,
}

impl CouchStore {
    pub fn new(database_url: &str, techs_db: &str, software_db: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: database_url.trim_end_matches('/').to_string(),
            techs_db: techs_db.to_string(),
            software_db: software_db.to_string(),
        }
    }

    fn db_url(&self, db: &str) -> String {
        format!("{}/{}", self.base_url, db)
    }

    fn doc_url(&self, db: &str, id: Uuid) -> String {
        format!("{}/{}/{}", self.base_url, db, id)
    }

    /// Create both databases if they do not exist yet. CouchDB answers 412
    /// for a database that is already there.
    pub async fn ensure_databases(&self) -> Result<()> {
        for db in [&self.techs_db, &self.software_db] {
            let response = self.client.put(self.db_url(db)).send().await?;
            match response.status() {
                s if s.is_success() => {
                    tracing::info!("Created database '{}'", db);
                }
                StatusCode::PRECONDITION_FAILED => {
                    tracing::debug!("Database '{}' already exists", db);
                }
                s => {
                    return Err(CatalogError::StoreRejected {
                        status: s.as_u16(),
                        message: response.text().await.unwrap_or_default(),
                    })
                }
            }
        }
        Ok(())
    }

    async fn fetch_doc(&self, db: &str, id: Uuid) -> Result<Option<Value>> {
        let response = self.client.get(self.doc_url(db, id)).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(response.json().await?)),
            s => Err(CatalogError::StoreRejected {
                status: s.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn find<T: DeserializeOwned>(&self, db: &str, selector: Value) -> Result<Vec<T>> {
        let response = self
            .client
            .post(format!("{}/_find", self.db_url(db)))
            .json(&json!({ "selector": selector }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::StoreRejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: Value = response.json().await?;
        let docs = body
            .get("docs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        docs.into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(CatalogError::from))
            .collect()
    }

    async fn bulk_docs(&self, db: &str, docs: Vec<Value>) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/_bulk_docs", self.db_url(db)))
            .json(&json!({ "docs": docs }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::StoreRejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        // Per-document failures come back as 201 with "error" entries.
        let results: Vec<Value> = response.json().await?;
        for result in &results {
            if let Some(error) = result.get("error").and_then(Value::as_str) {
                return Err(CatalogError::StoreRejected {
                    status: status.as_u16(),
                    message: format!(
                        "document {}: {}",
                        result.get("id").and_then(Value::as_str).unwrap_or("?"),
                        error
                    ),
                });
            }
        }
        Ok(())
    }
}

impl SessionStore for CouchStore {
    fn open_session(&self) -> Box<dyn DocumentSession> {
        Box::new(CouchSession {
            store: self.clone(),
            pending: Vec::new(),
        })
    }
}

pub struct CouchSession {
    store: CouchStore,
    pending: Vec<PendingWrite>,
}

fn to_document<T: Serialize>(entity: &T, id: Uuid) -> Result<Value> {
    let mut doc = serde_json::to_value(entity)?;
    doc["_id"] = Value::String(id.to_string());
    Ok(doc)
}

#[async_trait]
impl DocumentSession for CouchSession {
    fn store_tech(&mut self, entity: TechEntity) {
        self.pending.push(PendingWrite::StoreTech(entity));
    }

    fn store_software(&mut self, entity: SoftwareEntity) {
        self.pending.push(PendingWrite::StoreSoftware(entity));
    }

    fn delete_software(&mut self, id: Uuid) {
        self.pending.push(PendingWrite::DeleteSoftware(id));
    }

    async fn tech_by_id(&self, id: Uuid) -> Result<Option<TechEntity>> {
        match self.store.fetch_doc(&self.store.techs_db, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn tech_by_email(&self, email: &str) -> Result<Option<TechEntity>> {
        let mut found: Vec<TechEntity> = self
            .store
            .find(&self.store.techs_db, json!({ "email": { "$eq": email } }))
            .await?;
        Ok(if found.is_empty() {
            None
        } else {
            Some(found.swap_remove(0))
        })
    }

    async fn techs(&self, email: Option<&str>) -> Result<Vec<TechEntity>> {
        let selector = match email {
            Some(email) => json!({ "email": { "$eq": email } }),
            None => json!({}),
        };
        self.store.find(&self.store.techs_db, selector).await
    }

    async fn software_by_id(&self, id: Uuid) -> Result<Option<SoftwareEntity>> {
        match self.store.fetch_doc(&self.store.software_db, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn software(&self) -> Result<Vec<SoftwareEntity>> {
        self.store.find(&self.store.software_db, json!({})).await
    }

    async fn save_changes(&mut self) -> Result<()> {
        let mut tech_docs = Vec::new();
        let mut software_docs = Vec::new();

        for write in self.pending.drain(..) {
            match write {
                PendingWrite::StoreTech(entity) => {
                    tech_docs.push(to_document(&entity, entity.id)?);
                }
                PendingWrite::StoreSoftware(entity) => {
                    software_docs.push(to_document(&entity, entity.id)?);
                }
                PendingWrite::DeleteSoftware(id) => {
                    // CouchDB deletes need the current revision; a missing
                    // document makes the delete a no-op.
                    if let Some(doc) = self.store.fetch_doc(&self.store.software_db, id).await? {
                        if let Some(rev) = doc.get("_rev").and_then(Value::as_str) {
                            software_docs.push(json!({
                                "_id": id.to_string(),
                                "_rev": rev,
                                "_deleted": true,
                            }));
                        }
                    }
                }
            }
        }

        if !tech_docs.is_empty() {
            self.store.bulk_docs(&self.store.techs_db, tech_docs).await?;
        }
        if !software_docs.is_empty() {
            self.store
                .bulk_docs(&self.store.software_db, software_docs)
                .await?;
        }
        Ok(())
    }
}
