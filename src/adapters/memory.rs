use crate::domain::model::{SoftwareEntity, TechEntity};
use crate::domain::ports::{DocumentSession, PendingWrite, SessionStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-process document store for local development and tests. The maps are
/// shared across sessions; each session still buffers its writes until
/// `save_changes`, matching the real store's unit-of-work behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    techs: Arc<Mutex<HashMap<Uuid, TechEntity>>>,
    software: Arc<Mutex<HashMap<Uuid, SoftwareEntity>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn open_session(&self) -> Box<dyn DocumentSession> {
        Box::new(MemorySession {
            store: self.clone(),
            pending: Vec::new(),
        })
    }
}

pub struct MemorySession {
    store: MemoryStore,
    pending: Vec<PendingWrite>,
}

#[async_trait]
impl DocumentSession for MemorySession {
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
        let techs = self.store.techs.lock().await;
        Ok(techs.get(&id).cloned())
    }

    async fn tech_by_email(&self, email: &str) -> Result<Option<TechEntity>> {
        let techs = self.store.techs.lock().await;
        Ok(techs.values().find(|t| t.email == email).cloned())
    }

    async fn techs(&self, email: Option<&str>) -> Result<Vec<TechEntity>> {
        let techs = self.store.techs.lock().await;
        Ok(techs
            .values()
            .filter(|t| email.map_or(true, |e| t.email == e))
            .cloned()
            .collect())
    }

    async fn software_by_id(&self, id: Uuid) -> Result<Option<SoftwareEntity>> {
        let software = self.store.software.lock().await;
        Ok(software.get(&id).cloned())
    }

    async fn software(&self) -> Result<Vec<SoftwareEntity>> {
        let software = self.store.software.lock().await;
        Ok(software.values().cloned().collect())
    }

    async fn save_changes(&mut self) -> Result<()> {
        for write in self.pending.drain(..) {
            match write {
                PendingWrite::StoreTech(entity) => {
                    let mut techs = self.store.techs.lock().await;
                    techs.insert(entity.id, entity);
                }
                PendingWrite::StoreSoftware(entity) => {
                    let mut software = self.store.software.lock().await;
                    software.insert(entity.id, entity);
                }
                PendingWrite::DeleteSoftware(id) => {
                    let mut software = self.store.software.lock().await;
                    software.remove(&id);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_tech(email: &str) -> TechEntity {
        TechEntity {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            added_on: Utc::now(),
            added_by: Some("admin-1".to_string()),
        }
    }

    fn sample_software(title: &str) -> SoftwareEntity {
        SoftwareEntity {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "A tool".to_string(),
            created_by: "admin-1".to_string(),
            added_on: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_writes_are_buffered_until_save_changes() {
        let store = MemoryStore::new();
        let tech = sample_tech("ada@example.com");
        let id = tech.id;

        let mut session = store.open_session();
        session.store_tech(tech);

        // Not visible before the save, even to the writing session.
        assert!(session.tech_by_id(id).await.unwrap().is_none());

        session.save_changes().await.unwrap();
        assert!(session.tech_by_id(id).await.unwrap().is_some());

        // Visible to a fresh session too.
        let other = store.open_session();
        assert_eq!(other.tech_by_id(id).await.unwrap().unwrap().id, id);
    }

    #[tokio::test]
    async fn test_tech_by_email_exact_match() {
        let store = MemoryStore::new();
        let mut session = store.open_session();
        session.store_tech(sample_tech("grace@example.com"));
        session.store_tech(sample_tech("ada@example.com"));
        session.save_changes().await.unwrap();

        let found = session.tech_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.unwrap().email, "ada@example.com");
        assert!(session.tech_by_email("ADA@example.com").await.unwrap().is_none());
        assert!(session.tech_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_techs_with_and_without_filter() {
        let store = MemoryStore::new();
        let mut session = store.open_session();
        session.store_tech(sample_tech("a@example.com"));
        session.store_tech(sample_tech("b@example.com"));
        session.save_changes().await.unwrap();

        assert_eq!(session.techs(None).await.unwrap().len(), 2);
        assert_eq!(session.techs(Some("a@example.com")).await.unwrap().len(), 1);
        assert!(session.techs(Some("c@example.com")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_software_is_idempotent() {
        let store = MemoryStore::new();
        let item = sample_software("Editor");
        let id = item.id;

        let mut session = store.open_session();
        session.store_software(item);
        session.save_changes().await.unwrap();

        session.delete_software(id);
        session.save_changes().await.unwrap();
        assert!(session.software_by_id(id).await.unwrap().is_none());

        // Deleting an id that no longer exists is a no-op.
        session.delete_software(id);
        session.delete_software(Uuid::new_v4());
        session.save_changes().await.unwrap();
        assert!(session.software().await.unwrap().is_empty());
    }
}
