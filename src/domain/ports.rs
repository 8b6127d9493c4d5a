use crate::domain::model::{SoftwareEntity, TechEntity};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A write buffered in a session, applied by `save_changes`.
#[derive(Debug, Clone)]
pub enum PendingWrite {
    StoreTech(TechEntity),
    StoreSoftware(SoftwareEntity),
    DeleteSoftware(Uuid),
}

/// Unit-of-work over the document store. Writes are buffered in the
/// session and hit the store only on `save_changes`; reads go straight
/// through.
#[async_trait]
pub trait DocumentSession: Send + Sync {
    fn store_tech(&mut self, entity: TechEntity);
    fn store_software(&mut self, entity: SoftwareEntity);
    fn delete_software(&mut self, id: Uuid);

    async fn tech_by_id(&self, id: Uuid) -> Result<Option<TechEntity>>;
    async fn tech_by_email(&self, email: &str) -> Result<Option<TechEntity>>;
    /// All techs, optionally filtered by exact email match. Order is
    /// whatever the store returns.
    async fn techs(&self, email: Option<&str>) -> Result<Vec<TechEntity>>;

    async fn software_by_id(&self, id: Uuid) -> Result<Option<SoftwareEntity>>;
    async fn software(&self) -> Result<Vec<SoftwareEntity>>;

    async fn save_changes(&mut self) -> Result<()>;
}

/// Opens one session per request; sessions are never shared.
pub trait SessionStore: Send + Sync {
    fn open_session(&self) -> Box<dyn DocumentSession>;
}

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
