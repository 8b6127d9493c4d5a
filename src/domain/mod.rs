pub mod model;
pub mod ports;

pub use model::{SoftwareEntity, TechEntity};
pub use ports::{Clock, DocumentSession, PendingWrite, SessionStore, SystemClock};
