pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod utils;

pub use adapters::{CouchStore, MemoryStore};
pub use api::{router, AppState};
pub use config::{CliArgs, ServerConfig};
pub use utils::error::{CatalogError, Result};
