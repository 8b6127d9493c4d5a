pub mod couch;
pub mod memory;

pub use couch::CouchStore;
pub use memory::MemoryStore;
