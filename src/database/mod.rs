pub mod connection;
pub mod db_store;
pub mod memory_store;
pub mod store;

pub use connection::*;
pub use db_store::DbStore;
pub use memory_store::MemoryStore;
pub use store::VerificationStore;
