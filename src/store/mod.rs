pub mod base;
pub mod memory_store;
pub mod no_store;
pub mod session_file_store;

// Re-export the primary Store items so code outside can do
// "use crate::store::{TokenStore, create_store};"
pub use base::{create_store, TokenStore, TokenStoreError};
pub use memory_store::MemoryTokenStore;
pub use no_store::NoStore;
pub use session_file_store::SessionFileStore;
