//! In-process adapters: a document store over a single lock and a keyed
//! byte-map asset store. Used by tests and by embedding applications that
//! do not need external collaborators.

mod assets;
mod repository;

pub use assets::MemoryAssetStore;
pub use repository::MemoryStore;
