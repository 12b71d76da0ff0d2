//! Tubedeck - Video Hosting Service Core
//!
//! Hexagonal Architecture:
//! - domain/: Pure business types and logic (catalog, playlists, query validation, errors)
//! - ports/: Trait definitions for the persistence and asset-store collaborators
//! - adapters/: Concrete implementations (in-memory document store, filesystem asset store)
//! - application/: Generic services over the ports (catalog paging, playlist membership,
//!   media asset lifecycle saga)
//! - config: Environment configuration
//!
//! The crate is the core of a video-hosting service: it catalogs video assets,
//! lets owners curate playlists, and keeps externally stored media consistent
//! with database records. HTTP routing, authentication and multipart parsing
//! live in the embedding application; the core only authorizes by comparing a
//! requester id against stored ownership.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;

// Re-exports for convenience
pub use application::catalog::CatalogService;
pub use application::media::MediaService;
pub use application::playlists::PlaylistService;
pub use config::Config;
pub use domain::error::DomainError;
