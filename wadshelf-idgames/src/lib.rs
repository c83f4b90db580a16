//! Client for the idgames archive API.
//!
//! Looks up published WAD metadata by file name and exposes it as a
//! [`RemoteMetadataSource`](wadshelf_core::RemoteMetadataSource) for the
//! metadata reconciler.

pub mod client;
pub mod error;
pub mod types;

pub use client::IdGamesClient;
pub use error::IdGamesError;
pub use types::{IdGamesFile, parse_search_response};
