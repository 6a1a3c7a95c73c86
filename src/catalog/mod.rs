//! Music catalog integration.
//!
//! A [`CatalogClient`] holds one authenticated Spotify session. Consumers
//! depend on the [`MusicCatalog`] trait so a stub catalog can stand in.

mod client;
mod models;

pub use client::{CatalogClient, MusicCatalog};
pub use models::{ArtistId, MAX_TOP_TRACKS, TrackTitle};

#[cfg(test)]
pub(crate) use client::tests as test_server;
