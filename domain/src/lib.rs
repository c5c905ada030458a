//! Business operations of the broker: resolving callers, linking a Google account to an
//! application user and provisioning Meet links.
//!
//! Items from `entity_api` are re-exported so `web` never depends on the entity layer
//! directly.
pub use entity_api::{google_tokens, profiles, Id};

pub mod error;
pub mod identity;
pub mod meeting;
pub mod provider_link;

pub mod gateway;
