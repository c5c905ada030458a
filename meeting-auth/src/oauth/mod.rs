//! OAuth 2.0 authorization code flow against a video meeting provider.

mod provider;

pub mod providers;
pub mod token;

pub use provider::{AuthorizationOptions, Provider, ProviderKind, UserInfo};
