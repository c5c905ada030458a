//! # meeting-auth
//!
//! OAuth 2.0 plumbing for linking a Google account to an application user:
//! - The `oauth::Provider` trait and its Google implementation (consent URL,
//!   authorization code exchange, userinfo lookup)
//! - Token types that keep secrets out of logs
//! - Per-call credential contexts that attach a user's token to an outbound request
//! - HTTP client building
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meeting_auth::{
//!     credentials::ProviderCredentials,
//!     http::HttpClientBuilder,
//!     oauth::{providers::google, AuthorizationOptions, Provider},
//! };
//! ```

pub mod credentials;
pub mod error;
pub mod http;
pub mod oauth;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
