//! Pushbullet API - HTTP client for the Pushbullet REST API.
//!
//! This crate provides a typed client for devices, pushes, contacts, the
//! current user, and two-phase file uploads. Every call goes through one
//! `Authenticator`, selected from settings: a static token over basic
//! auth, or OAuth bearer tokens with a bounded refresh-and-retry.

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod mime;
pub mod request;
pub mod response;
pub mod transport;

// Re-export key types
pub use auth::{Authenticator, BasicAuthenticator, OAuthAuthenticator};
pub use client::PushClient;
pub use endpoints::contacts::ContactUpdate;
pub use endpoints::devices::DeviceUpdate;
pub use endpoints::pushes::{Push, PushTarget};
pub use endpoints::users::UserUpdate;
pub use request::{ApiRequest, FilePart, HttpMethod, RequestBody};
pub use response::UploadTicket;
pub use transport::{Credential, HttpTransport};
