//! Pushbullet Core - foundation types, error handling, settings, and logging.
//!
//! This crate provides the shared foundation used by the other crates:
//! - Settings model, global-file loading, and override merging
//! - The unified error type
//! - Structured logging with tracing
//! - Platform paths and common constants

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used items at the crate root
pub use config::{AuthSettings, Settings, SettingsInput, SettingsLoader};
pub use error::{PbError, PbResult};
pub use logging::init_logging;
pub use platform::Platform;
