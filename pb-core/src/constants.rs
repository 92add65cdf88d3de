//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "pushbullet";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default REST API root.
pub const DEFAULT_BASE_URL: &str = "https://api.pushbullet.com/v2";

/// Default OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://api.pushbullet.com/oauth2/token";

/// Name of the per-user settings file in the home directory.
pub const SETTINGS_FILE_NAME: &str = ".pushbulletrc";

/// Default API request timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Connect timeout for the HTTP transport in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Number of refresh-and-retry cycles an OAuth client performs after a 401.
pub const DEFAULT_MAX_REFRESH_ATTEMPTS: u32 = 1;

/// Seconds subtracted from a token's lifetime so it is refreshed before it lapses.
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 60;

/// Multipart field name the storage backend expects the file bytes under.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// REST resource paths, relative to the API root.
pub mod paths {
    pub const CONTACTS: &str = "/contacts";
    pub const DEVICES: &str = "/devices";
    pub const ME: &str = "/users/me";
    pub const PUSHES: &str = "/pushes";
    pub const UPLOAD_REQUEST: &str = "/upload-request";
}

/// Push kind discriminators as sent in the `type` field.
pub mod push_types {
    pub const NOTE: &str = "note";
    pub const LINK: &str = "link";
    pub const ADDRESS: &str = "address";
    pub const LIST: &str = "list";
    pub const FILE: &str = "file";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_relative() {
        for p in [paths::CONTACTS, paths::DEVICES, paths::ME, paths::PUSHES, paths::UPLOAD_REQUEST] {
            assert!(p.starts_with('/'));
        }
    }
}
