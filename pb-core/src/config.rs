//! Settings loading and merging.
//!
//! Settings come from two layers: the global per-user JSON file
//! (`~/.pushbulletrc` by default) and an optional caller override given
//! either as a JSON mapping or as a path to a JSON file. The override is
//! applied on top of the file: top-level keys replace, and the `auth`
//! object is merged key by key so a caller can swap a single credential
//! while inheriting the rest. The global file is only ever read.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants;
use crate::error::{PbError, PbResult};
use crate::platform::Platform;

/// Key of the nested mapping that is merged instead of replaced.
const AUTH_KEY: &str = "auth";

/// Fully merged and validated client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Authentication scheme and its credentials.
    pub auth: AuthSettings,

    /// HTTP transport settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Any other top-level keys, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authentication settings, discriminated by the `type` key.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthSettings {
    /// Long-lived access token sent as the basic-auth username.
    Basic(BasicAuthSettings),
    /// OAuth client credentials with a refreshable bearer token.
    #[serde(rename = "oauth")]
    OAuth(OAuthSettings),
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicAuthSettings {
    #[serde(alias = "access_token")]
    pub token: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,

    /// Used to obtain a fresh access token.
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Optional initial access token; skips the first exchange.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Token endpoint override.
    #[serde(default)]
    pub token_url: Option<String>,

    /// Refresh-and-retry cycles allowed after a 401.
    #[serde(default = "default_max_refresh_attempts")]
    pub max_refresh_attempts: u32,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// REST API root, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in milliseconds. Expiry surfaces as a connection error.
    #[serde(default = "default_api_timeout")]
    pub timeout_ms: u64,

    /// User-Agent override.
    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_base_url() -> String {
    constants::DEFAULT_BASE_URL.to_string()
}

fn default_api_timeout() -> u64 {
    constants::DEFAULT_API_TIMEOUT_MS
}

fn default_max_refresh_attempts() -> u32 {
    constants::DEFAULT_MAX_REFRESH_ATTEMPTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_api_timeout(),
            user_agent: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthSettings::Basic(b) => fmt::Debug::fmt(b, f),
            AuthSettings::OAuth(o) => fmt::Debug::fmt(o, f),
        }
    }
}

impl fmt::Debug for BasicAuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthSettings")
            .field("token", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthSettings")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("token_url", &self.token_url)
            .field("max_refresh_attempts", &self.max_refresh_attempts)
            .finish()
    }
}

impl AuthSettings {
    /// The `type` discriminator this variant serializes as.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthSettings::Basic(_) => "basic",
            AuthSettings::OAuth(_) => "oauth",
        }
    }

    /// Check that the variant carries usable credentials.
    pub fn validate(&self) -> PbResult<()> {
        match self {
            AuthSettings::Basic(b) if b.token.trim().is_empty() => {
                Err(PbError::Config("basic auth requires a non-empty token".into()))
            }
            AuthSettings::OAuth(o) if o.client_id.is_empty() || o.client_secret.is_empty() => {
                Err(PbError::Config("oauth requires client_id and client_secret".into()))
            }
            AuthSettings::OAuth(o) if o.refresh_token.is_none() && o.access_token.is_none() => Err(
                PbError::Config("oauth requires a refresh_token or an access_token".into()),
            ),
            _ => Ok(()),
        }
    }
}

impl Settings {
    /// Build typed settings from a merged JSON mapping.
    ///
    /// Fails with a configuration error when `auth` is missing or its
    /// `type` is not `basic` or `oauth`.
    pub fn from_map(map: Map<String, Value>) -> PbResult<Self> {
        match map.get(AUTH_KEY) {
            None => return Err(PbError::Config("settings have no `auth` section".into())),
            Some(Value::Object(auth)) => match auth.get("type").and_then(Value::as_str) {
                Some("basic") | Some("oauth") => {}
                Some(other) => {
                    return Err(PbError::Config(format!(
                        "invalid authentication scheme `{other}`, must be basic or oauth"
                    )))
                }
                None => return Err(PbError::Config("auth.type is missing".into())),
            },
            Some(_) => return Err(PbError::Config("`auth` must be an object".into())),
        }

        let settings: Settings = serde_json::from_value(Value::Object(map))
            .map_err(|e| PbError::Config(format!("invalid settings: {e}")))?;
        settings.auth.validate()?;
        Ok(settings)
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> PbResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Platform::log_dir()
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }
}

/// Caller-supplied settings layered over the global file.
#[derive(Debug, Clone)]
pub enum SettingsInput {
    /// An in-memory JSON mapping.
    Map(Map<String, Value>),
    /// Path to a JSON file holding the mapping.
    Path(PathBuf),
}

impl SettingsInput {
    /// Wrap an arbitrary JSON value, which must be an object.
    pub fn from_value(value: Value) -> PbResult<Self> {
        match value {
            Value::Object(map) => Ok(SettingsInput::Map(map)),
            other => Err(PbError::Config(format!(
                "settings must be a JSON object, got {other}"
            ))),
        }
    }

    fn into_map(self) -> PbResult<Map<String, Value>> {
        match self {
            SettingsInput::Map(map) => Ok(map),
            SettingsInput::Path(path) => read_settings_file(&path),
        }
    }
}

impl From<Map<String, Value>> for SettingsInput {
    fn from(map: Map<String, Value>) -> Self {
        SettingsInput::Map(map)
    }
}

impl From<PathBuf> for SettingsInput {
    fn from(path: PathBuf) -> Self {
        SettingsInput::Path(path)
    }
}

impl From<&Path> for SettingsInput {
    fn from(path: &Path) -> Self {
        SettingsInput::Path(path.to_path_buf())
    }
}

/// Loads the global settings file and merges caller settings over it.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    global_path: Option<PathBuf>,
}

impl SettingsLoader {
    /// Loader reading the global file at `global_path` when it exists.
    pub fn new(global_path: impl Into<PathBuf>) -> Self {
        Self {
            global_path: Some(global_path.into()),
        }
    }

    /// Loader with no global file; only caller settings are used.
    pub fn without_global() -> Self {
        Self { global_path: None }
    }

    /// Loader for the default per-user file (`~/.pushbulletrc`).
    pub fn from_default_location() -> PbResult<Self> {
        Ok(Self::new(Platform::default_settings_path()?))
    }

    /// Path of the global settings file, if any.
    pub fn global_path(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Merge the global file and `input` into one raw mapping.
    pub fn load_merged(&self, input: Option<SettingsInput>) -> PbResult<Map<String, Value>> {
        let global = self.global_path.as_deref().filter(|p| p.exists());

        let overlay = match input {
            Some(input) => Some(input.into_map()?).filter(|m| !m.is_empty()),
            None => None,
        };

        let base = match (global, &overlay) {
            (Some(path), _) => {
                debug!("loading global settings from {}", path.display());
                read_settings_file(path)?
            }
            (None, Some(_)) => Map::new(),
            (None, None) => {
                return Err(PbError::Config(match &self.global_path {
                    Some(p) => format!("no settings given and {} does not exist", p.display()),
                    None => "no settings given".into(),
                }))
            }
        };

        Ok(match overlay {
            Some(overlay) => merge_settings(base, overlay),
            None => base,
        })
    }

    /// Merge and validate settings.
    pub fn load(&self, input: Option<SettingsInput>) -> PbResult<Settings> {
        let merged = self.load_merged(input)?;
        let settings = Settings::from_map(merged)?;
        debug!(auth = settings.auth.kind(), "settings loaded");
        Ok(settings)
    }
}

/// Read a JSON settings file; the top level must be an object.
pub fn read_settings_file(path: &Path) -> PbResult<Map<String, Value>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        PbError::Config(format!("failed to read settings file {}: {e}", path.display()))
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|e| {
        PbError::Config(format!("failed to parse settings file {}: {e}", path.display()))
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(PbError::Config(format!(
            "settings file {} must hold a JSON object",
            path.display()
        ))),
    }
}

/// Layer `overlay` over `base`.
///
/// Top-level keys in `overlay` replace or add to `base`. When both sides
/// hold an `auth` object, the overlay's auth keys replace same-named base
/// keys and the remaining base auth keys are kept.
pub fn merge_settings(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overlay {
        let value = match (base.get_mut(&key), value) {
            (Some(Value::Object(base_auth)), Value::Object(overlay_auth)) if key == AUTH_KEY => {
                base_auth.extend(overlay_auth);
                continue;
            }
            (_, value) => value,
        };
        base.insert(key, value);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_merge_is_right_biased_at_both_levels() {
        let base = obj(json!({"auth": {"type": "basic", "token": "A"}, "x": 1}));
        let overlay = obj(json!({"auth": {"token": "B"}}));
        let merged = merge_settings(base, overlay);
        assert_eq!(
            Value::Object(merged),
            json!({"auth": {"type": "basic", "token": "B"}, "x": 1})
        );
    }

    #[test]
    fn test_merge_replaces_non_auth_objects_wholesale() {
        let base = obj(json!({"api": {"base_url": "http://a", "timeout_ms": 5}}));
        let overlay = obj(json!({"api": {"base_url": "http://b"}, "y": true}));
        let merged = merge_settings(base, overlay);
        assert_eq!(
            Value::Object(merged),
            json!({"api": {"base_url": "http://b"}, "y": true})
        );
    }

    #[test]
    fn test_merge_auth_type_switch_keeps_inherited_fields() {
        let base = obj(json!({"auth": {"type": "basic", "token": "A", "client_id": "cid"}}));
        let overlay = obj(json!({"auth": {"type": "oauth", "client_secret": "s"}}));
        let merged = merge_settings(base, overlay);
        assert_eq!(merged["auth"]["type"], "oauth");
        assert_eq!(merged["auth"]["client_id"], "cid");
        assert_eq!(merged["auth"]["client_secret"], "s");
    }

    #[test]
    fn test_merge_overlay_auth_non_object_replaces() {
        let base = obj(json!({"auth": {"type": "basic", "token": "A"}}));
        let overlay = obj(json!({"auth": null}));
        let merged = merge_settings(base, overlay);
        assert_eq!(merged["auth"], Value::Null);
    }

    #[test]
    fn test_settings_from_map_basic() {
        let settings =
            Settings::from_map(obj(json!({"auth": {"type": "basic", "token": "abc"}}))).unwrap();
        assert_eq!(settings.auth.kind(), "basic");
        assert_eq!(settings.api.base_url, constants::DEFAULT_BASE_URL);
        assert_eq!(settings.api.timeout_ms, 30_000);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_settings_from_map_oauth_defaults() {
        let settings = Settings::from_map(obj(json!({
            "auth": {"type": "oauth", "client_id": "id", "client_secret": "sec", "refresh_token": "r"}
        })))
        .unwrap();
        match settings.auth {
            AuthSettings::OAuth(o) => {
                assert_eq!(o.max_refresh_attempts, 1);
                assert!(o.access_token.is_none());
                assert_eq!(o.refresh_token.as_deref(), Some("r"));
            }
            other => panic!("expected oauth, got {other:?}"),
        }
    }

    #[test]
    fn test_settings_keeps_extra_keys() {
        let settings = Settings::from_map(obj(json!({
            "auth": {"type": "basic", "token": "abc"},
            "x": 1
        })))
        .unwrap();
        assert_eq!(settings.extra.get("x"), Some(&json!(1)));
    }

    #[test]
    fn test_settings_rejects_unknown_auth_type() {
        let err = Settings::from_map(obj(json!({"auth": {"type": "digest"}}))).unwrap_err();
        assert!(matches!(err, PbError::Config(msg) if msg.contains("digest")));
    }

    #[test]
    fn test_settings_rejects_missing_auth() {
        let err = Settings::from_map(obj(json!({"x": 1}))).unwrap_err();
        assert!(matches!(err, PbError::Config(_)));

        let err = Settings::from_map(obj(json!({"auth": {"token": "t"}}))).unwrap_err();
        assert!(matches!(err, PbError::Config(msg) if msg.contains("auth.type")));
    }

    #[test]
    fn test_settings_rejects_empty_credentials() {
        let err = Settings::from_map(obj(json!({"auth": {"type": "basic", "token": " "}})))
            .unwrap_err();
        assert!(matches!(err, PbError::Config(_)));

        let err = Settings::from_map(obj(json!({
            "auth": {"type": "oauth", "client_id": "id", "client_secret": "s"}
        })))
        .unwrap_err();
        assert!(matches!(err, PbError::Config(msg) if msg.contains("refresh_token")));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let auth = AuthSettings::Basic(BasicAuthSettings { token: "super-secret".into() });
        let dbg = format!("{auth:?}");
        assert!(!dbg.contains("super-secret"));
    }

    #[test]
    fn test_loader_no_file_no_input_fails() {
        let dir = TempDir::new().unwrap();
        let loader = SettingsLoader::new(dir.path().join(".pushbulletrc"));
        let err = loader.load(None).unwrap_err();
        assert!(matches!(err, PbError::Config(_)));

        let err = SettingsLoader::without_global().load(None).unwrap_err();
        assert!(matches!(err, PbError::Config(_)));
    }

    #[test]
    fn test_loader_empty_input_counts_as_absent() {
        let dir = TempDir::new().unwrap();
        let loader = SettingsLoader::new(dir.path().join("missing"));
        let err = loader.load(Some(SettingsInput::Map(Map::new()))).unwrap_err();
        assert!(matches!(err, PbError::Config(_)));
    }

    #[test]
    fn test_loader_merges_file_and_override() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join(".pushbulletrc");
        std::fs::write(&global, r#"{"auth":{"type":"basic","token":"A"},"x":1}"#).unwrap();

        let loader = SettingsLoader::new(&global);
        let merged = loader
            .load_merged(Some(obj(json!({"auth": {"token": "B"}})).into()))
            .unwrap();
        assert_eq!(
            Value::Object(merged),
            json!({"auth": {"type": "basic", "token": "B"}, "x": 1})
        );
    }

    #[test]
    fn test_loader_reads_override_from_path() {
        let dir = TempDir::new().unwrap();
        let override_path = dir.path().join("override.json");
        std::fs::write(&override_path, r#"{"auth":{"type":"basic","token":"from-file"}}"#)
            .unwrap();

        let loader = SettingsLoader::new(dir.path().join("missing"));
        let settings = loader.load(Some(override_path.as_path().into())).unwrap();
        match settings.auth {
            AuthSettings::Basic(b) => assert_eq!(b.token, "from-file"),
            other => panic!("expected basic, got {other:?}"),
        }
    }

    #[test]
    fn test_loader_global_only() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join(".pushbulletrc");
        std::fs::write(&global, r#"{"auth":{"type":"basic","token":"G"}}"#).unwrap();
        let settings = SettingsLoader::new(&global).load(None).unwrap();
        assert_eq!(settings.auth.kind(), "basic");
    }

    #[test]
    fn test_loader_never_writes_global_file() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join(".pushbulletrc");
        let original = r#"{"auth":{"type":"basic","token":"A"}}"#;
        std::fs::write(&global, original).unwrap();
        SettingsLoader::new(&global)
            .load(Some(obj(json!({"auth": {"token": "B"}})).into()))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&global).unwrap(), original);
    }

    #[test]
    fn test_loader_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join(".pushbulletrc");
        std::fs::write(&global, "not json").unwrap();
        let err = SettingsLoader::new(&global).load(None).unwrap_err();
        assert!(matches!(err, PbError::Config(msg) if msg.contains("parse")));

        std::fs::write(&global, "[1, 2]").unwrap();
        let err = SettingsLoader::new(&global).load(None).unwrap_err();
        assert!(matches!(err, PbError::Config(_)));
    }

    #[test]
    fn test_settings_input_from_value() {
        assert!(SettingsInput::from_value(json!({"a": 1})).is_ok());
        assert!(SettingsInput::from_value(json!("path")).is_err());
    }
}
