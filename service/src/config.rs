use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with RAFFLE_ prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub whop: WhopConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhopConfig {
    /// Bearer credential for the Whop API.
    ///
    /// Not required at startup. Directory requests fail with a configuration
    /// error while it is unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_whop_base_url")]
    pub base_url: String,

    /// Default community (company) id used when a request names none.
    #[serde(default)]
    pub company_id: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for WhopConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_whop_base_url(),
            company_id: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Tuning for directory builds. Every field has a working default.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryConfig {
    /// Page size used when a request gives none.
    #[serde(default = "default_per")]
    pub default_per: u32,

    /// Page count used when a request gives none.
    #[serde(default = "default_max_pages")]
    pub default_max_pages: u32,

    /// Membership status filter used when a request gives none.
    #[serde(default = "default_status")]
    pub default_status: String,

    /// Page size ceiling for the memberships endpoint.
    #[serde(default = "default_memberships_max_per")]
    pub memberships_max_per: u32,

    /// Page count ceiling for the memberships endpoint.
    #[serde(default = "default_memberships_max_pages")]
    pub memberships_max_pages: u32,

    /// Page size used for the members endpoint during enrichment.
    #[serde(default = "default_members_max_per")]
    pub members_max_per: u32,

    /// Page count ceiling for the members endpoint.
    #[serde(default = "default_members_max_pages")]
    pub members_max_pages: u32,

    /// Enrichment runs when the share of generic names exceeds this ratio.
    #[serde(default = "default_generic_threshold")]
    pub generic_threshold: f64,

    /// Maximum number of member profiles fetched for enrichment.
    #[serde(default = "default_enrichment_record_limit")]
    pub enrichment_record_limit: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_per: default_per(),
            default_max_pages: default_max_pages(),
            default_status: default_status(),
            memberships_max_per: default_memberships_max_per(),
            memberships_max_pages: default_memberships_max_pages(),
            members_max_per: default_members_max_per(),
            members_max_pages: default_members_max_pages(),
            generic_threshold: default_generic_threshold(),
            enrichment_record_limit: default_enrichment_record_limit(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests.
    /// Use `"*"` to allow any origin (not recommended for production).
    /// Accepts either an array or comma-separated string.
    /// Example: `["http://localhost:5173"]` or `"http://localhost:5173,https://app.example.com"`
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub allowed_origins: Vec<String>,
}

/// Deserialize origins from comma-separated string or array, filtering empty values.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let origins: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(origins.into_iter().filter(|s| !s.is_empty()).collect())
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_whop_base_url() -> String {
    "https://api.whop.com".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_request_timeout_secs() -> u64 {
    15
}

#[allow(clippy::missing_const_for_fn)]
fn default_per() -> u32 {
    50
}

#[allow(clippy::missing_const_for_fn)]
fn default_max_pages() -> u32 {
    200
}

fn default_status() -> String {
    "active".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_memberships_max_per() -> u32 {
    50
}

#[allow(clippy::missing_const_for_fn)]
fn default_memberships_max_pages() -> u32 {
    500
}

#[allow(clippy::missing_const_for_fn)]
fn default_members_max_per() -> u32 {
    200
}

#[allow(clippy::missing_const_for_fn)]
fn default_members_max_pages() -> u32 {
    50
}

#[allow(clippy::missing_const_for_fn)]
fn default_generic_threshold() -> f64 {
    0.5
}

#[allow(clippy::missing_const_for_fn)]
fn default_enrichment_record_limit() -> usize {
    2000
}

#[allow(clippy::missing_const_for_fn)]
fn default_allowed_origins() -> Vec<String> {
    // Default to empty (no cross-origin requests allowed) - safe for production
    // Configure explicitly via RAFFLE_CORS__ALLOWED_ORIGINS or config.yaml
    vec![]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityHeadersConfig {
    /// Enable security headers (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Enable HSTS header (default: false, enable in production with HTTPS).
    #[serde(default)]
    pub hsts_enabled: bool,

    /// HSTS max-age in seconds (default: 31536000 = 1 year).
    #[serde(default = "default_hsts_max_age")]
    pub hsts_max_age: u64,

    /// Include subdomains in HSTS (default: true).
    #[serde(default = "default_true")]
    pub hsts_include_subdomains: bool,

    /// X-Frame-Options value: "DENY" or "SAMEORIGIN" (default: "DENY").
    #[serde(default = "default_frame_options")]
    pub frame_options: String,

    /// Content-Security-Policy header value (default: "default-src 'self'").
    #[serde(default = "default_csp")]
    pub content_security_policy: String,

    /// Referrer-Policy header value (default: "strict-origin-when-cross-origin").
    #[serde(default = "default_referrer_policy")]
    pub referrer_policy: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_hsts_max_age() -> u64 {
    31_536_000 // 1 year
}

fn default_frame_options() -> String {
    "DENY".to_string()
}

fn default_csp() -> String {
    "default-src 'self'".to_string()
}

fn default_referrer_policy() -> String {
    "strict-origin-when-cross-origin".to_string()
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            hsts_enabled: false,
            hsts_max_age: default_hsts_max_age(),
            hsts_include_subdomains: default_true(),
            frame_options: default_frame_options(),
            content_security_policy: default_csp(),
            referrer_policy: default_referrer_policy(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_port(),
                host: default_host(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
            whop: WhopConfig::default(),
            directory: DirectoryConfig::default(),
            cors: CorsConfig::default(),
            security_headers: SecurityHeadersConfig::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with RAFFLE_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("RAFFLE_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The Whop API key is deliberately not checked here; its absence is
    /// reported per directory request.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        if !self.whop.base_url.starts_with("http://") && !self.whop.base_url.starts_with("https://")
        {
            return Err(ConfigError::Validation(format!(
                "whop.base_url must start with http:// or https://, got: '{}'",
                self.whop.base_url
            )));
        }

        if self.whop.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "whop.request_timeout_secs cannot be 0".into(),
            ));
        }

        let dir = &self.directory;
        let page_settings = [
            ("directory.default_per", dir.default_per),
            ("directory.default_max_pages", dir.default_max_pages),
            ("directory.memberships_max_per", dir.memberships_max_per),
            ("directory.memberships_max_pages", dir.memberships_max_pages),
            ("directory.members_max_per", dir.members_max_per),
            ("directory.members_max_pages", dir.members_max_pages),
        ];
        for (name, value) in page_settings {
            if value == 0 {
                return Err(ConfigError::Validation(format!("{name} cannot be 0")));
            }
        }

        if !(0.0..=1.0).contains(&dir.generic_threshold) {
            return Err(ConfigError::Validation(format!(
                "directory.generic_threshold must be between 0 and 1, got: {}",
                dir.generic_threshold
            )));
        }

        if dir.default_status.trim().is_empty() {
            return Err(ConfigError::Validation(
                "directory.default_status cannot be empty".into(),
            ));
        }

        // CORS origins must be valid URLs or "*"
        for origin in &self.cors.allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "cors.allowed_origins contains invalid origin '{origin}'. Must be '*' or start with http:// or https://"
                )));
            }
        }

        // X-Frame-Options must be DENY or SAMEORIGIN
        let frame_opts = self.security_headers.frame_options.to_uppercase();
        if frame_opts != "DENY" && frame_opts != "SAMEORIGIN" {
            return Err(ConfigError::Validation(format!(
                "security_headers.frame_options must be 'DENY' or 'SAMEORIGIN', got: '{}'",
                self.security_headers.frame_options
            )));
        }

        Ok(())
    }
}
