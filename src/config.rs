//! Configuration module for the blog.

use serde::Deserialize;
use std::path::Path;

use crate::{BlogError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timezone used for publish dates in URLs and pages (e.g., "Europe/Madrid", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timezone: default_timezone(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/blog.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Site information configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Name of the blog, shown in the page header.
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Short description shown under the name.
    #[serde(default = "default_site_description")]
    pub description: String,
    /// Public base URL (e.g., "https://blog.example.com").
    ///
    /// When unset, absolute URLs are built from the request's Host header.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Host names accepted from the Host header when `base_url` is unset.
    ///
    /// A leading dot matches the domain and its subdomains; `*` matches any
    /// host.
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
}

fn default_site_name() -> String {
    "My Blog".to_string()
}

fn default_site_description() -> String {
    "This is my blog.".to_string()
}

fn default_allowed_hosts() -> Vec<String> {
    vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
        "[::1]".to_string(),
    ]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            description: default_site_description(),
            base_url: None,
            allowed_hosts: default_allowed_hosts(),
        }
    }
}

/// Templates configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesConfig {
    /// Path to the templates directory.
    ///
    /// Templates missing from this directory fall back to the built-in ones.
    #[serde(default = "default_templates_path")]
    pub path: String,
}

fn default_templates_path() -> String {
    "templates".to_string()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            path: default_templates_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/blog.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Outbound mail configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// SMTP relay host. Empty disables delivery (messages are only logged).
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// Use STARTTLS instead of implicit TLS.
    #[serde(default = "default_use_starttls")]
    pub use_starttls: bool,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_use_starttls() -> bool {
    true
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            use_starttls: default_use_starttls(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Site information.
    #[serde(default)]
    pub site: SiteConfig,
    /// Templates configuration.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Outbound mail configuration.
    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BlogError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BlogError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables (empty values are ignored):
    /// - `BLOG_SMTP_HOST`
    /// - `BLOG_SMTP_USERNAME`
    /// - `BLOG_SMTP_PASSWORD`
    /// - `BLOG_BASE_URL`
    pub fn apply_env_overrides(&mut self) {
        if let Some(host) = env_non_empty("BLOG_SMTP_HOST") {
            self.mail.smtp_host = host;
        }
        if let Some(username) = env_non_empty("BLOG_SMTP_USERNAME") {
            self.mail.smtp_username = Some(username);
        }
        if let Some(password) = env_non_empty("BLOG_SMTP_PASSWORD") {
            self.mail.smtp_password = Some(password);
        }
        if let Some(base_url) = env_non_empty("BLOG_BASE_URL") {
            self.site.base_url = Some(base_url);
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the server timezone is not a known IANA name
    /// - SMTP credentials are set but no SMTP host is configured
    /// - the site base URL is not an absolute URL
    /// - mail is delivered over SMTP while links may carry any Host header
    pub fn validate(&self) -> Result<()> {
        if self.server.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(BlogError::Config(format!(
                "unknown timezone '{}'",
                self.server.timezone
            )));
        }

        if self.mail.smtp_host.trim().is_empty()
            && (self.mail.smtp_username.is_some() || self.mail.smtp_password.is_some())
        {
            return Err(BlogError::Config(
                "SMTP credentials are set but smtp_host is empty. \
                 Set it in config.toml or via BLOG_SMTP_HOST environment variable."
                    .to_string(),
            ));
        }

        if let Some(base_url) = &self.site.base_url {
            url::Url::parse(base_url)
                .map_err(|e| BlogError::Config(format!("invalid site.base_url: {e}")))?;
        }

        if !self.mail.smtp_host.trim().is_empty()
            && self.site.base_url.is_none()
            && self.site.allowed_hosts.iter().any(|h| h == "*")
        {
            return Err(BlogError::Config(
                "site.allowed_hosts accepts any host while SMTP is configured. \
                 Set site.base_url or list the served host names."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
