//! Shared application state.

use std::sync::Arc;

use axum::response::Html;
use serde_json::{json, Value as JsonValue};

use crate::blog::BlogService;
use crate::config::Config;
use crate::db::Database;
use crate::mail::MailTransport;
use crate::template::{TemplateContext, TemplateLoader};
use crate::BlogError;

use super::error::WebError;

/// State shared by every request. Immutable after startup.
pub struct AppState {
    /// Database connection pool.
    pub db: Database,
    /// Page templates.
    pub templates: TemplateLoader,
    /// Outbound mail transport.
    pub mail: Arc<dyn MailTransport>,
    /// Application configuration.
    pub config: Config,
}

impl AppState {
    /// Create state with templates read from the configured directory.
    pub fn new(config: Config, db: Database, mail: Arc<dyn MailTransport>) -> Self {
        let templates = TemplateLoader::new(&config.templates.path);
        Self {
            db,
            templates,
            mail,
            config,
        }
    }

    /// Replace the template loader.
    pub fn with_templates(mut self, templates: TemplateLoader) -> Self {
        self.templates = templates;
        self
    }

    /// Timezone for post dates.
    pub fn timezone(&self) -> &str {
        &self.config.server.timezone
    }

    /// A blog service pinned to the current instant.
    pub fn service(&self) -> BlogService<'_> {
        BlogService::new(&self.db, self.timezone())
    }

    /// Scheme and host that absolute links are built on.
    ///
    /// The configured base URL wins; otherwise the request's Host header,
    /// which must name one of `site.allowed_hosts`.
    pub fn site_root(&self, host: Option<&str>) -> Result<String, WebError> {
        if let Some(base_url) = &self.config.site.base_url {
            return Ok(base_url.trim_end_matches('/').to_string());
        }

        let host = host.unwrap_or("localhost");
        if !host_allowed(host, &self.config.site.allowed_hosts) {
            tracing::warn!(host, "rejected Host header not in site.allowed_hosts");
            return Err(WebError::bad_request("Invalid Host header"));
        }
        Ok(format!("http://{host}"))
    }

    /// Render a page template inside the layout.
    ///
    /// `data` must be a JSON object; the site block and `title` are added.
    pub fn render(&self, name: &str, title: &str, data: JsonValue) -> Result<Html<String>, WebError> {
        let mut context = TemplateContext::from_json(data);
        context.set("title", title.into());
        context.set("site", self.site_value());

        let html = self
            .templates
            .render_page(name, &context)
            .map_err(BlogError::from)?;
        Ok(Html(html))
    }

    fn site_value(&self) -> crate::template::Value {
        json!({
            "name": self.config.site.name,
            "description": self.config.site.description,
        })
        .into()
    }
}

/// Whether the name part of a Host header value matches an allowed pattern.
fn host_allowed(host: &str, allowed: &[String]) -> bool {
    let name = match host.rsplit_once(':') {
        Some((name, port)) if !name.ends_with(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    };
    if name.is_empty()
        || !name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'[' | b']' | b':'))
    {
        return false;
    }
    let name = name.to_ascii_lowercase();

    allowed.iter().any(|pattern| {
        let pattern = pattern.to_ascii_lowercase();
        if pattern == "*" {
            true
        } else if let Some(domain) = pattern.strip_prefix('.') {
            name == domain || name.ends_with(&pattern)
        } else {
            name == pattern
        }
    })
}
