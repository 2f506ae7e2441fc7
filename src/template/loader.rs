//! Template loader.
//!
//! Templates are looked up by name (`blog/post/list`) as `{name}.html` under
//! the configured directory. Names missing there fall back to the copies
//! compiled into the binary, so a deployment only needs to ship the
//! templates it overrides.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Result, TemplateContext, TemplateEngine, TemplateError, Value};

/// Name of the layout every page is wrapped in.
pub const BASE_TEMPLATE: &str = "base";

/// Templates compiled into the binary.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base", include_str!("../../templates/base.html")),
    ("error", include_str!("../../templates/error.html")),
    ("blog/post/list", include_str!("../../templates/blog/post/list.html")),
    ("blog/post/detail", include_str!("../../templates/blog/post/detail.html")),
    ("blog/post/share", include_str!("../../templates/blog/post/share.html")),
    ("blog/post/comment", include_str!("../../templates/blog/post/comment.html")),
    ("blog/post/search", include_str!("../../templates/blog/post/search.html")),
];

/// Template loader with a built-in fallback.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    /// Directory searched before the built-in templates.
    base_path: Option<PathBuf>,
}

impl TemplateLoader {
    /// Create a loader reading from `base_path` first.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: Some(base_path.as_ref().to_path_buf()),
        }
    }

    /// Create a loader that only uses the built-in templates.
    pub fn builtin() -> Self {
        Self { base_path: None }
    }

    /// Get the full path to a template file, if a directory is configured.
    fn template_path(&self, name: &str) -> Option<PathBuf> {
        self.base_path
            .as_ref()
            .map(|base| base.join(format!("{name}.html")))
    }

    /// Load a template's source.
    pub fn load(&self, name: &str) -> Result<String> {
        if name.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(TemplateError::NotFound(format!("invalid template name '{name}'")));
        }

        if let Some(path) = self.template_path(name).filter(|p| p.is_file()) {
            debug!(template = name, path = ?path, "loading template from disk");
            return fs::read_to_string(&path).map_err(|e| {
                TemplateError::Render(format!("Failed to read template '{name}': {e}"))
            });
        }

        builtin_template(name)
            .map(str::to_string)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Render a template on its own.
    pub fn render(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let content = self.load(name)?;
        TemplateEngine::render_string(&content, context)
    }

    /// Render a template as a full page inside the base layout.
    ///
    /// The rendered template is available to the layout as `{{{content}}}`.
    pub fn render_page(&self, name: &str, context: &TemplateContext) -> Result<String> {
        let content = self.render(name, context)?;

        let mut page_context = context.child();
        page_context.set("content", Value::String(content));
        self.render(BASE_TEMPLATE, &page_context)
    }

    /// Check if a template exists on disk or built in.
    pub fn has_template(&self, name: &str) -> bool {
        self.template_path(name).is_some_and(|p| p.is_file()) || builtin_template(name).is_some()
    }

    /// Get the template directory, if any.
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }
}

fn builtin_template(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, source)| *source)
}
