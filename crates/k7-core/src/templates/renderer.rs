//! Handlebars-based template renderer for manifest entries.
//!
//! Wraps the [`handlebars::Handlebars`] engine with **strict mode** enabled.
//! Strict mode ensures that any `{{variable}}` referenced in a template must be
//! present in the parameter context; otherwise rendering returns an error. The
//! templates produce Go source, so a silently empty variable would surface much
//! later as a confusing compile error in the generated project.
//!
//! HTML escaping is disabled: output is source code, not markup.
//!
//! Parsing and execution are separate steps so that a malformed built-in
//! template ([`K7Error::TemplateParse`]) can be told apart from a context that
//! lacks a field ([`K7Error::TemplateExec`]). Both carry the output path the
//! template was registered under.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::templates::renderer::TemplateRenderer;
//!
//! let mut renderer = TemplateRenderer::new();
//! let data = serde_json::json!({ "project_name": "demo" });
//! let output = renderer.render_file("README.md", b"# {{project_name}}", &data)?;
//! ```

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::{K7Error, Result};

pub struct TemplateRenderer {
    hbs: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Create a new renderer with strict mode enabled and escaping disabled.
    pub fn new() -> Self {
        let mut hbs = Handlebars::new();
        hbs.set_strict_mode(true);
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Parse `source` as a template identified by `name`, then execute it against `data`.
    ///
    /// The template is dropped from the registry afterwards; one pass per file.
    pub fn render_file(&mut self, name: &str, source: &[u8], data: &Value) -> Result<String> {
        let text = std::str::from_utf8(source).map_err(|e| K7Error::TemplateParse {
            path: name.to_string(),
            message: format!("template body is not UTF-8: {e}"),
        })?;

        self.hbs
            .register_template_string(name, text)
            .map_err(|e| K7Error::TemplateParse {
                path: name.to_string(),
                message: e.to_string(),
            })?;

        let rendered = self.hbs.render(name, data).map_err(|e| K7Error::TemplateExec {
            path: name.to_string(),
            message: e.to_string(),
        });
        self.hbs.unregister_template(name);
        rendered
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
