//! Prompt Renderer - Render agent instructions with Handlebars
//!
//! Agent instructions are templates over the company profile (name, pitch)
//! and, for draft agents, the style directive.

use handlebars::Handlebars;
use serde::Serialize;

use super::templates;
use crate::error::{OutreachError, Result};

/// Renders prompt templates using Handlebars templating
pub struct PromptRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptRenderer {
    /// Create a new PromptRenderer with no templates registered
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        // Instructions are plain text, never HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Renderer with every built-in agent template registered
    pub fn with_builtin_templates() -> Result<Self> {
        let mut renderer = Self::new();
        for (name, template) in templates::BUILTIN {
            renderer.register_template(name, template)?;
        }
        Ok(renderer)
    }

    /// Register a named template for later use
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| {
                OutreachError::Config(format!("Failed to register template '{}': {}", name, e))
            })
    }

    /// Render a previously registered template
    pub fn render_named<T: Serialize>(&self, name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(name, context)
            .map_err(|e| {
                OutreachError::Config(format!("Failed to render template '{}': {}", name, e))
            })
    }
}
