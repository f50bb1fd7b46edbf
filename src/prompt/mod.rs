//! Prompt System - agent instruction templates and rendering
//!
//! Instructions are Handlebars templates over the company profile.

mod render;
pub mod templates;

pub use render::PromptRenderer;
pub use templates::PromptContext;
