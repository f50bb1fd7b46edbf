//! Error types for Outreach
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while running the outreach pipeline
#[derive(Debug, Error)]
pub enum OutreachError {
    /// The recipient brief was empty or whitespace only
    #[error("Recipient brief must not be empty")]
    EmptyBrief,

    /// A draft or formatting agent failed to generate text
    #[error("Generation failed in {agent}: {message}")]
    Generation { agent: String, message: String },

    /// No draft was available to choose from
    #[error("Selection failed: {0}")]
    Selection(String),

    /// Subject or HTML formatting failed before delivery
    #[error("Formatting failed at {step}: {message}")]
    Formatting { step: String, message: String },

    /// LLM client setup error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Invalid or incomplete configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Tool dispatch error (unknown tool, bad input)
    #[error("Tool error: {0}")]
    Tool(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OutreachError {
    /// Build a generation error for the named agent
    pub fn generation(agent: impl Into<String>, message: impl ToString) -> Self {
        Self::Generation {
            agent: agent.into(),
            message: message.to_string(),
        }
    }

    /// Build a formatting error for the named step
    pub fn formatting(step: impl Into<String>, message: impl ToString) -> Self {
        Self::Formatting {
            step: step.into(),
            message: message.to_string(),
        }
    }

    /// Short stage label for presentation ("generation", "selection", ...)
    pub fn stage(&self) -> &'static str {
        match self {
            OutreachError::EmptyBrief => "input",
            OutreachError::Generation { .. } | OutreachError::Llm(_) => "generation",
            OutreachError::Selection(_) => "selection",
            OutreachError::Formatting { .. } => "formatting",
            OutreachError::Config(_) => "config",
            OutreachError::Tool(_) | OutreachError::Io(_) | OutreachError::Json(_) => "internal",
        }
    }
}

/// Result type alias for Outreach operations
pub type Result<T> = std::result::Result<T, OutreachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_brief_error() {
        let err = OutreachError::EmptyBrief;
        assert_eq!(err.to_string(), "Recipient brief must not be empty");
        assert_eq!(err.stage(), "input");
    }

    #[test]
    fn test_generation_error() {
        let err = OutreachError::generation("Busy Sales Agent", "rate limited");
        assert_eq!(err.to_string(), "Generation failed in Busy Sales Agent: rate limited");
        assert_eq!(err.stage(), "generation");
    }

    #[test]
    fn test_selection_error() {
        let err = OutreachError::Selection("no drafts available".to_string());
        assert_eq!(err.to_string(), "Selection failed: no drafts available");
        assert_eq!(err.stage(), "selection");
    }

    #[test]
    fn test_formatting_error() {
        let err = OutreachError::formatting("subject_writer", "timeout");
        assert_eq!(err.to_string(), "Formatting failed at subject_writer: timeout");
        assert_eq!(err.stage(), "formatting");
    }

    #[test]
    fn test_tool_error() {
        let err = OutreachError::Tool("Unknown tool: foo".to_string());
        assert_eq!(err.to_string(), "Tool error: Unknown tool: foo");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OutreachError = io_err.into();
        assert!(matches!(err, OutreachError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: OutreachError = json_err.into();
        assert!(matches!(err, OutreachError::Json(_)));
    }
}
