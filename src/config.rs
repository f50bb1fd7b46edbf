use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::agents::HtmlMode;
use crate::delivery::SENDGRID_API_URL;
use crate::domain::DraftStyle;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub company: CompanyConfig,
    pub llm: LlmConfig,
    pub email: EmailConfig,
    pub selection: SelectionConfig,
    pub formatting: FormattingConfig,
}

/// Who the sales agents work for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyConfig {
    pub name: String,
    pub pitch: String,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: "ComplAI".to_string(),
            pitch: "a SaaS tool for ensuring SOC2 compliance and preparing for audits, powered by AI"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding the provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => crate::llm::openai::API_KEY_ENV,
            LlmProvider::Anthropic => crate::llm::anthropic::API_KEY_ENV,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Model override; the provider default is used when unset
    pub model: Option<String>,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: None,
            max_tokens: 1024,
            timeout_ms: 120000,
        }
    }
}

impl LlmConfig {
    /// Model that will actually be used
    pub fn effective_model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, LlmProvider::OpenAi) => crate::llm::openai::DEFAULT_MODEL,
            (None, LlmProvider::Anthropic) => crate::llm::anthropic::DEFAULT_MODEL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub from: String,
    pub to: String,
    pub api_key_env: String,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: "sales@complai.example".to_string(),
            to: "prospect@example.com".to_string(),
            api_key_env: "SENDGRID_API_KEY".to_string(),
            endpoint: SENDGRID_API_URL.to_string(),
            timeout_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicyKind {
    #[default]
    Judge,
    Preference,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub policy: SelectionPolicyKind,
    /// Style order used by the preference policy
    pub preference: Vec<DraftStyle>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            policy: SelectionPolicyKind::default(),
            preference: DraftStyle::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    pub html_mode: HtmlMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            company: CompanyConfig::default(),
            llm: LlmConfig::default(),
            email: EmailConfig::default(),
            selection: SelectionConfig::default(),
            formatting: FormattingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir
                .join(project_name)
                .join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!(
                            "Failed to load config from {}: {}",
                            primary_config.display(),
                            e
                        );
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!(
                        "Failed to load config from {}: {}",
                        fallback_config.display(),
                        e
                    );
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.email.from.trim().is_empty() || self.email.to.trim().is_empty() {
            eyre::bail!("email.from and email.to must both be set");
        }
        if self.company.name.trim().is_empty() {
            eyre::bail!("company.name must be set");
        }
        if self.llm.max_tokens == 0 {
            eyre::bail!("llm.max_tokens must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.company.name, "ComplAI");
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.effective_model(), "gpt-4o-mini");
        assert_eq!(config.email.api_key_env, "SENDGRID_API_KEY");
        assert_eq!(config.selection.policy, SelectionPolicyKind::Judge);
        assert_eq!(config.selection.preference, DraftStyle::ALL.to_vec());
        assert_eq!(config.formatting.html_mode, HtmlMode::Llm);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "llm:\n  provider: anthropic\n\
             email:\n  to: cto@bank.example\n\
             selection:\n  policy: preference\n  preference: [concise, witty]\n\
             formatting:\n  html_mode: local"
        )
        .unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();

        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.effective_model(), crate::llm::anthropic::DEFAULT_MODEL);
        assert_eq!(config.llm.max_tokens, 1024);
        assert_eq!(config.email.to, "cto@bank.example");
        assert_eq!(config.email.from, "sales@complai.example");
        assert_eq!(config.selection.policy, SelectionPolicyKind::Preference);
        assert_eq!(config.selection.preference, vec![DraftStyle::Concise, DraftStyle::Witty]);
        assert_eq!(config.formatting.html_mode, HtmlMode::Local);
    }

    #[test]
    fn test_model_override() {
        let config: Config = serde_yaml::from_str("llm:\n  model: gpt-4o").unwrap();
        assert_eq!(config.llm.effective_model(), "gpt-4o");
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/outreach.yml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/outreach.yml"));
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "selection:\n  policy: coin-flip").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_blank_recipient() {
        let mut config = Config::default();
        config.email.to = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_key_env() {
        assert_eq!(LlmProvider::OpenAi.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(LlmProvider::Anthropic.api_key_env(), "ANTHROPIC_API_KEY");
    }
}
