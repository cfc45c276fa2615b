use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Gemini REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default upstream request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct VrImageConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub models: ModelConfig,
    pub google: GoogleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model for image generation (e.g., imagen-3.0-generate-002)
    pub image_model: String,
    /// Model that turns experiment details into an image prompt (e.g., gemini-2.0-flash)
    pub prompt_model: String,
    /// Model for the text fallback and the API key test (e.g., gemini-1.5-pro)
    pub text_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

impl VrImageConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(VrImageConfig {
            common: common_config,
            models: ModelConfig {
                image_model: get_env(
                    "GENAI_IMAGE_MODEL",
                    Some("imagen-3.0-generate-002"),
                    is_prod,
                )?,
                prompt_model: get_env("GENAI_PROMPT_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-1.5-pro"), is_prod)?,
            },
            google: GoogleConfig {
                api_key: Secret::new(get_env("GOOGLE_API_KEY", None, is_prod)?),
                api_base: get_env("GENAI_API_BASE", Some(DEFAULT_API_BASE), is_prod)?,
                request_timeout_secs: get_env(
                    "GENAI_REQUEST_TIMEOUT_SECS",
                    Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    resolve(key, env::var(key).ok(), default, is_prod)
}

fn resolve(
    key: &str,
    value: Option<String>,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match value {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
