use callrelay_core::llm_client::{DEFAULT_CHAT_MODEL, GROQ_API_BASE};
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// What the relay does when the upstream completion fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Speak the apology and keep the call going.
    #[default]
    Apologize,
    /// Speak the apology and ask the platform to hang up.
    EndCall,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apologize" => Ok(FailurePolicy::Apologize),
            "end_call" => Ok(FailurePolicy::EndCall),
            other => Err(format!("'{}' is not one of: apologize, end_call", other)),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub groq_api_key: String,
    pub webhook_api_key: Option<String>,
    pub llm_base_url: String,
    pub chat_model: String,
    pub transcript_window: Option<usize>,
    pub failure_policy: FailurePolicy,
    /// `EnvFilter` directives, validated at load time.
    pub log_filter: String,
}

/// Picks the dotenv file for the current environment.
///
/// `APP_ENV` takes precedence over `NODE_ENV`.
fn env_file() -> &'static str {
    let environment = std::env::var("APP_ENV").or_else(|_| std::env::var("NODE_ENV"));
    match environment.as_deref() {
        Ok("development") => ".env.development",
        _ => ".env",
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::from_filename(env_file()).ok();
        }

        let port_str = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port = port_str
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?;
        let bind_address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let groq_api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| ConfigError::MissingVar("GROQ_API_KEY".to_string()))?;

        let webhook_api_key = std::env::var("RETELL_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let llm_base_url =
            std::env::var("LLM_BASE_URL").unwrap_or_else(|_| GROQ_API_BASE.to_string());

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());

        let transcript_window = match std::env::var("TRANSCRIPT_WINDOW") {
            Ok(value) => Some(value.parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("TRANSCRIPT_WINDOW".to_string(), e.to_string())
            })?),
            Err(_) => None,
        };

        let failure_policy = match std::env::var("UPSTREAM_FAILURE_POLICY") {
            Ok(value) => value.parse::<FailurePolicy>().map_err(|e| {
                ConfigError::InvalidValue("UPSTREAM_FAILURE_POLICY".to_string(), e)
            })?,
            Err(_) => FailurePolicy::default(),
        };

        let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(&log_filter)
            .map_err(|e| ConfigError::InvalidValue("RUST_LOG".to_string(), e.to_string()))?;

        Ok(Self {
            bind_address,
            groq_api_key,
            webhook_api_key,
            llm_base_url,
            chat_model,
            transcript_window,
            failure_policy,
            log_filter,
        })
    }
}
