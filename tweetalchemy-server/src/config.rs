use clap::Parser;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Parser, Debug, Clone)]
#[command(name = "tweetalchemy-server")]
pub struct ServerArgs {
    #[arg(long, env = "TWEETALCHEMY_BIND", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    /// Key for the OpenAI-compatible completion API.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "TWEETALCHEMY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "TWEETALCHEMY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("an API key is required (set GEMINI_API_KEY or pass --api-key)")]
    MissingApiKey,
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base URL must use http or https, got {0}")]
    UnsupportedScheme(String),
    #[error("model name must not be empty")]
    EmptyModel,
}

/// Validated process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_address: String,
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
}

impl TryFrom<ServerArgs> for Settings {
    type Error = ConfigError;

    fn try_from(args: ServerArgs) -> Result<Self, Self::Error> {
        let api_key = args
            .api_key
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let base_url = Url::parse(args.base_url.trim()).map_err(|source| {
            ConfigError::InvalidBaseUrl {
                url: args.base_url.clone(),
                source,
            }
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_owned()));
        }

        let model = args.model.trim().to_owned();
        if model.is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        Ok(Self {
            bind_address: args.bind_address,
            api_key,
            base_url,
            model,
        })
    }
}
