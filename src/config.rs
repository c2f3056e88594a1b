use dotenvy::dotenv;
use std::env;
use thiserror::Error;

const DEFAULT_WTTR_BASE_URL: &str = "http://v2.wttr.in";
const DEFAULT_WTTR_LOCATION: &str = "weilheim";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("invalid WTTR_BASE_URL: {0}")]
    InvalidWttrBaseUrl(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub token: String,
    pub wttr_base_url: String,
    pub wttr_default_location: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        if cfg!(not(test)) {
            let _ = dotenv();
        }

        let token =
            env::var("TELOXIDE_TOKEN").map_err(|_| ConfigError::MissingEnv("TELOXIDE_TOKEN"))?;

        let wttr_base_url = match env::var("WTTR_BASE_URL") {
            Ok(s) if !s.trim().is_empty() => {
                url::Url::parse(&s).map_err(|_| ConfigError::InvalidWttrBaseUrl(s.clone()))?;
                s.trim_end_matches('/').to_string()
            }
            _ => DEFAULT_WTTR_BASE_URL.to_string(),
        };

        let wttr_default_location = env::var("WTTR_DEFAULT_LOCATION")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WTTR_LOCATION.to_string());

        Ok(AppConfig {
            token,
            wttr_base_url,
            wttr_default_location,
        })
    }
}
