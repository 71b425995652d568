use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Search engine id of the documentation site's programmable search engine.
pub const CSE_ID: &str = "009464073557249644318:1qhdjkmzcms";

const DEFAULT_CSE_BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub cse_id: String,
    pub cse_base_url: String,
    pub port: u16,
}

impl Config {
    /// Build the configuration from the environment. An absent API key is
    /// not an error here: it is reported per request at search time.
    pub fn from_env() -> Result<Config> {
        dotenv().ok(); // Load .env file if present

        let port = get_env_or_default("PORT", "8080")
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Config {
            // CSE_API_KEY is the primary variable, GOOGLE_API_KEY the
            // legacy fallback still set on older deployments.
            api_key: env::var("CSE_API_KEY")
                .or_else(|_| env::var("GOOGLE_API_KEY"))
                .unwrap_or_default(),
            cse_id: get_env_or_default("CSE_ID", CSE_ID),
            cse_base_url: get_env_or_default("CSE_BASE_URL", DEFAULT_CSE_BASE_URL),
            port,
        })
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
