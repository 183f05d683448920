use config::{Config, Environment, Map};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// The `ConfigError` enum represents failures while loading the monitor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required variables are unset, empty, or split into no entries.
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    /// The environment could not be read or deserialized.
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

/// The `MonitorConfig` struct holds everything a monitoring run needs.
/// It is built once at startup and only ever borrowed afterwards.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// The credential for the Gemini API.
    pub api_key: String,
    /// The model to query, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// The domain whose presence counts as a URL mention.
    pub domain_name: String,
    /// The company name whose presence counts as a company mention.
    pub company_name: String,
    /// The product names to look for, in configuration order.
    pub product_names: Vec<String>,
    /// The prompts to send, in configuration order.
    pub queries: Vec<String>,
    /// The root URL of the generative API.
    pub api_base_url: String,
    /// The directory the CSV report is written to.
    pub output_dir: PathBuf,
}

/// Raw variables as they appear in the environment. The `config` crate lowercases keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    gemini_api_key: Option<String>,
    gemini_api_model: Option<String>,
    domain_name: Option<String>,
    company_name: Option<String>,
    product_names: Option<String>,
    target_queries: Option<String>,
    gemini_api_base_url: Option<String>,
    llmo_output_dir: Option<String>,
}

impl MonitorConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `MonitorConfig`, or a `ConfigError` naming every missing variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    /// Loads the configuration from an explicit set of variables instead of the process environment.
    ///
    /// # Arguments
    ///
    /// * `vars` - Variable name and value pairs, named exactly as in the environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source: Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(Environment::default().source(Some(source)))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let raw: RawSettings = Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        Self::validate(raw)
    }

    fn validate(raw: RawSettings) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let mut required = |value: Option<String>, name: &'static str| {
            match value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                Some(v) => v,
                None => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let api_key = required(raw.gemini_api_key, "GEMINI_API_KEY");
        let model = required(raw.gemini_api_model, "GEMINI_API_MODEL");
        let domain_name = required(raw.domain_name, "DOMAIN_NAME");
        let company_name = required(raw.company_name, "COMPANY_NAME");

        let product_names = split_list(raw.product_names.as_deref(), ',');
        if product_names.is_empty() {
            missing.push("PRODUCT_NAMES");
        }
        let queries = split_list(raw.target_queries.as_deref(), '|');
        if queries.is_empty() {
            missing.push("TARGET_QUERIES");
        }

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let api_base_url = raw
            .gemini_api_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| crate::DEFAULT_API_BASE_URL.to_string());

        let output_dir = raw
            .llmo_output_dir
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            api_key,
            model,
            domain_name,
            company_name,
            product_names,
            queries,
            api_base_url,
            output_dir,
        })
    }
}

/// Splits a delimited list, trimming entries and dropping empty ones.
fn split_list(value: Option<&str>, separator: char) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(separator)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}
