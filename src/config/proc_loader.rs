use std::{fs, path::Path};

use anyhow::Result;
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::settings::LoggingConfig;
use crate::config::types::ServiceConfig;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)?;

    let expanded = expand_env_vars(&content)?;
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    let service_config = initiate_default_values(service_config);
    debug!("validation config ...");
    proc_validator::validate_service_config(&service_config)?;

    Ok(service_config)
}

/// Fill defaults and drop values that expanded to empty strings.
fn initiate_default_values(mut config: ServiceConfig) -> ServiceConfig {
    if config.logging.is_none() {
        config.logging = Some(LoggingConfig::default());
    }
    config.api_key = non_empty(config.api_key);
    config.payment_means.base_url =
        non_empty(config.payment_means.base_url).map(|url| url.trim_end_matches('/').to_owned());
    config.upstream.base_url = config.upstream.base_url.trim().trim_end_matches('/').to_owned();
    config.upstream.api_prefix = config.upstream.api_prefix.trim_end_matches('/').to_owned();
    config
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Replaces `${VAR}` and `${VAR:default}` with values from the environment.
fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}")?;
    let expanded = re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    });
    Ok(expanded.to_string())
}
