//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks the invariants the gateway relies on at runtime:
//!   * token safety margin vs assumed validity window
//!   * absolute upstream URLs
//!   * non-empty credentials
//!   * positive timeouts that fit in a Duration, alone and summed
//!   * server / logging values

use std::time::Duration;

use reqwest::Url;
use tracing::{error, info};

use crate::config::settings::{LoggingConfig, ServerConfig, TimeoutsConfig, TokenConfig};
use crate::config::types::ServiceConfig;
use crate::config::upstream::{PaymentMeansConfig, UpstreamConfig};
use anyhow::{bail, Result};

/// Public entrypoint: returns Ok(()) or an error listing every issue found.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    validate_server(&cfg.server, &mut errors);
    if let Some(logging) = &cfg.logging {
        validate_logging(logging, &mut errors);
    }
    validate_upstream(&cfg.upstream, &mut errors);
    validate_token(&cfg.token, &mut errors);
    validate_timeouts(&cfg.timeouts, &mut errors);
    validate_payment_means(&cfg.payment_means, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        return Ok(());
    }

    error!("configuration validation errors ({}):", errors.len());
    for e in &errors {
        error!(" - {}", e);
    }
    bail!(
        "config is not valid, total errors:{}, \n{}",
        errors.len(),
        errors.join("\n")
    )
}

fn validate_server(server: &ServerConfig, errors: &mut Vec<String>) {
    if server.host.trim().is_empty() {
        errors.push("server.host must not be empty".to_string());
    }
    if server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "server.port '{}' must be an integer in range 0-65535",
            server.port
        ));
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    let valid = ["trace", "debug", "info", "warn", "error"];
    if !valid.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "logging.level '{}' invalid; allowed: {:?}",
            logging.level, valid
        ));
    }
}

fn validate_upstream(upstream: &UpstreamConfig, errors: &mut Vec<String>) {
    validate_http_url("upstream.base_url", &upstream.base_url, errors);

    if upstream.auth_path.trim().is_empty() {
        errors.push("upstream.auth_path must not be empty".to_string());
    } else if !upstream.auth_path.starts_with('/') {
        errors.push(format!(
            "upstream.auth_path '{}' must start with '/'",
            upstream.auth_path
        ));
    }
    if !upstream.api_prefix.is_empty() && !upstream.api_prefix.starts_with('/') {
        errors.push(format!(
            "upstream.api_prefix '{}' must start with '/'",
            upstream.api_prefix
        ));
    }
    if upstream.credentials.username.is_empty() {
        errors.push("upstream.credentials.username must not be empty".to_string());
    }
    if upstream.credentials.password.is_empty() {
        errors.push("upstream.credentials.password must not be empty".to_string());
    }
}

fn validate_token(token: &TokenConfig, errors: &mut Vec<String>) {
    if token.validity_window_seconds == 0 {
        errors.push("token.validity_window_seconds must be > 0".to_string());
    }
    // otherwise every token would be expired on arrival
    if token.safety_margin_seconds >= token.validity_window_seconds {
        errors.push(format!(
            "token.safety_margin_seconds ({}) must be < token.validity_window_seconds ({})",
            token.safety_margin_seconds, token.validity_window_seconds
        ));
    }
}

fn validate_timeouts(timeouts: &TimeoutsConfig, errors: &mut Vec<String>) {
    let all = [
        ("connect_seconds", timeouts.connect_seconds),
        ("read_seconds", timeouts.read_seconds),
        ("write_seconds", timeouts.write_seconds),
        ("pool_seconds", timeouts.pool_seconds),
    ];
    for (name, value) in all {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("timeouts.{} ({}) must be > 0", name, value));
        } else if Duration::try_from_secs_f64(value).is_err() {
            errors.push(format!("timeouts.{} ({}) is too large", name, value));
        }
    }

    let total: f64 = all.iter().map(|(_, value)| value).sum();
    if total.is_finite() && total > 0.0 && Duration::try_from_secs_f64(total).is_err() {
        errors.push(format!("timeouts sum to {}s, which is too large", total));
    }
}

fn validate_payment_means(payment_means: &PaymentMeansConfig, errors: &mut Vec<String>) {
    if let Some(base_url) = &payment_means.base_url {
        validate_http_url("payment_means.base_url", base_url, errors);
    }
}

fn validate_http_url(path: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "{} '{}' must use http or https, got '{}'",
            path,
            value,
            url.scheme()
        )),
        Err(e) => errors.push(format!("{} '{}' is not a valid URL: {}", path, value, e)),
    }
}
