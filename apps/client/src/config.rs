use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_ANALYZE_URL: &str = "https://ats-wpgh.onrender.com/analyze";

/// Client configuration loaded from environment variables (and `.env` if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub analyze_url: String,
    pub request_timeout: Duration,
    pub strict_consistency: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            analyze_url: lookup("ANALYZE_URL").unwrap_or_else(|| DEFAULT_ANALYZE_URL.to_string()),
            request_timeout: Duration::from_secs(request_timeout),
            strict_consistency: parse_flag(
                "STRICT_SKILL_CONSISTENCY",
                lookup("STRICT_SKILL_CONSISTENCY"),
            )?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_flag(key: &str, value: Option<String>) -> Result<bool> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => anyhow::bail!("{key} must be true or false, got '{v}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.analyze_url, DEFAULT_ANALYZE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(!config.strict_consistency);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("ANALYZE_URL", "http://localhost:5000/analyze"),
            ("REQUEST_TIMEOUT_SECS", "15"),
            ("STRICT_SKILL_CONSISTENCY", "TRUE"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();
        assert_eq!(config.analyze_url, "http://localhost:5000/analyze");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert!(config.strict_consistency);
        assert_eq!(config.rust_log, "debug");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = config_from(&[("REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        let err = config_from(&[("STRICT_SKILL_CONSISTENCY", "maybe")]).unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }
}
