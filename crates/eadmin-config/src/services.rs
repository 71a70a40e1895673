//! Sibling service locations and outbound call timeouts.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `AUTH_SERVICE_URL` | `http://auth:8083` |
//! | `UNIVERSITY_SERVICE_URL` | `http://university:8081` |
//! | `EMPLOYMENT_SERVICE_URL` | `http://employment-office:8082` |
//! | `AUTH_VERIFY_TIMEOUT_SECS` | `5` |
//! | `UPSTREAM_TIMEOUT_SECS` | `5` |
//! | `EMPLOYED_LOOKUP_TIMEOUT_SECS` | `3` |

use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServicesConfig {
    pub auth_url: String,
    pub university_url: String,
    pub employment_url: String,
    pub verify_timeout: Duration,
    pub upstream_timeout: Duration,
    pub employed_lookup_timeout: Duration,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            auth_url: "http://auth:8083".to_string(),
            university_url: "http://university:8081".to_string(),
            employment_url: "http://employment-office:8082".to_string(),
            verify_timeout: Duration::from_secs(5),
            upstream_timeout: Duration::from_secs(5),
            employed_lookup_timeout: Duration::from_secs(3),
        }
    }
}

impl ServicesConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            auth_url: url_var("AUTH_SERVICE_URL").unwrap_or(defaults.auth_url),
            university_url: url_var("UNIVERSITY_SERVICE_URL").unwrap_or(defaults.university_url),
            employment_url: url_var("EMPLOYMENT_SERVICE_URL").unwrap_or(defaults.employment_url),
            verify_timeout: secs_var("AUTH_VERIFY_TIMEOUT_SECS").unwrap_or(defaults.verify_timeout),
            upstream_timeout: secs_var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or(defaults.upstream_timeout),
            employed_lookup_timeout: secs_var("EMPLOYED_LOOKUP_TIMEOUT_SECS")
                .unwrap_or(defaults.employed_lookup_timeout),
        }
    }
}

fn url_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
}

fn secs_var(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_short_timeouts() {
        let config = ServicesConfig::default();
        assert_eq!(config.verify_timeout, Duration::from_secs(5));
        assert_eq!(config.employed_lookup_timeout, Duration::from_secs(3));
        assert!(config.auth_url.ends_with(":8083"));
    }
}
