use crate::constants::DEFAULT_REST_TIMEOUT;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::error;

#[derive(Debug, Deserialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub rest_api: RestApiConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: String,
    /// Seconds allowed for a single request attempt or refresh exchange.
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// File holding the persisted access and refresh tokens.
    pub token_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Coalesce concurrent refresh calls into one in-flight exchange.
    pub single_flight_refresh: bool,
}

impl RestApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Joins `endpoint` onto the base URL with exactly one slash between them.
    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"username\":\"{}\",\"password\":\"[REDACTED]\"}}",
            self.username
        )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"credentials\":{},\"rest_api\":{},\"storage\":{},\"session\":{}}}",
            self.credentials, self.rest_api, self.storage, self.session
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"token_path\":\"{}\"}}", self.token_path.display())
    }
}

impl fmt::Display for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"single_flight_refresh\":{}}}",
            self.single_flight_refresh
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            credentials: Credentials {
                username: get_env_or_default("WADAS_USERNAME", String::new()),
                password: get_env_or_default("WADAS_PASSWORD", String::new()),
            },
            rest_api: RestApiConfig {
                base_url: get_env_or_default(
                    "WADAS_BASE_URL",
                    String::from("https://localhost:443/"),
                ),
                timeout: get_env_or_default("WADAS_REST_TIMEOUT", DEFAULT_REST_TIMEOUT),
            },
            storage: StorageConfig {
                token_path: get_env_or_default(
                    "WADAS_TOKEN_PATH",
                    PathBuf::from(".wadas/session.json"),
                ),
            },
            session: SessionConfig {
                single_flight_refresh: get_env_or_default("WADAS_SINGLE_FLIGHT_REFRESH", true),
            },
        }
    }
}


#[cfg(test)]
mod tests_display {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn test_credentials_display() {
        let credentials = Credentials {
            username: "ranger".to_string(),
            password: "s3cret".to_string(),
        };

        let display_output = credentials.to_string();
        let expected_json = json!({
            "username": "ranger",
            "password": "[REDACTED]"
        });

        assert_json_eq!(
            serde_json::from_str::<serde_json::Value>(&display_output).unwrap(),
            expected_json
        );
    }

    #[test]
    fn test_config_display() {
        let config = Config {
            credentials: Credentials {
                username: "ranger".to_string(),
                password: "s3cret".to_string(),
            },
            rest_api: RestApiConfig {
                base_url: "https://wadas.example.org/".to_string(),
                timeout: 30,
            },
            storage: StorageConfig {
                token_path: PathBuf::from("/var/lib/wadas/session.json"),
            },
            session: SessionConfig {
                single_flight_refresh: true,
            },
        };

        let display_output = config.to_string();
        let expected_json = json!({
            "credentials": {
                "username": "ranger",
                "password": "[REDACTED]"
            },
            "rest_api": {
                "base_url": "https://wadas.example.org/",
                "timeout": 30
            },
            "storage": {
                "token_path": "/var/lib/wadas/session.json"
            },
            "session": {
                "single_flight_refresh": true
            }
        });

        assert_json_eq!(
            serde_json::from_str::<serde_json::Value>(&display_output).unwrap(),
            expected_json
        );
    }
}
