use std::{
    env,
    net::{IpAddr, SocketAddr},
};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/users.db?mode=rwc";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let max_connections = parse_env("DATABASE_MAX_CONNECTIONS", "positive integer", 5u32)?;
        let host = parse_env("HOST", "IP address", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env("PORT", "port number", 8080u16)?;
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                expected: "positive integer",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            environment,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

fn parse_env<T: std::str::FromStr>(
    key: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value,
        }),
        Err(_) => Ok(default),
    }
}
