use std::{collections::HashMap, env, net::IpAddr};

use serial_test::serial;
use user_crud::config::{AppConfig, ConfigError};

const KEYS: [&str; 5] = [
    "DATABASE_URL",
    "DATABASE_MAX_CONNECTIONS",
    "HOST",
    "PORT",
    "ENVIRONMENT",
];

#[derive(Default)]
struct EnvGuard {
    original: HashMap<String, Option<String>>,
}

impl EnvGuard {
    fn cleared() -> Self {
        let mut guard = Self::default();
        for key in KEYS {
            guard.remove(key);
        }
        guard
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::set_var(key, value.into());
    }

    fn remove(&mut self, key: &str) {
        self.original
            .entry(key.to_string())
            .or_insert_with(|| env::var(key).ok());
        env::remove_var(key);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.original.drain() {
            match value {
                Some(v) => env::set_var(&key, v),
                None => env::remove_var(&key),
            }
        }
    }
}

#[test]
#[serial]
fn defaults_apply_when_environment_is_empty() {
    let _env_guard = EnvGuard::cleared();

    let config = AppConfig::from_env().expect("defaults to be valid");
    assert_eq!(config.database_url, "sqlite://data/users.db?mode=rwc");
    assert_eq!(config.max_connections, 5);
    assert_eq!(config.host, IpAddr::from([127, 0, 0, 1]));
    assert_eq!(config.port, 8080);
    assert_eq!(config.environment, "development");
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
}

#[test]
#[serial]
fn values_are_read_from_environment() {
    let mut env_guard = EnvGuard::cleared();
    env_guard.set("DATABASE_URL", "sqlite::memory:");
    env_guard.set("DATABASE_MAX_CONNECTIONS", "2");
    env_guard.set("HOST", "0.0.0.0");
    env_guard.set("PORT", "9000");
    env_guard.set("ENVIRONMENT", "production");

    let config = AppConfig::from_env().expect("config to load");
    assert_eq!(config.database_url, "sqlite::memory:");
    assert_eq!(config.max_connections, 2);
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:9000");
    assert_eq!(config.environment, "production");
}

#[test]
#[serial]
fn invalid_port_is_an_error() {
    let mut env_guard = EnvGuard::cleared();
    env_guard.set("PORT", "not-a-port");

    let err = AppConfig::from_env().expect_err("port should be rejected");
    assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
}

#[test]
#[serial]
fn zero_connections_is_an_error() {
    let mut env_guard = EnvGuard::cleared();
    env_guard.set("DATABASE_MAX_CONNECTIONS", "0");

    let err = AppConfig::from_env().expect_err("zero connections should be rejected");
    assert!(matches!(
        err,
        ConfigError::Invalid {
            key: "DATABASE_MAX_CONNECTIONS",
            ..
        }
    ));
}
