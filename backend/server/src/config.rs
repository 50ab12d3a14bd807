use std::{env, fmt::Display, fs::read_to_string, path::PathBuf, str::FromStr};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: String,
    pub admin_username: String,
    pub admin_password: String,
    pub site_url: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cors_origin: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "8080"),
            store_backend: try_load("STORE_BACKEND", "redis"),
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379"),
            admin_username: try_load("ADMIN_USERNAME", "admin"),
            admin_password: read_secret("ADMIN_PASSWORD").unwrap_or_else(|| {
                try_load::<String>("ADMIN_PASSWORD", "password")
            }),
            site_url: try_load::<String>("SITE_URL", "https://emiliasocialmedia.com")
                .trim_end_matches('/')
                .to_string(),
            upload_dir: try_load("UPLOAD_DIR", "uploads"),
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", "5242880"),
            cors_origin: try_load("CORS_ORIGIN", "*"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            store_backend: StoreBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "password".to_string(),
            site_url: "https://emiliasocialmedia.com".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 5 * 1024 * 1024,
            cors_origin: "*".to_string(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Docker secrets are mounted under `/run/secrets`. A missing file falls back to the environment.
fn read_secret(secret_name: &str) -> Option<String> {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            info!("Secret {secret_name} not mounted ({e}), falling back to environment");
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::StoreBackend;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!("redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!(" Memory ".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("mongo".parse::<StoreBackend>().is_err());
    }
}
