use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 3000, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
    Postgres,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(anyhow!("unknown storage backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), data_dir: default_data_dir() }
    }
}

fn default_data_dir() -> String { "data".into() }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_upload_root")]
    pub root: String,
    /// Prefix for public URLs of stored files, e.g. `https://api.example.com`.
    #[serde(default)]
    pub public_base_url: String,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    #[serde(default = "default_max_gallery_files")]
    pub max_gallery_files: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root: default_upload_root(),
            public_base_url: String::new(),
            max_file_bytes: default_max_file_bytes(),
            max_gallery_files: default_max_gallery_files(),
        }
    }
}

fn default_upload_root() -> String { "uploads".into() }
fn default_max_file_bytes() -> usize { 5 * 1024 * 1024 }
fn default_max_gallery_files() -> usize { 10 }

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenScheme {
    /// HS256 JWT carrying the provider id as `sub`.
    #[default]
    Signed,
    /// Unsigned `random + id + random` tokens issued by older deployments.
    Legacy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default)]
    pub token_scheme: TokenScheme,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl_hours(), token_scheme: TokenScheme::default() }
    }
}

fn default_token_ttl_hours() -> i64 { 12 }

pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply environment overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.apply_env();
        self.server.normalize()?;
        self.uploads.validate()?;
        if self.storage.backend == StorageBackend::Postgres {
            self.database.validate()?;
        }
        if self.auth.jwt_secret.trim().is_empty() {
            self.auth.jwt_secret = DEV_JWT_SECRET.to_string();
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("PORT").or_else(|| env_parse("SERVER_PORT")) {
            self.server.port = port;
        }
        if let Ok(backend) = std::env::var("STORAGE_BACKEND") {
            if let Ok(b) = backend.parse() {
                self.storage.backend = b;
            }
        }
        if self.database.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.database.url = url;
            }
        }
        if let Ok(root) = std::env::var("UPLOAD_DIR") {
            self.uploads.root = root;
        }
        if let Ok(base) = std::env::var("PUBLIC_UPLOAD_BASE_URL") {
            self.uploads.public_base_url = base;
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl UploadConfig {
    fn validate(&self) -> Result<()> {
        if self.root.trim().is_empty() {
            return Err(anyhow!("uploads.root must not be empty"));
        }
        if self.max_file_bytes == 0 || self.max_gallery_files == 0 {
            return Err(anyhow!("uploads limits must be positive"));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [storage]
            backend = "memory"

            [auth]
            token_scheme = "legacy"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.storage.data_dir, "data");
        assert_eq!(cfg.uploads.max_file_bytes, 5 * 1024 * 1024);
        assert_eq!(cfg.uploads.max_gallery_files, 10);
        assert_eq!(cfg.auth.token_scheme, TokenScheme::Legacy);
        assert_eq!(cfg.auth.token_ttl_hours, 12);
    }

    #[test]
    fn postgres_backend_requires_postgres_url() {
        let mut db = DatabaseConfig { url: "mysql://x".into(), ..DatabaseConfig::default() };
        db.min_connections = 1;
        db.max_connections = 2;
        db.connect_timeout_secs = 1;
        db.acquire_timeout_secs = 1;
        assert!(db.validate().is_err());
        db.url = "postgres://localhost/market".into();
        assert!(db.validate().is_ok());
    }

    #[test]
    fn backend_from_str() {
        assert_eq!("Postgres".parse::<StorageBackend>().unwrap(), StorageBackend::Postgres);
        assert!("mongo".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn zero_upload_limit_rejected() {
        let up = UploadConfig { max_file_bytes: 0, ..UploadConfig::default() };
        assert!(up.validate().is_err());
    }
}
