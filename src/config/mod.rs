use serde::Deserialize;

use crate::models::PageInfo;

const DEFAULT_CONFIG_FILE: &str = "config/admin";

/// Built-in signing secret. Only accepted with `jwt.allow_insecure_secret`.
pub const DEV_JWT_SECRET: &str = "development-secret-change-in-production";
const MIN_SECRET_LENGTH: usize = 32; // 256 bits
/// Upper bound for `jwt.expiry_hours` (one year).
pub const MAX_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Without a URL the service runs on the in-memory store.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    #[serde(default = "default_jwt_secret")]
    pub secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
    /// Local development only: accept the built-in or a short secret.
    #[serde(default)]
    pub allow_insecure_secret: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Pages shown in the role access grid, in display order.
    #[serde(default = "default_pages")]
    pub pages: Vec<PageInfo>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_expiry_hours() -> u64 {
    24
}

fn default_log_filter() -> String {
    "access_admin=debug,tower_http=debug".to_string()
}

fn default_pages() -> Vec<PageInfo> {
    vec![
        PageInfo::new("/dashboard", "Dashboard"),
        PageInfo::new("/blog", "Blog"),
        PageInfo::new("/admin", "Admin"),
        PageInfo::new("/profile", "Profile"),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            expiry_hours: default_expiry_hours(),
            allow_insecure_secret: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
        }
    }
}

impl Config {
    /// Defaults, then the optional TOML file named by `ADMIN_CONFIG`, then
    /// `SECTION__KEY` environment variables.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let file = std::env::var("ADMIN_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name(&file).required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.jwt.secret.is_empty() {
            anyhow::bail!("jwt.secret must not be empty");
        }
        if !self.jwt.allow_insecure_secret {
            if self.jwt.secret == DEV_JWT_SECRET {
                anyhow::bail!("jwt.secret is the built-in development secret; set JWT__SECRET");
            }
            if self.jwt.secret.len() < MIN_SECRET_LENGTH {
                anyhow::bail!("jwt.secret must be at least {} bytes", MIN_SECRET_LENGTH);
            }
        }
        if !(1..=MAX_EXPIRY_HOURS).contains(&self.jwt.expiry_hours) {
            anyhow::bail!("jwt.expiry_hours must be between 1 and {}", MAX_EXPIRY_HOURS);
        }
        if let Some(page) = self.access.pages.iter().find(|p| p.path.is_empty()) {
            anyhow::bail!("access.pages entry '{}' has an empty path", page.name);
        }
        Ok(())
    }
}
