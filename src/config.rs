use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub midtrans: MidtransConfig,
    #[serde(default)]
    pub opencage: OpenCageConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MidtransConfig {
    pub server_key: String,
    #[serde(default)]
    pub client_key: String,
    #[serde(default)]
    pub is_production: bool,
    /// Overrides the Snap base URL (tests, proxies).
    #[serde(default)]
    pub snap_base_url: Option<String>,
    /// Overrides the Core API base URL used for status checks.
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub finish_redirect_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenCageConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_opencage_base_url")]
    pub base_url: String,
    #[serde(default = "default_opencage_country")]
    pub country_code: String,
}

impl Default for OpenCageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_opencage_base_url(),
            country_code: default_opencage_country(),
        }
    }
}

fn default_opencage_base_url() -> String {
    "https://api.opencagedata.com".to_string()
}

fn default_opencage_country() -> String {
    "id".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersConfig {
    #[serde(default = "default_unpaid_expiry_minutes")]
    pub unpaid_expiry_minutes: i64,
    #[serde(default = "default_expiry_check_interval_secs")]
    pub expiry_check_interval_secs: u64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            unpaid_expiry_minutes: default_unpaid_expiry_minutes(),
            expiry_check_interval_secs: default_expiry_check_interval_secs(),
        }
    }
}

fn default_unpaid_expiry_minutes() -> i64 {
    60
}

fn default_expiry_check_interval_secs() -> u64 {
    300
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)
                .with_context(|| format!("failed to parse config file {config_path}"))?,
            // no config file: environment variables and defaults only
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    anyhow!("DATABASE_URL is not set and no {config_path} was found")
                })?;
                Self::with_defaults(database_url)
            }
            Err(e) => {
                return Err(anyhow!("cannot read config file {config_path}: {e}"));
            }
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_defaults(database_url: String) -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "change-me-in-production".to_string(),
                access_token_expires_in: 7200,
                refresh_token_expires_in: 2_592_000,
            },
            midtrans: MidtransConfig::default(),
            opencage: OpenCageConfig::default(),
            orders: OrdersConfig::default(),
        }
    }

    /// Environment variables win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Some(v) = get_env("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = get_env_parse("SERVER_PORT") {
            self.server.port = p;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(mc) = get_env_parse("DB_MAX_CONNECTIONS") {
            self.database.max_connections = mc;
        }
        if let Some(v) = get_env("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Some(n) = get_env_parse("JWT_ACCESS_EXPIRES_IN") {
            self.jwt.access_token_expires_in = n;
        }
        if let Some(n) = get_env_parse("JWT_REFRESH_EXPIRES_IN") {
            self.jwt.refresh_token_expires_in = n;
        }

        // Midtrans
        if let Some(v) = get_env("MIDTRANS_SERVER_KEY") {
            self.midtrans.server_key = v;
        }
        if let Some(v) = get_env("MIDTRANS_CLIENT_KEY") {
            self.midtrans.client_key = v;
        }
        if let Some(b) = get_env_parse("MIDTRANS_IS_PRODUCTION") {
            self.midtrans.is_production = b;
        }
        if let Some(v) = get_env("MIDTRANS_SNAP_BASE_URL") {
            self.midtrans.snap_base_url = Some(v);
        }
        if let Some(v) = get_env("MIDTRANS_API_BASE_URL") {
            self.midtrans.api_base_url = Some(v);
        }
        if let Some(v) = get_env("MIDTRANS_FINISH_REDIRECT_URL") {
            self.midtrans.finish_redirect_url = Some(v);
        }

        // OpenCage
        if let Some(v) = get_env("OPENCAGE_API_KEY") {
            self.opencage.api_key = v;
        }
        if let Some(v) = get_env("OPENCAGE_BASE_URL") {
            self.opencage.base_url = v;
        }
        if let Some(v) = get_env("OPENCAGE_COUNTRY_CODE") {
            self.opencage.country_code = v;
        }

        if let Some(n) = get_env_parse("ORDERS_UNPAID_EXPIRY_MINUTES") {
            self.orders.unpaid_expiry_minutes = n;
        }
        if let Some(n) = get_env_parse("ORDERS_EXPIRY_CHECK_INTERVAL_SECS") {
            self.orders.expiry_check_interval_secs = n;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_empty() {
            return Err(anyhow!("database.url must not be empty"));
        }
        if self.jwt.access_token_expires_in <= 0 || self.jwt.refresh_token_expires_in <= 0 {
            return Err(anyhow!("jwt token lifetimes must be positive"));
        }
        if self.orders.unpaid_expiry_minutes <= 0 {
            return Err(anyhow!("orders.unpaid_expiry_minutes must be positive"));
        }
        if self.orders.expiry_check_interval_secs == 0 {
            return Err(anyhow!("orders.expiry_check_interval_secs must be positive"));
        }
        if self.midtrans.server_key.is_empty() {
            log::warn!("midtrans.server_key is empty; online payments will fail");
        }
        if self.opencage.api_key.is_empty() {
            log::warn!("opencage.api_key is empty; geocoding is disabled");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 9000

        [database]
        url = "postgres://localhost/gomealsaver"
        max_connections = 5

        [jwt]
        secret = "s3cret"
        access_token_expires_in = 3600
        refresh_token_expires_in = 86400

        [midtrans]
        server_key = "SB-Mid-server-abc"
        is_production = false
    "#;

    #[test]
    fn test_parse_toml_with_optional_sections_defaulted() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.midtrans.server_key, "SB-Mid-server-abc");
        assert!(config.midtrans.snap_base_url.is_none());
        assert_eq!(config.opencage.base_url, "https://api.opencagedata.com");
        assert_eq!(config.orders.unpaid_expiry_minutes, 60);
        assert_eq!(config.orders.expiry_check_interval_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_required_section_fails() {
        assert!(Config::from_toml_str("[server]\nhost = \"x\"\nport = 1").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::with_defaults("postgres://db".into());
        assert!(config.validate().is_ok());
        config.orders.unpaid_expiry_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::with_defaults(String::new());
        config.orders = OrdersConfig::default();
        assert!(config.validate().is_err());
    }
}
