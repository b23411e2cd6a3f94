use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::fmt;

#[derive(Debug, Clone, Deserialize)]
pub struct ItemsConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub store: StoreConfig,
    pub mongodb: MongoConfig,
    pub auth: AuthConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub function_key: Option<String>,
    pub create_level: AuthLevel,
    pub list_level: AuthLevel,
}

/// Who may call a route: anyone, or only callers presenting the function key.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthLevel {
    Anonymous,
    Function,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub max_body_bytes: usize,
}

const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: "items-service".to_string(),
            log_level: "info".to_string(),
            otlp_endpoint: None,
            store: StoreConfig {
                backend: StoreBackend::Mongo,
            },
            mongodb: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "items_db".to_string(),
                collection: "items".to_string(),
            },
            auth: AuthConfig {
                function_key: None,
                create_level: AuthLevel::Anonymous,
                list_level: AuthLevel::Anonymous,
            },
            http: HttpConfig {
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
        }
    }
}

impl ItemsConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        // Production must name its connection explicitly; dev falls back to defaults.
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("mongo"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let uri = match backend {
            StoreBackend::Mongo => get_env("MONGODB_URI", None, is_prod)?,
            StoreBackend::Memory => env::var("MONGODB_URI").unwrap_or_default(),
        };

        let max_body_bytes = get_env(
            "HTTP_MAX_BODY_BYTES",
            Some(DEFAULT_MAX_BODY_BYTES.to_string().as_str()),
            false,
        )?
        .parse::<usize>()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid HTTP_MAX_BODY_BYTES: {}", e)))?;

        let config = ItemsConfig {
            common: common_config,
            service_name: get_env("SERVICE_NAME", Some("items-service"), false)?,
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            store: StoreConfig { backend },
            mongodb: MongoConfig {
                uri,
                database: get_env("MONGODB_DATABASE", Some("items_db"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("items"), is_prod)?,
            },
            auth: AuthConfig {
                function_key: env::var("FUNCTION_KEY").ok().filter(|v| !v.is_empty()),
                create_level: parse_auth_level("AUTH_LEVEL_CREATE")?,
                list_level: parse_auth_level("AUTH_LEVEL_LIST")?,
            },
            http: HttpConfig { max_body_bytes },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that would only fail once requests arrive.
    pub fn validate(&self) -> Result<(), AppError> {
        let needs_key = self.auth.create_level == AuthLevel::Function
            || self.auth.list_level == AuthLevel::Function;
        if needs_key && self.auth.function_key.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "FUNCTION_KEY is required when a route uses function-level auth"
            )));
        }

        if self.store.backend == StoreBackend::Mongo {
            if self.mongodb.uri.is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "MONGODB_URI cannot be empty"
                )));
            }
            if self.mongodb.database.is_empty() || self.mongodb.collection.is_empty() {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "MongoDB database and collection names cannot be empty"
                )));
            }
        }

        if self.http.max_body_bytes == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "HTTP_MAX_BODY_BYTES must be greater than 0"
            )));
        }

        Ok(())
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl std::str::FromStr for AuthLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anonymous" => Ok(AuthLevel::Anonymous),
            "function" => Ok(AuthLevel::Function),
            _ => Err(format!("Invalid auth level: {}", s)),
        }
    }
}

impl fmt::Display for AuthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthLevel::Anonymous => write!(f, "anonymous"),
            AuthLevel::Function => write!(f, "function"),
        }
    }
}

fn parse_auth_level(key: &str) -> Result<AuthLevel, AppError> {
    get_env(key, Some("anonymous"), false)?
        .parse()
        .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e)))
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
