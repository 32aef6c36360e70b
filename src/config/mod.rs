use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub content: ContentConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    /// Header the upstream gateway uses to pass the resolved principal
    pub principal_header: String,
    pub default_page_size: i64,
    pub max_page_size: i64,
    /// Issue a signed upload URL when an update only touches `Lessons`
    pub legacy_upload_url: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
    pub max_concurrent_fetches: usize,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub region: String,
    pub bucket: Option<String>,
    #[serde(skip_serializing)]
    pub access_key_id: Option<String>,
    #[serde(skip_serializing)]
    pub secret_access_key: Option<String>,
    #[serde(skip_serializing)]
    pub session_token: Option<String>,
    /// Path-style endpoint override (e.g. MinIO). Virtual-hosted S3 when unset.
    pub endpoint: Option<String>,
    pub expires_secs: u64,
    pub content_type: String,
    pub acl: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("PRINCIPAL_HEADER") {
            self.api.principal_header = v.to_ascii_lowercase();
        }
        if let Ok(v) = env::var("COURSE_DEFAULT_PAGE_SIZE") {
            self.api.default_page_size = v.parse().unwrap_or(self.api.default_page_size);
        }
        if let Ok(v) = env::var("COURSE_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }
        if let Ok(v) = env::var("COURSE_LEGACY_UPLOAD_URL") {
            self.api.legacy_upload_url = v.parse().unwrap_or(self.api.legacy_upload_url);
        }

        // Content API overrides
        if let Ok(v) = env::var("GITHUB_TOKEN") {
            self.content.github_token = Some(v);
        }
        if let Ok(v) = env::var("CONTENT_MAX_CONCURRENT_FETCHES") {
            self.content.max_concurrent_fetches = v.parse().unwrap_or(self.content.max_concurrent_fetches);
        }
        if let Ok(v) = env::var("CONTENT_REQUEST_TIMEOUT") {
            self.content.request_timeout_secs = v.parse().unwrap_or(self.content.request_timeout_secs);
        }

        // Object store overrides
        if let Ok(v) = env::var("AWS_REGION") {
            self.storage.region = v;
        }
        if let Ok(v) = env::var("BUCKET_NAME") {
            self.storage.bucket = Some(v);
        }
        if let Ok(v) = env::var("AWS_ACCESS_KEY_ID") {
            self.storage.access_key_id = Some(v);
        }
        if let Ok(v) = env::var("AWS_SECRET_ACCESS_KEY") {
            self.storage.secret_access_key = Some(v);
        }
        if let Ok(v) = env::var("AWS_SESSION_TOKEN") {
            self.storage.session_token = Some(v);
        }
        if let Ok(v) = env::var("S3_ENDPOINT") {
            self.storage.endpoint = Some(v);
        }
        if let Ok(v) = env::var("UPLOAD_URL_EXPIRES") {
            self.storage.expires_secs = v.parse().unwrap_or(self.storage.expires_secs);
        }
        if let Ok(v) = env::var("UPLOAD_CONTENT_TYPE") {
            self.storage.content_type = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig::default(),
            content: ContentConfig {
                github_token: None,
                max_concurrent_fetches: 8,
                request_timeout_secs: 30,
            },
            storage: StorageConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            content: ContentConfig {
                github_token: None,
                max_concurrent_fetches: 8,
                request_timeout_secs: 15,
            },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            content: ContentConfig {
                github_token: None,
                max_concurrent_fetches: 16,
                request_timeout_secs: 10,
            },
            ..Self::development()
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            principal_header: "x-principal-id".to_string(),
            default_page_size: 10,
            max_page_size: 20,
            legacy_upload_url: true,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            bucket: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
            endpoint: None,
            expires_secs: 900, // 15 minutes
            content_type: "image/jpeg".to_string(),
            acl: "private".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
