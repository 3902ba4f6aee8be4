use serde::{Deserialize, Serialize};
use std::env;

/// Process configuration, built once at startup and passed by reference to
/// whatever needs it. There is deliberately no ambient config singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub store: StoreConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Document collection holding the listings.
    pub collection: String,
    /// Cap on collection reads returned to a single caller.
    pub max_page_size: usize,
    /// Optional YAML vocabulary override (see `lookups::Vocabulary`).
    pub vocabulary_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Origins the HTTP layer should allow. Consumed by the out-of-scope
    /// routing layer, carried here so it is configured in one place.
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment defaults first, then specific env vars on top
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("STORE_COLLECTION") {
            self.store.collection = v;
        }
        if let Ok(v) = env::var("STORE_MAX_PAGE_SIZE") {
            self.store.max_page_size = v.parse().unwrap_or(self.store.max_page_size);
        }
        if let Ok(v) = env::var("VOCABULARY_FILE") {
            self.store.vocabulary_file = Some(v);
        }
        if let Ok(v) = env::var("SECURITY_ALLOWED_ORIGINS") {
            self.security.allowed_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            store: StoreConfig {
                collection: "announcements".to_string(),
                max_page_size: 1000,
                vocabulary_file: None,
            },
            security: SecurityConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            store: StoreConfig {
                collection: "announcements".to_string(),
                max_page_size: 500,
                vocabulary_file: None,
            },
            security: SecurityConfig {
                allowed_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            store: StoreConfig {
                collection: "announcements".to_string(),
                max_page_size: 100,
                vocabulary_file: None,
            },
            security: SecurityConfig {
                allowed_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}
