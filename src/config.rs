use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Steam partner API
    pub steam_api_key: String,
    pub steam_app_id: String,
    pub steam_api_url: String,
    pub steam_use_sandbox: bool,
    pub steam_currency: String,
    pub steam_language: String,

    // Price catalog
    pub catalog_path: String,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            steam_api_key: env::var("STEAM_API_KEY")?,
            steam_app_id: env::var("STEAM_APP_ID")?,
            steam_api_url: env::var("STEAM_API_URL")
                .unwrap_or_else(|_| "https://partner.steam-api.com".to_string()),
            steam_use_sandbox: env::var("STEAM_USE_SANDBOX")
                .map(|v| {
                    let normalized = v.trim().to_ascii_lowercase();
                    normalized == "1" || normalized == "true" || normalized == "yes"
                })
                .unwrap_or(false),
            steam_currency: env::var("STEAM_CURRENCY").unwrap_or_else(|_| "USD".to_string()),
            steam_language: env::var("STEAM_LANGUAGE").unwrap_or_else(|_| "en".to_string()),

            catalog_path: env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "data/prices.json".to_string()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.steam_api_key.trim().is_empty() {
            anyhow::bail!("STEAM_API_KEY is empty");
        }
        if self.steam_app_id.trim().is_empty() {
            anyhow::bail!("STEAM_APP_ID is empty");
        }
        if self.steam_api_url.trim().is_empty() {
            anyhow::bail!("STEAM_API_URL is empty");
        }

        if self.steam_app_id == "480" {
            tracing::warn!("Using Spacewar (480) as the app id; fine for testing only");
        }
        if self.environment == "production" && self.steam_use_sandbox {
            tracing::warn!("Sandbox microtransaction interface enabled in production");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: "development".to_string(),
            steam_api_key: "test-key".to_string(),
            steam_app_id: "480".to_string(),
            steam_api_url: "https://partner.steam-api.com".to_string(),
            steam_use_sandbox: true,
            steam_currency: "USD".to_string(),
            steam_language: "en".to_string(),
            catalog_path: "data/prices.json".to_string(),
            cors_allowed_origins: "*".to_string(),
        }
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_key() {
        let mut cfg = config();
        cfg.steam_api_key = "".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn production_flag_follows_environment() {
        let mut cfg = config();
        assert!(!cfg.is_production());
        cfg.environment = "production".to_string();
        assert!(cfg.is_production());
    }
}
