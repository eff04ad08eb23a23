use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod gateway;
pub mod server;

pub use gateway::{AmwalPayConfig, ConfigProvider};
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub amwalpay: AmwalPayConfig,
    pub checkout: CheckoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Absolute URLs of the host's checkout pages
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// Where the gateway sends the customer after payment
    pub callback_url: String,
    /// Host page shown after an approved payment
    pub return_url: String,
    /// Host page shown after a declined or abandoned payment
    pub cancel_url: String,
}

impl CheckoutConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            callback_url: env::var("AMWALPAY_CALLBACK_URL").map_err(|_| {
                AppError::Configuration("AMWALPAY_CALLBACK_URL not set".to_string())
            })?,
            return_url: env::var("CHECKOUT_RETURN_URL").map_err(|_| {
                AppError::Configuration("CHECKOUT_RETURN_URL not set".to_string())
            })?,
            cancel_url: env::var("CHECKOUT_CANCEL_URL").map_err(|_| {
                AppError::Configuration("CHECKOUT_CANCEL_URL not set".to_string())
            })?,
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            server: ServerConfig::from_env()?,
            amwalpay: AmwalPayConfig::from_env()?,
            checkout: CheckoutConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        // Fail at startup rather than on the first checkout
        self.amwalpay.credentials()?;

        for (name, url) in [
            ("AMWALPAY_CALLBACK_URL", &self.checkout.callback_url),
            ("CHECKOUT_RETURN_URL", &self.checkout.return_url),
            ("CHECKOUT_CANCEL_URL", &self.checkout.cancel_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Configuration(format!(
                    "{} must be an absolute http(s) URL",
                    name
                )));
            }
        }

        Ok(())
    }
}
