use std::env;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_BASE_URL: &str = "https://api.app.shortcut.com/api/v3";
pub const API_BASE_URL_ENV: &str = "SHORTCUT_API_BASE_URL";
pub const ARTIFACTS_DIRECTORY_ENV: &str = "SHIPYARD_ARTIFACTS_DIRECTORY";
pub const SERVICE_NAME: &str = "shortcut";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub artifacts_root: PathBuf,
    pub service_name: String,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_values(
            env::var(API_BASE_URL_ENV).ok(),
            env::var(ARTIFACTS_DIRECTORY_ENV).ok(),
        )
    }

    fn from_values(api_base_url: Option<String>, artifacts_root: Option<String>) -> AppResult<Self> {
        let api_base_url = api_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("https://") && !api_base_url.starts_with("http://") {
            return Err(AppError::Configuration(format!(
                "{API_BASE_URL_ENV} must be an http(s) URL, got '{api_base_url}'"
            )));
        }

        let artifacts_root = artifacts_root
            .filter(|root| !root.trim().is_empty())
            .unwrap_or_else(|| "artifacts".to_string());

        Ok(Self {
            api_base_url,
            artifacts_root: PathBuf::from(artifacts_root),
            service_name: SERVICE_NAME.to_string(),
        })
    }
}
