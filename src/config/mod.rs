use crate::utils::validation::{AcceptancePolicy, MAX_FILE_SIZE, MAX_FILES_PER_REQUEST};
use std::env;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid CLOUDINARY_URL: {0}")]
    InvalidCloudinaryUrl(String),
}

/// Credentials and endpoint for the Cloudinary upload API
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Base origin of the REST API; overridable so tests can point at a local server
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Parses `cloudinary://<api_key>:<api_secret>@<cloud_name>`
    pub fn from_url(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidCloudinaryUrl(e.to_string()))?;

        if url.scheme() != "cloudinary" {
            return Err(ConfigError::InvalidCloudinaryUrl(format!(
                "unexpected scheme '{}'",
                url.scheme()
            )));
        }

        let cloud_name = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ConfigError::InvalidCloudinaryUrl("missing cloud name".to_string()))?;
        let api_secret = url
            .password()
            .ok_or_else(|| ConfigError::InvalidCloudinaryUrl("missing api secret".to_string()))?;
        if url.username().is_empty() {
            return Err(ConfigError::InvalidCloudinaryUrl(
                "missing api key".to_string(),
            ));
        }

        Ok(Self {
            cloud_name: cloud_name.to_string(),
            api_key: url.username().to_string(),
            api_secret: api_secret.to_string(),
            api_base: DEFAULT_CLOUDINARY_API_BASE.to_string(),
        })
    }

    /// Reads `CLOUDINARY_URL`, or the three discrete `CLOUDINARY_*` variables.
    /// Returns `Ok(None)` when no credentials are configured.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let mut config = match env::var("CLOUDINARY_URL") {
            Ok(raw) if !raw.trim().is_empty() => Self::from_url(raw.trim())?,
            _ => {
                let cloud_name = env::var("CLOUDINARY_CLOUD_NAME").ok();
                let api_key = env::var("CLOUDINARY_API_KEY").ok();
                let api_secret = env::var("CLOUDINARY_API_SECRET").ok();
                match (cloud_name, api_key, api_secret) {
                    (Some(cloud_name), Some(api_key), Some(api_secret)) => Self {
                        cloud_name,
                        api_key,
                        api_secret,
                        api_base: DEFAULT_CLOUDINARY_API_BASE.to_string(),
                    },
                    _ => return Ok(None),
                }
            }
        };

        if let Ok(base) = env::var("CLOUDINARY_API_BASE") {
            if !base.trim().is_empty() {
                config.api_base = base.trim().trim_end_matches('/').to_string();
            }
        }

        Ok(Some(config))
    }
}

/// Process-wide configuration, built once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Maximum file size in bytes (default: 5 MiB)
    pub max_file_size: usize,

    /// Maximum number of files in one multi-file upload (default: 5)
    pub max_files_per_request: usize,

    /// Media store credentials; `None` until configured
    pub cloudinary: Option<CloudinaryConfig>,

    /// Timeout for a single media store call in seconds (default: 60)
    pub store_timeout_secs: u64,

    /// Origin prepended to relative asset paths by the display URL resolver
    pub public_api_url: String,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_files_per_request: MAX_FILES_PER_REQUEST,
            cloudinary: None,
            store_timeout_secs: 60,
            public_api_url: String::new(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
            ],
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();

        Ok(Self {
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            max_files_per_request: env::var("MAX_FILES_PER_REQUEST")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.max_files_per_request),

            cloudinary: CloudinaryConfig::from_env()?,

            store_timeout_secs: env::var("STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.store_timeout_secs),

            public_api_url: env::var("PUBLIC_API_URL").unwrap_or(default.public_api_url),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(default.allowed_origins),
        })
    }

    pub fn acceptance_policy(&self) -> AcceptancePolicy {
        AcceptancePolicy::new(self.max_file_size, self.max_files_per_request)
    }

    /// Upper bound for a whole multipart request body: every file at its
    /// ceiling plus room for part headers.
    pub fn request_body_limit(&self) -> usize {
        self.max_file_size
            .saturating_mul(self.max_files_per_request)
            .saturating_add(1024 * 1024)
    }
}
