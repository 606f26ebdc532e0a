/// Configuration for the diagnostic tool
///
/// All values an operator can change live here: the license key under test,
/// the site URL the key is registered for, and the service origin. The
/// config can be loaded from a YAML file, with environment variables taking
/// precedence, and every field has a working default so the tool runs with
/// no setup at all.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Base origin of the OneClickContent service.
pub const DEFAULT_BASE_URL: &str = "https://oneclickcontent.com";

/// Product slug of the image metadata generator.
pub const OCC_IMAGES_PRODUCT_SLUG: &str = "oneclickcontent-image-meta-generator";

/// Built-in fallback license key used when the operator supplies none.
pub const FALLBACK_LICENSE_KEY: &str = "PK-OQZPUShcEIXaGS37fFrE";

/// Default site URL when none is configured.
pub const DEFAULT_SITE_URL: &str = "https://example.com";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 45;

/// Diagnostic run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticConfig {
    /// License key identifying the calling site to the service
    pub license_key: String,

    /// Site URL the license is registered for; also sent as the origin URL
    pub site_url: String,

    /// Service base origin
    pub base_url: String,

    /// Product slug sent with usage and generation requests
    pub product_slug: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            license_key: FALLBACK_LICENSE_KEY.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            product_slug: OCC_IMAGES_PRODUCT_SLUG.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl DiagnosticConfig {
    /// Loads configuration from a YAML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!("Configuration file not found, using default configuration");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;

        let config: Self = serde_yaml::from_str(&content)
            .context("Failed to parse configuration file")?;

        info!("Configuration loaded from {}", path);
        Ok(config)
    }

    /// Saves the configuration as YAML, creating parent directories.
    pub fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize configuration")?;

        if let Some(parent) = Path::new(path).parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        fs::write(path, yaml)
            .with_context(|| format!("Failed to write configuration to file: {}", path))?;

        info!("Configuration saved to {}", path);
        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// `OCC_LICENSE_KEY`, `OCC_SITE_URL` and `OCC_BASE_URL` take precedence
    /// over file values when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OCC_LICENSE_KEY") {
            if !key.is_empty() {
                self.license_key = key;
            }
        }
        if let Ok(url) = std::env::var("OCC_SITE_URL") {
            if !url.is_empty() {
                self.site_url = url;
            }
        }
        if let Ok(url) = std::env::var("OCC_BASE_URL") {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
    }
}
