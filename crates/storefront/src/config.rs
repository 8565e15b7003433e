//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `CART_POLICY` - `merge` or `append` (default: merge)
//! - `CATALOG_PATH` - Catalog JSON file (default: crates/storefront/content/catalog.json)
//! - `CAROUSEL_INTERVAL_MS` - Carousel autoplay interval (default: 4000)
//! - `SCROLLER_SPEED` - Product scroller speed in pixels per frame (default: 1.0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use bottega_core::AggregationPolicy;
use bottega_core::carousel::DEFAULT_AUTOPLAY_INTERVAL_MS;
use bottega_core::scroller::DEFAULT_SCROLL_SPEED;
use thiserror::Error;

const DEFAULT_CATALOG_PATH: &str = "crates/storefront/content/catalog.json";
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Cart behaviour for new carts
    pub cart_policy: AggregationPolicy,
    /// Product catalog file
    pub catalog_path: PathBuf,
    /// Carousel autoplay interval in milliseconds
    pub carousel_interval_ms: u64,
    /// Product scroller speed in pixels per frame
    pub scroller_speed: f64,
    /// Sentry error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry configuration. Tracking is off when `dsn` is `None`.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: None,
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            cart_policy: AggregationPolicy::default(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            carousel_interval_ms: DEFAULT_AUTOPLAY_INTERVAL_MS,
            scroller_speed: DEFAULT_SCROLL_SPEED,
            sentry: SentryConfig::default(),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable or out-of-range values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "STOREFRONT_HOST", defaults.host)?;
        let port = parse_or(&lookup, "STOREFRONT_PORT", defaults.port)?;
        let base_url = lookup("STOREFRONT_BASE_URL").unwrap_or(defaults.base_url);
        let static_dir = lookup("STOREFRONT_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from);
        let cart_policy = parse_or(&lookup, "CART_POLICY", defaults.cart_policy)?;
        let catalog_path = lookup("CATALOG_PATH").map_or(defaults.catalog_path, PathBuf::from);

        let carousel_interval_ms =
            parse_or(&lookup, "CAROUSEL_INTERVAL_MS", defaults.carousel_interval_ms)?;
        if carousel_interval_ms == 0 {
            return Err(invalid("CAROUSEL_INTERVAL_MS", "must be greater than 0"));
        }

        let scroller_speed = parse_or(&lookup, "SCROLLER_SPEED", defaults.scroller_speed)?;
        if !scroller_speed.is_finite() || scroller_speed <= 0.0 {
            return Err(invalid("SCROLLER_SPEED", "must be a positive number"));
        }

        let sentry = SentryConfig {
            dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            environment: lookup("SENTRY_ENVIRONMENT"),
            sample_rate: parse_rate(&lookup, "SENTRY_SAMPLE_RATE", defaults.sentry.sample_rate)?,
            traces_sample_rate: parse_rate(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry.traces_sample_rate,
            )?,
        };

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            cart_policy,
            catalog_path,
            carousel_interval_ms,
            scroller_speed,
            sentry,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

/// Parse a variable if present, falling back to `default`.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    lookup(key).map_or(Ok(default), |value| {
        value.trim().parse::<T>().map_err(|e| invalid(key, e))
    })
}

/// Parse a sample rate in `[0.0, 1.0]`.
fn parse_rate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let rate = parse_or(lookup, key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(invalid(key, "must be between 0.0 and 1.0"))
    }
}
