//! Data models and structures
//!
//! Defines the records that flow through both pipelines: decoded GPS
//! coordinates, normalized reverse-geocoding results, and sanitized
//! place guesses, plus the runtime configuration.

use serde::Serialize;
use std::net::SocketAddr;
use std::time::Duration;

/// A validated decimal-degree coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GpsCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinate {
    /// Returns `None` unless both components are finite and within
    /// [-90, 90] / [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// Closed set of place categories exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    Restaurant,
    Hotel,
    Magasin,
    Attraction,
    Service,
    #[default]
    Unknown,
}

/// Reverse-geocoding result with every provider field flattened to a string.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CanonicalLocation {
    pub full_address: String,
    pub street_number: String,
    pub street_name: String,
    pub neighborhood: String,
    pub city: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
    pub country_code: String,
    pub place_name: String,
    pub place_type: PlaceType,
    pub osm_type: String,
    pub osm_class: String,
}

/// Vision-model identification of the business or place in a photo.
///
/// Always fully populated; see [`crate::analysis::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceGuess {
    pub business_name: String,
    pub business_type: String,
    pub address: String,
    pub category: String,
    pub icon: String,
    pub suggested_rating: u8,
    pub suggested_review: String,
    pub positive_suggestions: Vec<String>,
    pub negative_suggestions: Vec<String>,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub vision_model: String,
    pub vision_timeout: Duration,
    pub nominatim_base_url: String,
    pub nominatim_user_agent: String,
    pub geocode_timeout: Duration,
    pub geocode_max_attempts: usize,
    pub geocode_retry_delay: Duration,
    pub geocode_deadline: Option<Duration>,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let openai_api_key = lookup("OPENAI_API_KEY").unwrap_or_default();
        if openai_api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY not set; image analysis will return fallback guesses");
        }

        let bind_addr = var_or("BIND_ADDR", "0.0.0.0:5000");
        let bind_addr = bind_addr
            .parse()
            .map_err(|e| crate::Error::Config(format!("Invalid BIND_ADDR '{}': {}", bind_addr, e)))?;

        let geocode_deadline = match lookup("GEOCODE_DEADLINE_SECS").filter(|v| !v.trim().is_empty())
        {
            Some(raw) => Some(Duration::from_secs(parse_number(
                "GEOCODE_DEADLINE_SECS",
                &raw,
            )?)),
            None => None,
        };

        let geocode_max_attempts =
            parse_number::<usize>("GEOCODE_MAX_ATTEMPTS", &var_or("GEOCODE_MAX_ATTEMPTS", "3"))?;
        if geocode_max_attempts == 0 {
            return Err(crate::Error::Config(
                "GEOCODE_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            openai_api_key,
            openai_base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com"),
            vision_model: var_or("VISION_MODEL", "gpt-4o"),
            vision_timeout: Duration::from_secs(parse_number(
                "VISION_TIMEOUT_SECS",
                &var_or("VISION_TIMEOUT_SECS", "30"),
            )?),
            nominatim_base_url: var_or(
                "NOMINATIM_BASE_URL",
                "https://nominatim.openstreetmap.org",
            ),
            nominatim_user_agent: var_or("NOMINATIM_USER_AGENT", "r8it-app"),
            geocode_timeout: Duration::from_secs(parse_number(
                "GEOCODE_TIMEOUT_SECS",
                &var_or("GEOCODE_TIMEOUT_SECS", "10"),
            )?),
            geocode_max_attempts,
            geocode_retry_delay: Duration::from_millis(parse_number(
                "GEOCODE_RETRY_DELAY_MS",
                &var_or("GEOCODE_RETRY_DELAY_MS", "1000"),
            )?),
            geocode_deadline,
            bind_addr,
        })
    }
}

fn parse_number<T>(key: &str, raw: &str) -> crate::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| crate::Error::Config(format!("{} must be a number, got '{}': {}", key, raw, e)))
}
