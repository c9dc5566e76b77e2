//! Reverse geocoding of extracted coordinates
//!
//! A [`ReverseGeocoder`] talks to the provider and returns its raw record;
//! [`LocationService`] owns the retry policy and turns that record into a
//! [`CanonicalLocation`].

pub mod mock;
pub mod nominatim;
pub mod place_type;

pub use mock::MockGeocoder;
pub use nominatim::NominatimClient;
pub use place_type::{classify, PlaceClassification, RawAddressComponents};

use crate::models::{CanonicalLocation, GpsCoordinate};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::RetryIf;
use tracing::{error, info, warn};

/// Provider record before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPlace {
    pub display_name: Option<String>,
    pub osm_type: Option<String>,
    pub osm_class: Option<String>,
    pub address: RawAddressComponents,
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` when the provider has no address for the coordinates.
    ///
    /// Implementations report timeouts as [`crate::Error::GeocodeTimeout`]
    /// so the service can retry them.
    async fn reverse(&self, coordinate: GpsCoordinate) -> Result<Option<RawPlace>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Found(CanonicalLocation),
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

pub struct LocationService {
    geocoder: Arc<dyn ReverseGeocoder>,
    retry: RetryPolicy,
    deadline: Option<Duration>,
}

impl LocationService {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            geocoder,
            retry: RetryPolicy::default(),
            deadline: None,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Cap on the whole lookup, retries and waits included.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn lookup(&self, coordinate: GpsCoordinate) -> GeocodeOutcome {
        let attempt = self.reverse_with_retry(coordinate);

        let result = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, attempt).await {
                Ok(result) => result,
                Err(_) => {
                    error!(
                        "Reverse geocoding exceeded {:?} deadline for {}, {}",
                        deadline, coordinate.latitude, coordinate.longitude
                    );
                    return GeocodeOutcome::NotFound(
                        "Geocoding deadline exceeded".to_string(),
                    );
                }
            },
            None => attempt.await,
        };

        match result {
            Ok(Some(raw)) => {
                let location = normalize(&raw);
                info!(
                    "Resolved {}, {} to '{}' in '{}'",
                    coordinate.latitude, coordinate.longitude, location.place_name, location.city
                );
                GeocodeOutcome::Found(location)
            }
            Ok(None) => GeocodeOutcome::NotFound(
                "No address found for these coordinates".to_string(),
            ),
            Err(e) if e.is_retryable_geocode() => {
                error!(
                    "Reverse geocoding timed out after {} attempts: {}",
                    self.retry.max_attempts, e
                );
                GeocodeOutcome::NotFound(format!(
                    "Geocoding timed out after {} attempts",
                    self.retry.max_attempts
                ))
            }
            Err(e) => {
                error!("Reverse geocoding failed: {}", e);
                GeocodeOutcome::NotFound(format!("Geocoding failed: {}", e))
            }
        }
    }

    async fn reverse_with_retry(&self, coordinate: GpsCoordinate) -> Result<Option<RawPlace>> {
        let retries = self.retry.max_attempts.saturating_sub(1);
        let strategy = FixedInterval::new(self.retry.delay).take(retries);

        RetryIf::start(
            strategy,
            || async move { self.geocoder.reverse(coordinate).await },
            |e: &crate::Error| {
                let retry = e.is_retryable_geocode();
                if retry {
                    warn!("Reverse geocoding attempt timed out: {}", e);
                }
                retry
            },
        )
        .await
    }
}

/// Merge directly-mapped address fields with the place classification.
pub fn normalize(raw: &RawPlace) -> CanonicalLocation {
    let address = &raw.address;
    let field = |key: &str| address.get(key).cloned().unwrap_or_default();

    let city = ["city", "town", "village"]
        .iter()
        .find_map(|key| address.get(*key).filter(|v| !v.is_empty()))
        .cloned()
        .unwrap_or_default();

    let classification = classify(
        address,
        raw.osm_type.as_deref().unwrap_or_default(),
        raw.osm_class.as_deref().unwrap_or_default(),
        raw.display_name.as_deref(),
    );

    CanonicalLocation {
        full_address: raw.display_name.clone().unwrap_or_default(),
        street_number: field("house_number"),
        street_name: field("road"),
        neighborhood: field("neighbourhood"),
        city,
        postal_code: field("postcode"),
        state: field("state"),
        country: field("country"),
        country_code: field("country_code"),
        place_name: classification.place_name,
        place_type: classification.place_type,
        osm_type: classification.osm_type,
        osm_class: classification.osm_class,
    }
}
