use super::{RawAddressComponents, RawPlace, ReverseGeocoder};
use crate::models::GpsCoordinate;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Reverse-geocoding response in Nominatim's `format=json` shape.
#[derive(Debug, Deserialize)]
struct NominatimReverse {
    display_name: Option<String>,
    #[serde(rename = "type")]
    osm_type: Option<String>,
    class: Option<String>,
    #[serde(default)]
    address: RawAddressComponents,
    error: Option<String>,
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(base_url: String, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn classify_transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::GeocodeTimeout(e.to_string())
    } else {
        Error::Geocoder(e.to_string())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, coordinate: GpsCoordinate) -> Result<Option<RawPlace>> {
        tracing::debug!(
            "Reverse geocoding {}, {} via Nominatim",
            coordinate.latitude,
            coordinate.longitude
        );

        let url = format!("{}/reverse", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Nominatim error (status {}): {}", status, error_text);
            let message = format!("Nominatim returned status {}: {}", status, error_text);
            return Err(match status {
                StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => {
                    Error::GeocodeTimeout(message)
                }
                _ => Error::Geocoder(message),
            });
        }

        let body = response.text().await.map_err(classify_transport_error)?;
        let parsed: NominatimReverse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Nominatim response: {}\nBody: {}", e, body);
            Error::Geocoder(format!("Failed to parse Nominatim response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            tracing::info!("Nominatim has no address here: {}", error);
            return Ok(None);
        }

        Ok(Some(RawPlace {
            display_name: parsed.display_name,
            osm_type: parsed.osm_type,
            osm_class: parsed.class,
            address: parsed.address,
        }))
    }
}
