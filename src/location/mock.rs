use super::{RawPlace, ReverseGeocoder};
use crate::models::GpsCoordinate;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockResponse {
    Place(RawPlace),
    NoResult,
    Timeout,
    ServiceError(String),
}

/// Replays scripted geocoder responses in order, cycling when exhausted.
#[derive(Clone)]
pub struct MockGeocoder {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    requests: Arc<Mutex<Vec<GpsCoordinate>>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_place(self, place: RawPlace) -> Self {
        self.push(MockResponse::Place(place))
    }

    pub fn with_no_result(self) -> Self {
        self.push(MockResponse::NoResult)
    }

    pub fn with_timeout(self) -> Self {
        self.push(MockResponse::Timeout)
    }

    pub fn with_service_error(self, message: &str) -> Self {
        self.push(MockResponse::ServiceError(message.to_string()))
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<GpsCoordinate> {
        self.requests.lock().unwrap().clone()
    }

    fn push(self, response: MockResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReverseGeocoder for MockGeocoder {
    async fn reverse(&self, coordinate: GpsCoordinate) -> Result<Option<RawPlace>> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(coordinate);
            requests.len()
        };

        let response = {
            let responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                MockResponse::NoResult
            } else {
                responses[(count - 1) % responses.len()].clone()
            }
        };

        match response {
            MockResponse::Place(place) => Ok(Some(place)),
            MockResponse::NoResult => Ok(None),
            MockResponse::Timeout => Err(Error::GeocodeTimeout("mock timeout".to_string())),
            MockResponse::ServiceError(message) => Err(Error::Geocoder(message)),
        }
    }
}
