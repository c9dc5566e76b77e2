//! GPS extraction from embedded image metadata
//!
//! Two independent EXIF readers expose the same four GPS tags. They are tried
//! in a fixed order and the first one that yields a convertible coordinate
//! wins. Extraction never fails past this boundary: decoding errors and
//! reader panics collapse into [`GpsExtraction::NotFound`].

pub mod dms;
pub mod kamadak;
pub mod little;

pub use dms::dms_to_decimal;
pub use kamadak::KamadakExifReader;
pub use little::LittleExifReader;

use crate::models::GpsCoordinate;
use crate::Result;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

pub const NO_GPS_REASON: &str = "No GPS data found in image";

/// Raw GPSLatitude/GPSLongitude components and their hemisphere references.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsTags {
    pub latitude: Vec<f64>,
    pub latitude_ref: String,
    pub longitude: Vec<f64>,
    pub longitude_ref: String,
}

impl GpsTags {
    /// Run both axes through the DMS converter.
    pub fn to_coordinate(&self) -> Option<GpsCoordinate> {
        let latitude = dms_to_decimal(&self.latitude, &self.latitude_ref)?;
        let longitude = dms_to_decimal(&self.longitude, &self.longitude_ref)?;
        GpsCoordinate::new(latitude, longitude)
    }
}

/// One strategy for pulling GPS tags out of image bytes.
pub trait GpsTagReader: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the image has no complete GPS tag set.
    fn read_gps_tags(&self, image: &[u8]) -> Result<Option<GpsTags>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GpsExtraction {
    Found(GpsCoordinate),
    NotFound(String),
}

impl GpsExtraction {
    pub fn coordinate(&self) -> Option<GpsCoordinate> {
        match self {
            GpsExtraction::Found(coordinate) => Some(*coordinate),
            GpsExtraction::NotFound(_) => None,
        }
    }
}

pub struct GpsExtractor {
    readers: Vec<Box<dyn GpsTagReader>>,
}

impl GpsExtractor {
    /// Metadata-dictionary reader first, low-level rational reader second.
    pub fn new() -> Self {
        Self::with_readers(vec![
            Box::new(KamadakExifReader::new()),
            Box::new(LittleExifReader::new()),
        ])
    }

    pub fn with_readers(readers: Vec<Box<dyn GpsTagReader>>) -> Self {
        Self { readers }
    }

    pub fn extract(&self, image: &[u8]) -> GpsExtraction {
        let mut failures = Vec::new();

        for reader in &self.readers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| reader.read_gps_tags(image)));

            match outcome {
                Ok(Ok(Some(tags))) => match tags.to_coordinate() {
                    Some(coordinate) => {
                        debug!(
                            "{} found GPS coordinates {}, {}",
                            reader.name(),
                            coordinate.latitude,
                            coordinate.longitude
                        );
                        return GpsExtraction::Found(coordinate);
                    }
                    None => {
                        debug!("{} found GPS tags that do not convert: {:?}", reader.name(), tags);
                    }
                },
                Ok(Ok(None)) => {
                    debug!("{} found no GPS tags", reader.name());
                }
                Ok(Err(e)) => {
                    debug!("{} failed to read EXIF: {}", reader.name(), e);
                    failures.push(format!("{}: {}", reader.name(), e));
                }
                Err(_) => {
                    warn!("{} panicked while decoding image metadata", reader.name());
                    failures.push(format!("{}: decoder panicked", reader.name()));
                }
            }
        }

        if failures.is_empty() {
            GpsExtraction::NotFound(NO_GPS_REASON.to_string())
        } else {
            GpsExtraction::NotFound(format!("{} ({})", NO_GPS_REASON, failures.join("; ")))
        }
    }
}

impl Default for GpsExtractor {
    fn default() -> Self {
        Self::new()
    }
}
