use super::{GpsTagReader, GpsTags};
use crate::{Error, Result};
use exif::{Exif, In, Tag, Value};
use std::io::Cursor;

/// Reads the parsed EXIF field dictionary and looks up the GPS IFD entries.
pub struct KamadakExifReader;

impl KamadakExifReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for KamadakExifReader {
    fn default() -> Self {
        Self::new()
    }
}

impl GpsTagReader for KamadakExifReader {
    fn name(&self) -> &'static str {
        "kamadak-exif"
    }

    fn read_gps_tags(&self, image: &[u8]) -> Result<Option<GpsTags>> {
        let mut cursor = Cursor::new(image);
        let exif = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(e) => return Err(Error::Exif(e.to_string())),
        };

        let latitude = field_components(&exif, Tag::GPSLatitude);
        let latitude_ref = field_text(&exif, Tag::GPSLatitudeRef);
        let longitude = field_components(&exif, Tag::GPSLongitude);
        let longitude_ref = field_text(&exif, Tag::GPSLongitudeRef);

        match (latitude, latitude_ref, longitude, longitude_ref) {
            (Some(latitude), Some(latitude_ref), Some(longitude), Some(longitude_ref)) => {
                Ok(Some(GpsTags {
                    latitude,
                    latitude_ref,
                    longitude,
                    longitude_ref,
                }))
            }
            _ => Ok(None),
        }
    }
}

fn field_components(exif: &Exif, tag: Tag) -> Option<Vec<f64>> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let components: Vec<f64> = match &field.value {
        Value::Rational(values) => values.iter().map(|r| r.to_f64()).collect(),
        Value::SRational(values) => values.iter().map(|r| r.to_f64()).collect(),
        Value::Double(values) => values.clone(),
        Value::Float(values) => values.iter().map(|v| f64::from(*v)).collect(),
        _ => return None,
    };
    (!components.is_empty()).then_some(components)
}

fn field_text(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(values) => values
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string())
            .filter(|text| !text.is_empty()),
        _ => None,
    }
}
