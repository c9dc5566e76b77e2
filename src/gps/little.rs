use super::dms::rational_to_f64;
use super::{GpsTagReader, GpsTags};
use crate::mime::sniff_image_mime;
use crate::{Error, Result};
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;

/// Walks the raw tag list and divides each rational by hand.
pub struct LittleExifReader;

impl LittleExifReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LittleExifReader {
    fn default() -> Self {
        Self::new()
    }
}

impl GpsTagReader for LittleExifReader {
    fn name(&self) -> &'static str {
        "little_exif"
    }

    fn read_gps_tags(&self, image: &[u8]) -> Result<Option<GpsTags>> {
        let Some(file_type) = file_extension(image) else {
            return Ok(None);
        };

        let metadata = match Metadata::new_from_vec(&image.to_vec(), file_type) {
            Ok(metadata) => metadata,
            Err(e) if is_missing_exif(&e) => return Ok(None),
            Err(e) => return Err(Error::Exif(e.to_string())),
        };

        let mut latitude = None;
        let mut latitude_ref = None;
        let mut longitude = None;
        let mut longitude_ref = None;

        for tag in &metadata {
            match tag {
                ExifTag::GPSLatitude(values) => latitude = Some(divide_all(values)),
                ExifTag::GPSLongitude(values) => longitude = Some(divide_all(values)),
                ExifTag::GPSLatitudeRef(text) => latitude_ref = clean_ref(text),
                ExifTag::GPSLongitudeRef(text) => longitude_ref = clean_ref(text),
                _ => {}
            }
        }

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

fn file_extension(image: &[u8]) -> Option<FileExtension> {
    match sniff_image_mime(image)? {
        "image/jpeg" => Some(FileExtension::JPEG),
        "image/png" => Some(FileExtension::PNG {
            as_zTXt_chunk: true,
        }),
        "image/webp" => Some(FileExtension::WEBP),
        "image/tiff" => Some(FileExtension::TIFF),
        _ => None,
    }
}

/// little_exif reports an absent metadata block as a plain I/O error.
fn is_missing_exif(e: &std::io::Error) -> bool {
    let message = e.to_string();
    ["No EXIF data found", "No metadata found", "No EXIF chunk"]
        .iter()
        .any(|marker| message.contains(marker))
}

/// A zero denominator poisons the component so the converter rejects it.
fn divide_all(values: &[uR64]) -> Vec<f64> {
    values
        .iter()
        .map(|r| rational_to_f64(r.nominator, r.denominator).unwrap_or(f64::NAN))
        .collect()
}

fn clean_ref(text: &str) -> Option<String> {
    let text = text.trim_end_matches('\0').trim();
    (!text.is_empty()).then(|| text.to_string())
}
