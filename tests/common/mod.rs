//! Hand-assembled EXIF fixtures.
//!
//! Layout of the big-endian TIFF block (offsets from its first byte):
//! header at 0, IFD0 at 8 with a single GPS-IFD pointer, GPS IFD at 26 with
//! four entries, latitude rationals at 80, longitude rationals at 104.
#![allow(dead_code)]

use base64::Engine as _;

/// 48°51'23.76" N
pub const PARIS_LATITUDE_DMS: [(u32, u32); 3] = [(48, 1), (51, 1), (2376, 100)];
/// 2°21'7.92" E
pub const PARIS_LONGITUDE_DMS: [(u32, u32); 3] = [(2, 1), (21, 1), (792, 100)];

pub const PARIS_LATITUDE: f64 = 48.8566;
pub const PARIS_LONGITUDE: f64 = 2.3522;

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

fn entry(out: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: [u8; 4]) {
    out.extend_from_slice(&tag.to_be_bytes());
    out.extend_from_slice(&field_type.to_be_bytes());
    out.extend_from_slice(&count.to_be_bytes());
    out.extend_from_slice(&value);
}

fn ascii_ref(reference: u8) -> [u8; 4] {
    [reference, 0, 0, 0]
}

fn rationals(out: &mut Vec<u8>, values: &[(u32, u32); 3]) {
    for (numerator, denominator) in values {
        out.extend_from_slice(&numerator.to_be_bytes());
        out.extend_from_slice(&denominator.to_be_bytes());
    }
}

/// TIFF block carrying the four GPS position tags.
pub fn gps_tiff(
    latitude_ref: u8,
    latitude: &[(u32, u32); 3],
    longitude_ref: u8,
    longitude: &[(u32, u32); 3],
) -> Vec<u8> {
    let mut tiff = Vec::with_capacity(128);
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes());

    // IFD0
    tiff.extend_from_slice(&1u16.to_be_bytes());
    entry(&mut tiff, 0x8825, TYPE_LONG, 1, 26u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    assert_eq!(tiff.len(), 26);

    // GPS IFD
    tiff.extend_from_slice(&4u16.to_be_bytes());
    entry(&mut tiff, 0x0001, TYPE_ASCII, 2, ascii_ref(latitude_ref));
    entry(&mut tiff, 0x0002, TYPE_RATIONAL, 3, 80u32.to_be_bytes());
    entry(&mut tiff, 0x0003, TYPE_ASCII, 2, ascii_ref(longitude_ref));
    entry(&mut tiff, 0x0004, TYPE_RATIONAL, 3, 104u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    assert_eq!(tiff.len(), 80);

    rationals(&mut tiff, latitude);
    rationals(&mut tiff, longitude);
    assert_eq!(tiff.len(), 128);

    tiff
}

/// TIFF block whose only tag is the camera make.
pub fn tiff_without_gps() -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM");
    tiff.extend_from_slice(&42u16.to_be_bytes());
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&1u16.to_be_bytes());
    entry(&mut tiff, 0x010F, TYPE_ASCII, 3, [b'R', b'8', 0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes());
    tiff
}

/// Minimal JPEG: SOI, an APP1 Exif segment around `tiff`, EOI.
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let segment_len = (2 + 6 + tiff.len()) as u16;

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(tiff);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

pub fn paris_jpeg() -> Vec<u8> {
    jpeg_with_exif(&gps_tiff(
        b'N',
        &PARIS_LATITUDE_DMS,
        b'E',
        &PARIS_LONGITUDE_DMS,
    ))
}

/// Same magnitudes as Paris, mirrored into the southern and western hemispheres.
pub fn mirrored_paris_jpeg() -> Vec<u8> {
    jpeg_with_exif(&gps_tiff(
        b'S',
        &PARIS_LATITUDE_DMS,
        b'W',
        &PARIS_LONGITUDE_DMS,
    ))
}

pub fn jpeg_without_gps() -> Vec<u8> {
    jpeg_with_exif(&tiff_without_gps())
}

pub fn jpeg_without_exif() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}

pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} to be within 1e-9 of {}",
        actual,
        expected
    );
}
