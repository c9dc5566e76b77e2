//! Backend for the R8it review app
//!
//! Two services share this crate: one identifies the business shown in a
//! photo with a vision model and proposes a rating and review suggestions,
//! the other reads GPS coordinates from the photo's EXIF metadata and
//! reverse geocodes them into a structured address.

pub mod ai;
pub mod analysis;
pub mod api;
pub mod error;
pub mod gps;
pub mod location;
pub mod mime;
pub mod models;
pub mod prompts;

pub use error::{Error, Result};
