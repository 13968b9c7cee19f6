//! Collaborator services: product sheet export and geolocation distance.

pub mod export;
pub mod geo;

pub use export::{DocumentRenderer, ExportService, TextSheetRenderer};
pub use geo::{DistanceReport, DistanceService, GeoLocator, HttpGeoLocator};
