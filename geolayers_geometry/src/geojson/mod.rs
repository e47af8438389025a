//! Conversion between the feature model and GeoJSON text.

mod parse;
mod stringify;

pub use parse::parse_geojson;
pub use stringify::{collection_to_json, feature_to_json};
