//! Normalized feature model for uploaded geometry layers.
//!
//! Every format parser in the pipeline emits the same structures: a
//! [`FeatureCollection`] of [`GeoFeature`]s, each holding a tagged
//! [`Geometry`] and a flat [`GeoProperties`] attribute map. The
//! [`geojson`] module converts between this model and GeoJSON text.

mod geo;
pub mod geojson;

pub use geo::*;
pub use geojson::{collection_to_json, parse_geojson};
