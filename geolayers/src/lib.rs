//! Ingests shapefile bundles, DXF and GeoJSON uploads into normalized
//! WGS84 feature layers.
//!
//! The pipeline runs in three stages: the format parsers in [`formats`]
//! turn raw bytes into a [`FeatureCollection`](geolayers_geometry::FeatureCollection),
//! [`reproject`] moves projected coordinates into WGS84, and the
//! [`registry`] hands the result to a map renderer and tracks its
//! lifecycle. [`ingest::IngestPipeline`] ties the stages together behind
//! a single-flight guard.

pub mod error;
pub mod formats;
pub mod ingest;
pub mod registry;
pub mod renderer;
pub mod reproject;

pub use error::{IngestError, MAX_UPLOAD_BYTES, ParseError};
pub use ingest::{IngestPipeline, RawUpload};
pub use registry::{LayerId, LayerRegistry, UploadedLayer};
pub use renderer::{MapRenderer, NoopRenderer, RenderHandle};
pub use reproject::CoordinateProfile;
