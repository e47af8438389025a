//! Format parsers.
//!
//! Each parser turns a raw byte payload into a [`FeatureCollection`] in
//! the file's native coordinates; reprojection happens afterwards. The
//! file extension alone decides which parser runs.

mod dxf;
mod geojson;
mod shapefile_zip;

use crate::error::ParseError;
use geolayers_geometry::FeatureCollection;

pub use dxf::parse_dxf;
pub use geojson::parse_geojson_bytes;
pub use shapefile_zip::parse_shapefile_bundle;

/// The recognized upload kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
	/// Zipped shapefile bundle (`.zip`).
	ShapefileBundle,
	/// CAD exchange format (`.dxf`).
	Dxf,
	/// GeoJSON (`.geojson`, `.json`).
	GeoJson,
}

impl FileKind {
	/// Match the filename suffix case-insensitively.
	#[must_use]
	pub fn from_file_name(file_name: &str) -> Option<FileKind> {
		let extension = file_name.rsplit('.').next()?.to_ascii_lowercase();
		match extension.as_str() {
			"zip" => Some(FileKind::ShapefileBundle),
			"dxf" => Some(FileKind::Dxf),
			"geojson" | "json" => Some(FileKind::GeoJson),
			_ => None,
		}
	}

	/// Run the parser for this kind.
	pub fn parse(self, bytes: &[u8]) -> Result<FeatureCollection, ParseError> {
		match self {
			FileKind::ShapefileBundle => parse_shapefile_bundle(bytes),
			FileKind::Dxf => parse_dxf(bytes),
			FileKind::GeoJson => parse_geojson_bytes(bytes),
		}
	}
}
