//! Zipped shapefile bundle adapter.
//!
//! The binary shapefile layout itself is decoded by the external
//! `shapefile` crate; this module only unpacks the zip, pairs every
//! `.shp` member with its sibling `.dbf` attribute table, converts the
//! decoded shapes into the normalized model, and flattens all per-layer
//! outputs into one collection. Every failure of the zip or shapefile
//! decoder surfaces as [`ParseError::ExternalDecodeFailed`].

use crate::error::ParseError;
use anyhow::{Context, Result, ensure};
use geolayers_geometry::{Coordinates, FeatureCollection, GeoFeature, GeoValue, Geometry};
use shapefile::{PolygonRing, Shape, dbase};
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub fn parse_shapefile_bundle(bytes: &[u8]) -> Result<FeatureCollection, ParseError> {
	decode_bundle(bytes).map_err(|e| ParseError::ExternalDecodeFailed(format!("{e:#}")))
}

fn decode_bundle(bytes: &[u8]) -> Result<FeatureCollection> {
	let mut archive = ZipArchive::new(Cursor::new(bytes)).context("not a readable zip archive")?;

	// Member names in archive order, so multi-layer bundles flatten
	// deterministically.
	let mut names = Vec::with_capacity(archive.len());
	for index in 0..archive.len() {
		names.push(archive.by_index(index)?.name().to_string());
	}
	let shp_names = names
		.iter()
		.filter(|name| name.to_ascii_lowercase().ends_with(".shp"))
		.cloned()
		.collect::<Vec<_>>();
	ensure!(!shp_names.is_empty(), "bundle contains no .shp member");

	let mut features = Vec::new();
	for shp_name in shp_names {
		let shp = read_member(&mut archive, &shp_name)?;
		let dbf = match sibling_dbf_name(&shp_name, &names) {
			Some(dbf_name) => Some(read_member(&mut archive, &dbf_name)?),
			None => None,
		};
		decode_layer(shp, dbf, &mut features).with_context(|| format!("failed to decode '{shp_name}'"))?;
	}
	Ok(FeatureCollection::from(features))
}

fn read_member(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>> {
	let mut member = archive.by_name(name)?;
	let mut bytes = Vec::new();
	member
		.read_to_end(&mut bytes)
		.with_context(|| format!("failed to read '{name}'"))?;
	Ok(bytes)
}

/// The attribute table shares the base name of its `.shp`, matched
/// case-insensitively.
fn sibling_dbf_name(shp_name: &str, names: &[String]) -> Option<String> {
	let base = &shp_name[..shp_name.len() - 4];
	let wanted = format!("{base}.dbf").to_ascii_lowercase();
	names
		.iter()
		.find(|name| name.to_ascii_lowercase() == wanted)
		.cloned()
}

fn decode_layer(shp: Vec<u8>, dbf: Option<Vec<u8>>, features: &mut Vec<GeoFeature>) -> Result<()> {
	let shape_reader = shapefile::ShapeReader::new(Cursor::new(shp))?;
	if let Some(dbf) = dbf {
		let dbf_reader = dbase::Reader::new(Cursor::new(dbf))?;
		let mut reader = shapefile::Reader::new(shape_reader, dbf_reader);
		for pair in reader.iter_shapes_and_records() {
			let (shape, record) = pair?;
			if let Some(geometry) = shape_to_geometry(shape) {
				let mut feature = GeoFeature::new(geometry);
				for (name, value) in record {
					feature.properties.insert(name, field_to_value(value));
				}
				features.push(feature);
			}
		}
	} else {
		for shape in shape_reader.read()? {
			if let Some(geometry) = shape_to_geometry(shape) {
				features.push(GeoFeature::new(geometry));
			}
		}
	}
	Ok(())
}

macro_rules! to_coords {
	($points:expr) => {
		$points
			.iter()
			.map(|point| Coordinates::new(point.x, point.y))
			.collect::<Vec<_>>()
	};
}

/// A polyline with one part is a LineString, more parts a MultiLineString.
macro_rules! polyline_to_geometry {
	($polyline:expr) => {{
		let mut lines = $polyline
			.parts()
			.iter()
			.map(|part| to_coords!(part))
			.collect::<Vec<_>>();
		if lines.len() == 1 {
			Geometry::LineString(lines.remove(0))
		} else {
			Geometry::MultiLineString(lines)
		}
	}};
}

/// Rings arrive outer-first with inner rings following their outer;
/// each outer opens a new polygon.
macro_rules! polygon_to_geometry {
	($polygon:expr) => {{
		let mut polygons: Vec<Vec<Vec<Coordinates>>> = Vec::new();
		for ring in $polygon.rings() {
			match ring {
				PolygonRing::Outer(points) => polygons.push(vec![to_coords!(points)]),
				PolygonRing::Inner(points) => {
					let coords = to_coords!(points);
					if let Some(rings) = polygons.last_mut() {
						rings.push(coords);
					} else {
						polygons.push(vec![coords]);
					}
				}
			}
		}
		if polygons.is_empty() {
			None
		} else if polygons.len() == 1 {
			Some(Geometry::Polygon(polygons.remove(0)))
		} else {
			Some(Geometry::MultiPolygon(polygons))
		}
	}};
}

fn shape_to_geometry(shape: Shape) -> Option<Geometry> {
	match shape {
		Shape::NullShape => None,
		Shape::Point(p) => Some(Geometry::Point(Coordinates::new(p.x, p.y))),
		Shape::PointM(p) => Some(Geometry::Point(Coordinates::new(p.x, p.y))),
		Shape::PointZ(p) => Some(Geometry::Point(Coordinates::new(p.x, p.y))),
		Shape::Multipoint(p) => Some(Geometry::MultiPoint(to_coords!(p.points()))),
		Shape::MultipointM(p) => Some(Geometry::MultiPoint(to_coords!(p.points()))),
		Shape::MultipointZ(p) => Some(Geometry::MultiPoint(to_coords!(p.points()))),
		Shape::Polyline(p) => Some(polyline_to_geometry!(p)),
		Shape::PolylineM(p) => Some(polyline_to_geometry!(p)),
		Shape::PolylineZ(p) => Some(polyline_to_geometry!(p)),
		Shape::Polygon(p) => polygon_to_geometry!(p),
		Shape::PolygonM(p) => polygon_to_geometry!(p),
		Shape::PolygonZ(p) => polygon_to_geometry!(p),
		Shape::Multipatch(_) => None,
	}
}

fn field_to_value(value: dbase::FieldValue) -> GeoValue {
	use dbase::FieldValue;
	match value {
		FieldValue::Character(v) => v.map_or(GeoValue::Null, GeoValue::String),
		FieldValue::Numeric(v) => v.map_or(GeoValue::Null, GeoValue::Double),
		FieldValue::Logical(v) => v.map_or(GeoValue::Null, GeoValue::Bool),
		FieldValue::Integer(v) => GeoValue::Int(i64::from(v)),
		FieldValue::Float(v) => v.map_or(GeoValue::Null, |f| GeoValue::Double(f64::from(f))),
		FieldValue::Double(v) => GeoValue::Double(v),
		FieldValue::Currency(v) => GeoValue::Double(v),
		FieldValue::Date(v) => {
			v.map_or(GeoValue::Null, |d| {
				GeoValue::String(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
			})
		}
		FieldValue::DateTime(v) => GeoValue::String(format!("{v:?}")),
		FieldValue::Memo(v) => GeoValue::String(v),
	}
}
