//! Minimal DXF entity parser.
//!
//! DXF text is a flat stream of alternating lines: a numeric group code
//! followed by its value. The tokenizer walks the stream strictly
//! pairwise; a small state machine over the `(code, value)` records
//! tracks the current entity and emits a feature at every entity
//! boundary (group code `0`).
//!
//! Only two entity kinds are recognized: `LWPOLYLINE` (emitted as a
//! Polygon when its closed flag is set, otherwise as a LineString) and
//! `LINE` (always a 2-point LineString). Everything else is dropped
//! silently.

use crate::error::ParseError;
use geolayers_geometry::{Coordinates, FeatureCollection, GeoFeature, Geometry};

const DEFAULT_LAYER: &str = "Default";

/// Tokenizer over the flat line stream, yielding `(group code, value)`
/// records. Pairs whose code line is not numeric are skipped; a trailing
/// unpaired line is ignored.
struct GroupCodes<'a> {
	lines: std::str::Lines<'a>,
}

impl<'a> GroupCodes<'a> {
	fn new(text: &'a str) -> Self {
		Self { lines: text.lines() }
	}
}

impl<'a> Iterator for GroupCodes<'a> {
	type Item = (i32, &'a str);

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let code = self.lines.next()?.trim();
			let value = self.lines.next()?.trim();
			if let Ok(code) = code.parse::<i32>() {
				return Some((code, value));
			}
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntityKind {
	None,
	Polyline,
	Line,
}

impl EntityKind {
	fn from_name(name: &str) -> Self {
		match name {
			"LWPOLYLINE" => EntityKind::Polyline,
			"LINE" => EntityKind::Line,
			_ => EntityKind::None,
		}
	}
}

/// Accumulated state of the entity currently being read.
struct EntityState {
	kind: EntityKind,
	vertices: Vec<Coordinates>,
	pending_x: Option<f64>,
	closed: bool,
	start: [Option<f64>; 2],
	end: [Option<f64>; 2],
}

impl EntityState {
	fn new(kind: EntityKind) -> Self {
		Self {
			kind,
			vertices: Vec::new(),
			pending_x: None,
			closed: false,
			start: [None; 2],
			end: [None; 2],
		}
	}

	fn apply(&mut self, code: i32, value: &str) {
		let ordinate = || value.parse::<f64>().ok().filter(|v| !v.is_nan());
		match (self.kind, code) {
			(EntityKind::Polyline, 70) => {
				// Bit 0 of the polyline flags marks a closed ring.
				if let Ok(flags) = value.parse::<i64>() {
					self.closed = flags & 1 == 1;
				}
			}
			(EntityKind::Polyline, 10) => self.pending_x = ordinate(),
			(EntityKind::Polyline, 20) => {
				// The Y ordinate completes the vertex started by the
				// preceding X record; either one failing to parse drops
				// the vertex.
				if let (Some(x), Some(y)) = (self.pending_x.take(), ordinate()) {
					self.vertices.push(Coordinates::new(x, y));
				}
			}
			(EntityKind::Line, 10) => self.start[0] = ordinate(),
			(EntityKind::Line, 20) => self.start[1] = ordinate(),
			(EntityKind::Line, 11) => self.end[0] = ordinate(),
			(EntityKind::Line, 21) => self.end[1] = ordinate(),
			_ => {}
		}
	}

	/// Turn the accumulated entity into a feature, if it is emittable.
	fn emit(&mut self, layer: &str) -> Option<GeoFeature> {
		let geometry = match self.kind {
			EntityKind::Polyline => {
				if self.vertices.len() < 2 {
					return None;
				}
				let mut coordinates = std::mem::take(&mut self.vertices);
				if self.closed && coordinates.len() > 2 {
					let first = coordinates[0];
					if coordinates.last() != Some(&first) {
						coordinates.push(first);
					}
					Geometry::Polygon(vec![coordinates])
				} else {
					Geometry::LineString(coordinates)
				}
			}
			EntityKind::Line => {
				let (Some(x1), Some(y1), Some(x2), Some(y2)) =
					(self.start[0], self.start[1], self.end[0], self.end[1])
				else {
					return None;
				};
				Geometry::new_line_string(vec![[x1, y1], [x2, y2]])
			}
			EntityKind::None => return None,
		};
		let mut feature = GeoFeature::new(geometry);
		feature.set_property("layer", layer);
		Some(feature)
	}
}

/// Parse DXF text into a feature collection.
///
/// Every emitted feature carries a single `layer` attribute holding the
/// most recent group-code-8 value. A stream yielding zero features fails
/// with [`ParseError::NoValidGeometry`].
pub fn parse_dxf(bytes: &[u8]) -> Result<FeatureCollection, ParseError> {
	let text = String::from_utf8_lossy(bytes);
	let mut features = Vec::new();
	let mut layer = DEFAULT_LAYER.to_string();
	let mut state = EntityState::new(EntityKind::None);

	for (code, value) in GroupCodes::new(&text) {
		match code {
			0 => {
				// Entity boundary: emit what was accumulated, then start
				// over. The current layer persists across boundaries.
				if let Some(feature) = state.emit(&layer) {
					features.push(feature);
				}
				state = EntityState::new(EntityKind::from_name(value));
			}
			8 => {
				layer = if value.is_empty() {
					DEFAULT_LAYER.to_string()
				} else {
					value.to_string()
				};
			}
			code => state.apply(code, value),
		}
	}

	log::debug!("parsed {} features from DXF", features.len());

	if features.is_empty() {
		return Err(ParseError::NoValidGeometry);
	}
	Ok(FeatureCollection::from(features))
}

#[cfg(test)]
mod tests {
	use super::*;
	use geolayers_geometry::GeoValue;

	fn dxf(records: &[&str]) -> Vec<u8> {
		records.join("\n").into_bytes()
	}

	#[test]
	fn closed_polyline_becomes_polygon_with_closed_ring() {
		let input = dxf(&[
			"0", "SECTION", "2", "ENTITIES", //
			"0", "LWPOLYLINE", "8", "Parcels", "70", "1", //
			"10", "0.0", "20", "0.0", //
			"10", "10.0", "20", "0.0", //
			"10", "10.0", "20", "10.0", //
			"10", "0.0", "20", "0.0", //
			"0", "ENDSEC", "0", "EOF",
		]);
		let fc = parse_dxf(&input).unwrap();
		assert_eq!(fc.len(), 1);
		let feature = &fc.features[0];
		assert_eq!(feature.properties.get("layer"), Some(&GeoValue::from("Parcels")));
		assert_eq!(
			feature.geometry,
			Geometry::new_polygon(vec![vec![
				[0.0, 0.0],
				[10.0, 0.0],
				[10.0, 10.0],
				[0.0, 0.0],
			]])
		);
	}

	#[test]
	fn open_ring_is_forced_closed() {
		let input = dxf(&[
			"0", "LWPOLYLINE", "70", "1", //
			"10", "0", "20", "0", //
			"10", "4", "20", "0", //
			"10", "4", "20", "4", //
			"0", "EOF",
		]);
		let fc = parse_dxf(&input).unwrap();
		let Geometry::Polygon(rings) = &fc.features[0].geometry else {
			panic!("expected a polygon");
		};
		assert_eq!(rings[0].len(), 4);
		assert_eq!(rings[0].first(), rings[0].last());
	}

	#[test]
	fn unclosed_polyline_becomes_line_string() {
		let input = dxf(&[
			"0", "LWPOLYLINE", //
			"10", "0", "20", "0", //
			"10", "5", "20", "5", //
			"10", "9", "20", "0", //
			"0", "EOF",
		]);
		let fc = parse_dxf(&input).unwrap();
		assert_eq!(fc.features[0].geometry.type_as_str(), "LineString");
	}

	#[test]
	fn closed_two_point_polyline_stays_line_string() {
		let input = dxf(&[
			"0", "LWPOLYLINE", "70", "1", //
			"10", "0", "20", "0", //
			"10", "5", "20", "5", //
			"0", "EOF",
		]);
		let fc = parse_dxf(&input).unwrap();
		assert_eq!(fc.features[0].geometry.type_as_str(), "LineString");
	}

	#[test]
	fn line_entities_become_two_point_line_strings() {
		let input = dxf(&[
			"0", "LINE", //
			"10", "1.0", "20", "2.0", "11", "3.0", "21", "4.0", //
			"0", "LINE", //
			"10", "-1.0", "20", "0.0", "11", "0.0", "21", "8.5", //
			"0", "EOF",
		]);
		let fc = parse_dxf(&input).unwrap();
		assert_eq!(fc.len(), 2);
		for feature in &fc.features {
			let Geometry::LineString(points) = &feature.geometry else {
				panic!("expected a line string");
			};
			assert_eq!(points.len(), 2);
		}
		assert_eq!(
			fc.features[0].geometry,
			Geometry::new_line_string(vec![[1.0, 2.0], [3.0, 4.0]])
		);
	}

	#[test]
	fn short_polylines_and_unknown_entities_are_dropped() {
		let input = dxf(&[
			"0", "CIRCLE", "10", "1", "20", "1", "40", "5", //
			"0", "LWPOLYLINE", "10", "0", "20", "0", //
			"0", "EOF",
		]);
		assert!(matches!(parse_dxf(&input), Err(ParseError::NoValidGeometry)));
	}

	#[test]
	fn layer_set_inside_entity_applies_to_it() {
		let input = dxf(&[
			"0", "LINE", "8", "Walls", //
			"10", "0", "20", "0", "11", "1", "21", "1", //
			"0", "LINE", //
			"10", "2", "20", "2", "11", "3", "21", "3", //
			"0", "EOF",
		]);
		let fc = parse_dxf(&input).unwrap();
		assert_eq!(fc.features[0].properties.get("layer"), Some(&GeoValue::from("Walls")));
		// The layer persists until the next group code 8.
		assert_eq!(fc.features[1].properties.get("layer"), Some(&GeoValue::from("Walls")));
	}

	#[test]
	fn entity_without_trailing_boundary_is_not_emitted() {
		let input = dxf(&[
			"0", "LINE", //
			"10", "0", "20", "0", "11", "1", "21", "1",
		]);
		assert!(matches!(parse_dxf(&input), Err(ParseError::NoValidGeometry)));
	}

	#[test]
	fn unparseable_ordinates_drop_the_vertex() {
		let input = dxf(&[
			"0", "LWPOLYLINE", //
			"10", "abc", "20", "0", //
			"10", "0", "20", "0", //
			"10", "5", "20", "5", //
			"0", "EOF",
		]);
		let fc = parse_dxf(&input).unwrap();
		let Geometry::LineString(points) = &fc.features[0].geometry else {
			panic!("expected a line string");
		};
		assert_eq!(points.len(), 2);
	}

	#[test]
	fn empty_input_has_no_geometry() {
		assert!(matches!(parse_dxf(b""), Err(ParseError::NoValidGeometry)));
	}
}
