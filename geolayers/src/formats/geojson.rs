//! GeoJSON validator/passthrough.
//!
//! GeoJSON is already the normalized shape, so this parser only decodes
//! the bytes and applies the structural checks of
//! [`FeatureCollection::from_json_str`]; any failure carries the
//! specific reason.

use crate::error::ParseError;
use geolayers_geometry::FeatureCollection;

pub fn parse_geojson_bytes(bytes: &[u8]) -> Result<FeatureCollection, ParseError> {
	let text = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidGeoJson(e.to_string()))?;
	FeatureCollection::from_json_str(text).map_err(|e| ParseError::InvalidGeoJson(format!("{e:#}")))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn passes_valid_collection_through() {
		let fc = parse_geojson_bytes(
			br#"{"type": "FeatureCollection", "features": [
				{"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 2]}}
			]}"#,
		)
		.unwrap();
		assert_eq!(fc.len(), 1);
	}

	#[test]
	fn missing_type_is_reported() {
		let err = parse_geojson_bytes(br#"{"features": []}"#).unwrap_err();
		let ParseError::InvalidGeoJson(reason) = &err else {
			panic!("expected InvalidGeoJson");
		};
		assert!(reason.contains("missing 'type'"));
	}

	#[test]
	fn non_utf8_is_rejected() {
		assert!(matches!(
			parse_geojson_bytes(&[0xff, 0xfe, 0x00]),
			Err(ParseError::InvalidGeoJson(_))
		));
	}
}
