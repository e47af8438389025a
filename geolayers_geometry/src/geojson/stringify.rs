use crate::geo::{Coordinates, FeatureCollection, GeoFeature, GeoValue, Geometry};
use serde_json::{Map, Value, json};

/// Serialize a [`FeatureCollection`] as a GeoJSON value.
pub fn collection_to_json(collection: &FeatureCollection) -> Value {
	json!({
		"type": "FeatureCollection",
		"features": collection.features.iter().map(feature_to_json).collect::<Vec<_>>(),
	})
}

pub fn feature_to_json(feature: &GeoFeature) -> Value {
	let mut properties = Map::new();
	for (key, value) in feature.properties.iter() {
		properties.insert(key.clone(), value_to_json(value));
	}
	json!({
		"type": "Feature",
		"properties": Value::Object(properties),
		"geometry": geometry_to_json(&feature.geometry),
	})
}

fn geometry_to_json(geometry: &Geometry) -> Value {
	let coordinates = match geometry {
		Geometry::Point(c) => pair(c),
		Geometry::MultiPoint(line) | Geometry::LineString(line) => pairs(line),
		Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
			Value::Array(lines.iter().map(|line| pairs(line)).collect())
		}
		Geometry::MultiPolygon(polygons) => Value::Array(
			polygons
				.iter()
				.map(|rings| Value::Array(rings.iter().map(|ring| pairs(ring)).collect()))
				.collect(),
		),
	};
	json!({
		"type": geometry.type_as_str(),
		"coordinates": coordinates,
	})
}

fn pair(c: &Coordinates) -> Value {
	json!([c.x(), c.y()])
}

fn pairs(line: &[Coordinates]) -> Value {
	Value::Array(line.iter().map(pair).collect())
}

fn value_to_json(value: &GeoValue) -> Value {
	match value {
		GeoValue::String(s) => Value::String(s.clone()),
		GeoValue::Double(d) => json!(d),
		GeoValue::Int(i) => json!(i),
		GeoValue::Bool(b) => Value::Bool(*b),
		GeoValue::Null => Value::Null,
	}
}
