use crate::geo::{Coordinates, FeatureCollection, GeoFeature, GeoProperties, GeoValue, Geometry};
use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;

/// Parse GeoJSON text into a [`FeatureCollection`].
///
/// Structural checks are minimal: the root must carry a `type` field, and
/// a `FeatureCollection` must carry a `features` array. A single `Feature`
/// or a bare geometry object is accepted as a one-feature collection.
/// Features without a geometry are skipped.
pub fn parse_geojson(json: &str) -> Result<FeatureCollection> {
	let root: Value = serde_json::from_str(json).context("invalid JSON")?;
	let object = root.as_object().ok_or_else(|| anyhow!("root must be an object"))?;
	let object_type = object
		.get("type")
		.ok_or_else(|| anyhow!("missing 'type' field"))?
		.as_str()
		.ok_or_else(|| anyhow!("'type' must be a string"))?;

	match object_type {
		"FeatureCollection" => {
			let features = object
				.get("features")
				.ok_or_else(|| anyhow!("missing 'features' field"))?
				.as_array()
				.ok_or_else(|| anyhow!("'features' must be an array"))?;
			let mut parsed = Vec::new();
			for feature in features {
				if let Some(feature) = parse_feature(feature)? {
					parsed.push(feature);
				}
			}
			Ok(FeatureCollection::from(parsed))
		}
		"Feature" => {
			let features = parse_feature(&root)?.into_iter().collect();
			Ok(FeatureCollection::from(features))
		}
		"Point" | "MultiPoint" | "LineString" | "MultiLineString" | "Polygon" | "MultiPolygon" => {
			let feature = GeoFeature::new(parse_geometry(&root)?);
			Ok(FeatureCollection::from(vec![feature]))
		}
		other => bail!("unsupported GeoJSON type '{other}'"),
	}
}

fn parse_feature(value: &Value) -> Result<Option<GeoFeature>> {
	let object = value
		.as_object()
		.ok_or_else(|| anyhow!("feature must be an object"))?;

	// Features without a geometry carry nothing to display.
	let geometry = match object.get("geometry") {
		None | Some(Value::Null) => return Ok(None),
		Some(geometry) => parse_geometry(geometry)?,
	};

	let mut feature = GeoFeature::new(geometry);
	if let Some(Value::Object(properties)) = object.get("properties") {
		let mut parsed = GeoProperties::new();
		for (key, value) in properties {
			parsed.insert(key.clone(), parse_property_value(value));
		}
		feature.set_properties(parsed);
	}
	Ok(Some(feature))
}

fn parse_geometry(value: &Value) -> Result<Geometry> {
	let object = value
		.as_object()
		.ok_or_else(|| anyhow!("geometry must be an object"))?;
	let geometry_type = object
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| anyhow!("geometry is missing 'type'"))?;
	let coordinates = object
		.get("coordinates")
		.ok_or_else(|| anyhow!("geometry is missing 'coordinates'"))?;

	Ok(match geometry_type {
		"Point" => Geometry::Point(parse_pair(coordinates)?),
		"MultiPoint" => Geometry::MultiPoint(parse_pairs(coordinates)?),
		"LineString" => Geometry::LineString(parse_pairs(coordinates)?),
		"MultiLineString" => Geometry::MultiLineString(parse_lines(coordinates)?),
		"Polygon" => Geometry::Polygon(parse_lines(coordinates)?),
		"MultiPolygon" => Geometry::MultiPolygon(
			coordinates
				.as_array()
				.ok_or_else(|| anyhow!("MultiPolygon coordinates must be an array"))?
				.iter()
				.map(parse_lines)
				.collect::<Result<Vec<_>>>()?,
		),
		other => bail!("unsupported geometry type '{other}'"),
	})
}

/// A leaf pair. Additional ordinates (elevation) are ignored.
fn parse_pair(value: &Value) -> Result<Coordinates> {
	let pair = value
		.as_array()
		.ok_or_else(|| anyhow!("coordinates must be an array"))?;
	if pair.len() < 2 {
		bail!("coordinate pair must have at least 2 values");
	}
	let x = pair[0].as_f64().ok_or_else(|| anyhow!("x must be a number"))?;
	let y = pair[1].as_f64().ok_or_else(|| anyhow!("y must be a number"))?;
	Ok(Coordinates::new(x, y))
}

fn parse_pairs(value: &Value) -> Result<Vec<Coordinates>> {
	value
		.as_array()
		.ok_or_else(|| anyhow!("coordinates must be an array"))?
		.iter()
		.map(parse_pair)
		.collect()
}

fn parse_lines(value: &Value) -> Result<Vec<Vec<Coordinates>>> {
	value
		.as_array()
		.ok_or_else(|| anyhow!("coordinates must be an array"))?
		.iter()
		.map(parse_pairs)
		.collect()
}

/// Attributes are scalar; nested arrays and objects keep their JSON text.
fn parse_property_value(value: &Value) -> GeoValue {
	match value {
		Value::Null => GeoValue::Null,
		Value::Bool(b) => GeoValue::Bool(*b),
		Value::Number(n) => n
			.as_i64()
			.map_or_else(|| GeoValue::Double(n.as_f64().unwrap_or(f64::NAN)), GeoValue::Int),
		Value::String(s) => GeoValue::String(s.clone()),
		nested => GeoValue::String(nested.to_string()),
	}
}
