use super::{GeoBBox, GeoFeature};
use crate::geojson::{collection_to_json, parse_geojson};
use anyhow::Result;

/// Ordered group of features treated as one layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
	pub features: Vec<GeoFeature>,
}

impl FeatureCollection {
	#[must_use]
	pub fn from(features: Vec<GeoFeature>) -> Self {
		Self { features }
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.features.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.features.is_empty()
	}

	pub fn from_json_str(json_str: &str) -> Result<Self> {
		parse_geojson(json_str)
	}

	#[must_use]
	pub fn to_json_string(&self) -> String {
		collection_to_json(self).to_string()
	}

	/// Bounding box over every feature, for viewport fitting.
	/// Empty collections yield an invalid box.
	#[must_use]
	pub fn bbox(&self) -> GeoBBox {
		let mut bbox = GeoBBox::new_empty();
		for feature in &self.features {
			bbox.include_bbox(&feature.geometry.bbox());
		}
		bbox
	}
}
