use super::{GeoProperties, GeoValue, Geometry};
use std::fmt::Debug;

/// A single geometry plus its named attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFeature {
	pub geometry: Geometry,
	pub properties: GeoProperties,
}

impl GeoFeature {
	#[must_use]
	pub fn new(geometry: Geometry) -> Self {
		Self {
			geometry,
			properties: GeoProperties::new(),
		}
	}

	pub fn set_properties(&mut self, properties: GeoProperties) {
		self.properties = properties;
	}

	pub fn set_property<T>(&mut self, key: &str, value: T)
	where
		GeoValue: From<T>,
	{
		self.properties.insert(key.to_string(), GeoValue::from(value));
	}
}
