use super::GeoValue;
use std::{
	collections::{BTreeMap, btree_map},
	fmt::Debug,
};

/// Attribute map of a feature, ordered by attribute name.
#[derive(Clone, Default, PartialEq)]
pub struct GeoProperties {
	properties: BTreeMap<String, GeoValue>,
}

impl GeoProperties {
	#[must_use]
	pub fn new() -> GeoProperties {
		GeoProperties {
			properties: BTreeMap::new(),
		}
	}

	pub fn insert(&mut self, key: String, value: GeoValue) {
		self.properties.insert(key, value);
	}

	#[must_use]
	pub fn get(&self, key: &str) -> Option<&GeoValue> {
		self.properties.get(key)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.properties.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, GeoValue> {
		self.properties.iter()
	}

	/// Attribute names in map order.
	pub fn keys(&self) -> impl Iterator<Item = &String> {
		self.properties.keys()
	}
}

impl IntoIterator for GeoProperties {
	type Item = (String, GeoValue);
	type IntoIter = btree_map::IntoIter<String, GeoValue>;
	fn into_iter(self) -> Self::IntoIter {
		self.properties.into_iter()
	}
}

impl From<Vec<(&str, GeoValue)>> for GeoProperties {
	fn from(value: Vec<(&str, GeoValue)>) -> Self {
		GeoProperties {
			properties: value.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
		}
	}
}

impl Debug for GeoProperties {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.properties.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_and_get() {
		let mut props = GeoProperties::new();
		assert!(props.is_empty());
		props.insert("layer".to_string(), GeoValue::from("Default"));
		assert_eq!(props.get("layer"), Some(&GeoValue::from("Default")));
		assert_eq!(props.len(), 1);
	}

	#[test]
	fn from_pairs_is_ordered() {
		let props = GeoProperties::from(vec![
			("b", GeoValue::from(2i64)),
			("a", GeoValue::from(1i64)),
		]);
		let keys = props.keys().cloned().collect::<Vec<_>>();
		assert_eq!(keys, vec!["a", "b"]);
	}
}
