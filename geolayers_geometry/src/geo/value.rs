use std::fmt::{Debug, Display};

/// Scalar attribute value attached to a feature.
///
/// Uploads carry attributes from three sources (dBase records, DXF layer
/// names, GeoJSON properties), all of which reduce to these variants.
#[derive(Clone, PartialEq)]
pub enum GeoValue {
	Bool(bool),
	Double(f64),
	Int(i64),
	Null,
	String(String),
}

impl Debug for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::String(v) => f.debug_tuple("String").field(v).finish(),
			Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
			Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
			Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
			Self::Null => f.debug_tuple("Null").finish(),
		}
	}
}

impl Display for GeoValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::String(v) => write!(f, "{v}"),
			Self::Double(v) => write!(f, "{v}"),
			Self::Int(v) => write!(f, "{v}"),
			Self::Bool(v) => write!(f, "{v}"),
			Self::Null => write!(f, "null"),
		}
	}
}

impl From<&str> for GeoValue {
	fn from(value: &str) -> Self {
		GeoValue::String(value.to_string())
	}
}

impl From<String> for GeoValue {
	fn from(value: String) -> Self {
		GeoValue::String(value)
	}
}

impl From<&String> for GeoValue {
	fn from(value: &String) -> Self {
		GeoValue::String(value.clone())
	}
}

impl From<f64> for GeoValue {
	fn from(value: f64) -> Self {
		GeoValue::Double(value)
	}
}

impl From<f32> for GeoValue {
	fn from(value: f32) -> Self {
		GeoValue::Double(f64::from(value))
	}
}

impl From<i64> for GeoValue {
	fn from(value: i64) -> Self {
		GeoValue::Int(value)
	}
}

impl From<i32> for GeoValue {
	fn from(value: i32) -> Self {
		GeoValue::Int(i64::from(value))
	}
}

impl From<bool> for GeoValue {
	fn from(value: bool) -> Self {
		GeoValue::Bool(value)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn conversions() {
		assert_eq!(GeoValue::from("road"), GeoValue::String("road".to_string()));
		assert_eq!(GeoValue::from(42i64), GeoValue::Int(42));
		assert_eq!(GeoValue::from(1.5f64), GeoValue::Double(1.5));
		assert_eq!(GeoValue::from(true), GeoValue::Bool(true));
	}

	#[test]
	fn display() {
		assert_eq!(GeoValue::from("a").to_string(), "a");
		assert_eq!(GeoValue::Null.to_string(), "null");
		assert_eq!(GeoValue::Int(-3).to_string(), "-3");
	}
}
