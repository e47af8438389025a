use std::fmt::Debug;

/// Axis-aligned bounding box in layer coordinates.
///
/// Starts out inverted (empty) so that including the first point
/// initializes all four edges. An empty or non-finite box reports
/// `is_valid() == false`, which callers use to skip viewport fitting.
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox {
	x_min: f64,
	y_min: f64,
	x_max: f64,
	y_max: f64,
}

impl GeoBBox {
	#[must_use]
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
		Self {
			x_min,
			y_min,
			x_max,
			y_max,
		}
	}

	#[must_use]
	pub fn new_empty() -> Self {
		Self {
			x_min: f64::INFINITY,
			y_min: f64::INFINITY,
			x_max: f64::NEG_INFINITY,
			y_max: f64::NEG_INFINITY,
		}
	}

	pub fn include_point(&mut self, x: f64, y: f64) {
		self.x_min = self.x_min.min(x);
		self.y_min = self.y_min.min(y);
		self.x_max = self.x_max.max(x);
		self.y_max = self.y_max.max(y);
	}

	pub fn include_bbox(&mut self, other: &GeoBBox) {
		self.x_min = self.x_min.min(other.x_min);
		self.y_min = self.y_min.min(other.y_min);
		self.x_max = self.x_max.max(other.x_max);
		self.y_max = self.y_max.max(other.y_max);
	}

	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.x_min.is_finite()
			&& self.y_min.is_finite()
			&& self.x_max.is_finite()
			&& self.y_max.is_finite()
			&& self.x_min <= self.x_max
			&& self.y_min <= self.y_max
	}

	#[must_use]
	pub fn x_min(&self) -> f64 {
		self.x_min
	}

	#[must_use]
	pub fn y_min(&self) -> f64 {
		self.y_min
	}

	#[must_use]
	pub fn x_max(&self) -> f64 {
		self.x_max
	}

	#[must_use]
	pub fn y_max(&self) -> f64 {
		self.y_max
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"GeoBBox[{}, {}, {}, {}]",
			self.x_min, self.y_min, self.x_max, self.y_max
		)
	}
}
