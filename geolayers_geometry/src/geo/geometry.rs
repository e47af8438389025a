use super::GeoBBox;
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A single x/y coordinate pair, the leaf of every coordinate tree.
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates([f64; 2]);

impl Coordinates {
	#[must_use]
	pub fn new(x: f64, y: f64) -> Self {
		Self([x, y])
	}

	#[must_use]
	pub fn x(&self) -> f64 {
		self.0[0]
	}

	#[must_use]
	pub fn y(&self) -> f64 {
		self.0[1]
	}

	pub fn set(&mut self, x: f64, y: f64) {
		self.0 = [x, y];
	}
}

impl From<[f64; 2]> for Coordinates {
	fn from(value: [f64; 2]) -> Self {
		Coordinates(value)
	}
}

impl From<(f64, f64)> for Coordinates {
	fn from(value: (f64, f64)) -> Self {
		Coordinates([value.0, value.1])
	}
}

impl From<Coordinates> for [f64; 2] {
	fn from(value: Coordinates) -> Self {
		value.0
	}
}

impl Debug for Coordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

/// Tagged geometry of a feature.
///
/// The nesting depth of the coordinate arrays is fixed per variant:
/// a point holds one pair, line strings and multi points hold a list of
/// pairs, polygons hold a list of linear rings, and the multi forms add
/// one level each.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(Coordinates),
	MultiPoint(Vec<Coordinates>),
	LineString(Vec<Coordinates>),
	MultiLineString(Vec<Vec<Coordinates>>),
	Polygon(Vec<Vec<Coordinates>>),
	MultiPolygon(Vec<Vec<Vec<Coordinates>>>),
}

impl Geometry {
	pub fn new_point<T: Into<Coordinates>>(value: T) -> Self {
		Self::Point(value.into())
	}

	pub fn new_line_string<T: Into<Coordinates>>(value: Vec<T>) -> Self {
		Self::LineString(value.into_iter().map(Into::into).collect())
	}

	pub fn new_polygon<T: Into<Coordinates>>(value: Vec<Vec<T>>) -> Self {
		Self::Polygon(
			value
				.into_iter()
				.map(|ring| ring.into_iter().map(Into::into).collect())
				.collect(),
		)
	}

	pub fn new_multi_polygon<T: Into<Coordinates>>(value: Vec<Vec<Vec<T>>>) -> Self {
		Self::MultiPolygon(
			value
				.into_iter()
				.map(|polygon| {
					polygon
						.into_iter()
						.map(|ring| ring.into_iter().map(Into::into).collect())
						.collect()
				})
				.collect(),
		)
	}

	#[must_use]
	pub fn type_as_str(&self) -> &str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::LineString(_) => "LineString",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPolygon(_) => "MultiPolygon",
		}
	}

	/// Apply `f` to every coordinate pair, walking the tree depth-first.
	pub fn map_coords<F>(&mut self, f: &mut F)
	where
		F: FnMut(&mut Coordinates),
	{
		match self {
			Geometry::Point(c) => f(c),
			Geometry::MultiPoint(line) | Geometry::LineString(line) => {
				line.iter_mut().for_each(&mut *f);
			}
			Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
				for line in lines {
					line.iter_mut().for_each(&mut *f);
				}
			}
			Geometry::MultiPolygon(polygons) => {
				for polygon in polygons {
					for ring in polygon {
						ring.iter_mut().for_each(&mut *f);
					}
				}
			}
		}
	}

	/// Visit every coordinate pair without mutating.
	pub fn for_each_coord<F>(&self, f: &mut F)
	where
		F: FnMut(&Coordinates),
	{
		match self {
			Geometry::Point(c) => f(c),
			Geometry::MultiPoint(line) | Geometry::LineString(line) => {
				line.iter().for_each(&mut *f);
			}
			Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
				for line in lines {
					line.iter().for_each(&mut *f);
				}
			}
			Geometry::MultiPolygon(polygons) => {
				for polygon in polygons {
					for ring in polygon {
						ring.iter().for_each(&mut *f);
					}
				}
			}
		}
	}

	/// Check minimal structural well-formedness: every variant must hold
	/// coordinates, line strings need at least 2 points, and polygon rings
	/// must be closed with at least 4 points.
	pub fn verify(&self) -> Result<()> {
		fn verify_ring(ring: &[Coordinates]) -> Result<()> {
			ensure!(ring.len() >= 4, "ring must have at least 4 points");
			ensure!(ring.first() == ring.last(), "ring must be closed");
			Ok(())
		}

		match self {
			Geometry::Point(_) => Ok(()),
			Geometry::MultiPoint(points) => {
				ensure!(!points.is_empty(), "MultiPoint must not be empty");
				Ok(())
			}
			Geometry::LineString(line) => {
				ensure!(line.len() >= 2, "LineString must have at least 2 points");
				Ok(())
			}
			Geometry::MultiLineString(lines) => {
				ensure!(!lines.is_empty(), "MultiLineString must not be empty");
				for line in lines {
					ensure!(line.len() >= 2, "LineString must have at least 2 points");
				}
				Ok(())
			}
			Geometry::Polygon(rings) => {
				ensure!(!rings.is_empty(), "Polygon must have at least one ring");
				rings.iter().try_for_each(|r| verify_ring(r))
			}
			Geometry::MultiPolygon(polygons) => {
				ensure!(!polygons.is_empty(), "MultiPolygon must not be empty");
				for rings in polygons {
					ensure!(!rings.is_empty(), "Polygon must have at least one ring");
					rings.iter().try_for_each(|r| verify_ring(r))?;
				}
				Ok(())
			}
		}
	}

	/// Bounding box over every coordinate of this geometry.
	#[must_use]
	pub fn bbox(&self) -> GeoBBox {
		let mut bbox = GeoBBox::new_empty();
		self.for_each_coord(&mut |c| bbox.include_point(c.x(), c.y()));
		bbox
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let (type_name, inner): (&str, &dyn Debug) = match self {
			Geometry::Point(g) => ("Point", g),
			Geometry::MultiPoint(g) => ("MultiPoint", g),
			Geometry::LineString(g) => ("LineString", g),
			Geometry::MultiLineString(g) => ("MultiLineString", g),
			Geometry::Polygon(g) => ("Polygon", g),
			Geometry::MultiPolygon(g) => ("MultiPolygon", g),
		};
		f.debug_tuple(type_name).field(inner).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn map_coords_visits_every_leaf() {
		let mut geometry = Geometry::new_multi_polygon(vec![vec![
			vec![[0.0, 0.0], [5.0, 0.0], [2.5, 4.0], [0.0, 0.0]],
			vec![[2.0, 1.0], [2.5, 2.0], [3.0, 1.0], [2.0, 1.0]],
		]]);
		let mut count = 0;
		geometry.map_coords(&mut |c| {
			c.set(c.x() + 1.0, c.y());
			count += 1;
		});
		assert_eq!(count, 8);
		let bbox = geometry.bbox();
		assert_eq!(bbox.x_min(), 1.0);
		assert_eq!(bbox.x_max(), 6.0);
	}

	#[test]
	fn verify_accepts_closed_ring() {
		let geometry = Geometry::new_polygon(vec![vec![
			[0.0, 0.0],
			[10.0, 0.0],
			[10.0, 10.0],
			[0.0, 0.0],
		]]);
		assert!(geometry.verify().is_ok());
	}

	#[test]
	fn verify_rejects_open_ring() {
		let geometry = Geometry::new_polygon(vec![vec![
			[0.0, 0.0],
			[10.0, 0.0],
			[10.0, 10.0],
			[0.0, 1.0],
		]]);
		assert!(geometry.verify().is_err());
	}

	#[test]
	fn verify_rejects_short_line() {
		let geometry = Geometry::new_line_string(vec![[0.0, 0.0]]);
		assert!(geometry.verify().is_err());
	}
}
