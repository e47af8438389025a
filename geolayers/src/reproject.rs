//! Coordinate reprojection into geographic WGS84.
//!
//! Uploads may arrive in one of two projected TM-3 zones; their
//! collections are transformed leaf by leaf into longitude/latitude.
//! The policy is best effort: a pair that fails to transform keeps its
//! original value and the traversal continues, so one bad vertex never
//! discards a whole upload.

use geolayers_geometry::FeatureCollection;
use proj4rs::proj::Proj;
use std::{borrow::Cow, fmt::Display, str::FromStr};

const WGS84_PROJ: &str = "+proj=longlat +ellps=WGS84 +no_defs";
const TM3_ZONE_501_PROJ: &str =
	"+proj=tmerc +lat_0=0 +lon_0=115.5 +k=0.9999 +x_0=200000 +y_0=1500000 +ellps=WGS84 +units=m +no_defs";
const TM3_ZONE_502_PROJ: &str =
	"+proj=tmerc +lat_0=0 +lon_0=118.5 +k=0.9999 +x_0=200000 +y_0=1500000 +ellps=WGS84 +units=m +no_defs";

/// Source coordinate reference system of an upload, selected by the user
/// before the file is handed over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordinateProfile {
	/// Geographic WGS84 (EPSG:4326), the target system; reprojection is
	/// a recognized no-op.
	#[default]
	Wgs84,
	/// Indonesian TM-3 zone 50.1 (EPSG:23837).
	Tm3Zone501,
	/// Indonesian TM-3 zone 50.2 (EPSG:23838).
	Tm3Zone502,
}

impl CoordinateProfile {
	/// Proj string of the source system, `None` for the passthrough.
	#[must_use]
	pub fn proj_string(&self) -> Option<&'static str> {
		match self {
			CoordinateProfile::Wgs84 => None,
			CoordinateProfile::Tm3Zone501 => Some(TM3_ZONE_501_PROJ),
			CoordinateProfile::Tm3Zone502 => Some(TM3_ZONE_502_PROJ),
		}
	}
}

impl Display for CoordinateProfile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			CoordinateProfile::Wgs84 => "wgs84",
			CoordinateProfile::Tm3Zone501 => "tm3-501",
			CoordinateProfile::Tm3Zone502 => "tm3-502",
		})
	}
}

impl FromStr for CoordinateProfile {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"wgs84" => Ok(CoordinateProfile::Wgs84),
			"tm3-501" => Ok(CoordinateProfile::Tm3Zone501),
			"tm3-502" => Ok(CoordinateProfile::Tm3Zone502),
			other => Err(format!("unknown coordinate system '{other}', use wgs84, tm3-501 or tm3-502")),
		}
	}
}

/// Reproject a collection from `profile` into geographic WGS84.
///
/// The passthrough profile returns the input by reference, with no copy.
/// Any other profile deep-copies first and mutates only the copy, so the
/// caller's collection stays numerically untouched. A projection that
/// cannot be constructed logs a warning and passes the input through
/// unchanged.
#[must_use]
pub fn reproject(collection: &FeatureCollection, profile: CoordinateProfile) -> Cow<'_, FeatureCollection> {
	let Some(proj_string) = profile.proj_string() else {
		return Cow::Borrowed(collection);
	};

	let (source, target) = match (Proj::from_proj_string(proj_string), Proj::from_proj_string(WGS84_PROJ)) {
		(Ok(source), Ok(target)) => (source, target),
		(Err(e), _) | (_, Err(e)) => {
			log::warn!("cannot build projection for {profile}, keeping source coordinates: {e}");
			return Cow::Borrowed(collection);
		}
	};

	let mut transformed = collection.clone();
	let mut failures = 0usize;
	for feature in &mut transformed.features {
		feature.geometry.map_coords(&mut |pair| {
			// Geographic output is in radians.
			let mut point = (pair.x(), pair.y(), 0.0);
			match proj4rs::transform::transform(&source, &target, &mut point) {
				Ok(()) => pair.set(point.0.to_degrees(), point.1.to_degrees()),
				Err(e) => {
					failures += 1;
					log::warn!("transform failed for ({}, {}): {e}", pair.x(), pair.y());
				}
			}
		});
	}
	if failures > 0 {
		log::warn!("{failures} coordinate pair(s) kept their original values");
	}
	Cow::Owned(transformed)
}

/// Ownership-taking variant used by the ingestion flow: the passthrough
/// moves the collection through without touching it.
#[must_use]
pub fn reproject_owned(collection: FeatureCollection, profile: CoordinateProfile) -> FeatureCollection {
	match reproject(&collection, profile) {
		Cow::Borrowed(_) => collection,
		Cow::Owned(transformed) => transformed,
	}
}
