//! Ingestion controller.
//!
//! Validates a raw upload, dispatches it to the right format parser,
//! reprojects the result and registers it as a new layer. Processing is
//! single-flight: while one ingestion is in progress any further call
//! fails immediately with [`IngestError::Busy`] instead of queueing,
//! which keeps the registry and the map collaborator free of interleaved
//! partial mutations.

use crate::{
	error::{IngestError, MAX_UPLOAD_BYTES},
	formats::FileKind,
	registry::{LayerId, LayerRegistry},
	reproject::{CoordinateProfile, reproject_owned},
};
use geolayers_geometry::FeatureCollection;
use std::{
	path::Path,
	sync::atomic::{AtomicBool, Ordering},
};

/// A user-supplied file at the system boundary: the payload, the declared
/// filename (its extension drives dispatch) and the declared size.
/// Discarded once parsing completes or fails.
#[derive(Clone, Debug)]
pub struct RawUpload {
	pub file_name: String,
	pub payload: Vec<u8>,
	pub size: usize,
}

impl RawUpload {
	#[must_use]
	pub fn new(file_name: &str, payload: Vec<u8>) -> Self {
		Self {
			file_name: file_name.to_string(),
			size: payload.len(),
			payload,
		}
	}

	/// Read an upload from disk, suspending until the bytes are available.
	pub async fn from_path(path: &Path) -> Result<Self, IngestError> {
		let payload = tokio::fs::read(path).await?;
		let file_name = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default();
		Ok(Self::new(&file_name, payload))
	}
}

/// Clears the busy flag when dropped, so no error path can leave the
/// pipeline permanently locked.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

/// The single-flight ingestion pipeline.
#[derive(Debug, Default)]
pub struct IngestPipeline {
	busy: AtomicBool,
}

impl IngestPipeline {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn is_busy(&self) -> bool {
		self.busy.load(Ordering::Acquire)
	}

	fn acquire(&self) -> Result<BusyGuard<'_>, IngestError> {
		self
			.busy
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.map_err(|_| IngestError::Busy)?;
		Ok(BusyGuard(&self.busy))
	}

	/// Ingest an upload and register it as a new layer.
	pub fn ingest(
		&self,
		upload: &RawUpload,
		profile: CoordinateProfile,
		registry: &mut LayerRegistry,
	) -> Result<LayerId, IngestError> {
		let _guard = self.acquire()?;
		let collection = parse_and_reproject(upload, profile)?;
		Ok(registry.add(collection, &upload.file_name))
	}

	/// Read a file from disk and ingest it. The asynchronous read happens
	/// inside the busy window.
	pub async fn ingest_path(
		&self,
		path: &Path,
		profile: CoordinateProfile,
		registry: &mut LayerRegistry,
	) -> Result<LayerId, IngestError> {
		let _guard = self.acquire()?;
		let upload = RawUpload::from_path(path).await?;
		let collection = parse_and_reproject(&upload, profile)?;
		Ok(registry.add(collection, &upload.file_name))
	}

	/// Validate, parse and reproject without registering, for inspection.
	pub fn inspect(
		&self,
		upload: &RawUpload,
		profile: CoordinateProfile,
	) -> Result<FeatureCollection, IngestError> {
		let _guard = self.acquire()?;
		parse_and_reproject(upload, profile)
	}
}

/// The validation-through-reprojection stages shared by every entry
/// point. Preconditions fail fast, in order: emptiness, size, extension.
fn parse_and_reproject(
	upload: &RawUpload,
	profile: CoordinateProfile,
) -> Result<FeatureCollection, IngestError> {
	if upload.size == 0 {
		return Err(IngestError::EmptyFile);
	}
	if upload.size > MAX_UPLOAD_BYTES {
		return Err(IngestError::FileTooLarge {
			size: upload.size,
			max: MAX_UPLOAD_BYTES,
		});
	}
	let kind = FileKind::from_file_name(&upload.file_name).ok_or_else(|| {
		IngestError::UnsupportedExtension {
			extension: extension_of(&upload.file_name),
		}
	})?;

	let collection = kind.parse(&upload.payload)?;

	// A byte-level parse can succeed and still carry nothing to show.
	if collection.is_empty() {
		return Err(IngestError::NoGeometry);
	}

	Ok(reproject_owned(collection, profile))
}

fn extension_of(file_name: &str) -> String {
	file_name
		.rsplit('.')
		.next()
		.unwrap_or(file_name)
		.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::renderer::NoopRenderer;
	use geolayers_geometry::Geometry;

	fn registry() -> LayerRegistry {
		LayerRegistry::new(Box::<NoopRenderer>::default())
	}

	fn geojson_upload(name: &str, features: usize) -> RawUpload {
		let features = (0..features)
			.map(|i| {
				format!(
					r#"{{"type": "Feature", "properties": {{"n": {i}}}, "geometry": {{"type": "Point", "coordinates": [{i}.5, -1.25]}}}}"#
				)
			})
			.collect::<Vec<_>>()
			.join(",");
		let body = format!(r#"{{"type": "FeatureCollection", "features": [{features}]}}"#);
		RawUpload::new(name, body.into_bytes())
	}

	#[test]
	fn empty_file_is_rejected_and_registry_unchanged() {
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let result = pipeline.ingest(&RawUpload::new("empty.geojson", Vec::new()), CoordinateProfile::Wgs84, &mut registry);
		assert!(matches!(result, Err(IngestError::EmptyFile)));
		assert!(registry.is_empty());
	}

	#[test]
	fn oversized_file_is_rejected() {
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let upload = RawUpload::new("big.geojson", vec![b'x'; MAX_UPLOAD_BYTES + 1]);
		let result = pipeline.ingest(&upload, CoordinateProfile::Wgs84, &mut registry);
		assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
	}

	#[test]
	fn unsupported_extension_is_rejected_before_parsing() {
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let upload = RawUpload::new("drawing.svg", b"<svg/>".to_vec());
		let result = pipeline.ingest(&upload, CoordinateProfile::Wgs84, &mut registry);
		let Err(IngestError::UnsupportedExtension { extension }) = result else {
			panic!("expected UnsupportedExtension");
		};
		assert_eq!(extension, "svg");
	}

	#[test]
	fn second_ingest_while_busy_is_rejected() {
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let guard = pipeline.acquire().unwrap();
		assert!(pipeline.is_busy());

		let result = pipeline.ingest(&geojson_upload("a.geojson", 1), CoordinateProfile::Wgs84, &mut registry);
		assert!(matches!(result, Err(IngestError::Busy)));
		assert!(registry.is_empty());

		// Releasing the guard unblocks the next ingestion.
		drop(guard);
		assert!(!pipeline.is_busy());
		pipeline
			.ingest(&geojson_upload("a.geojson", 1), CoordinateProfile::Wgs84, &mut registry)
			.unwrap();
		assert_eq!(registry.len(), 1);
	}

	#[test]
	fn failed_ingest_clears_the_busy_flag() {
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let result = pipeline.ingest(&RawUpload::new("nope.geojson", b"{}".to_vec()), CoordinateProfile::Wgs84, &mut registry);
		assert!(result.is_err());
		assert!(!pipeline.is_busy());
	}

	#[test]
	fn passthrough_round_trip_preserves_count_and_coordinates() {
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let id = pipeline
			.ingest(&geojson_upload("grid.GeoJSON", 3), CoordinateProfile::Wgs84, &mut registry)
			.unwrap();
		let layer = registry.get(id).unwrap();
		assert_eq!(layer.feature_count, 3);
		assert_eq!(
			layer.collection.features[2].geometry,
			Geometry::new_point([2.5, -1.25])
		);
	}

	#[test]
	fn empty_collection_is_no_geometry() {
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let result = pipeline.ingest(&geojson_upload("empty.json", 0), CoordinateProfile::Wgs84, &mut registry);
		assert!(matches!(result, Err(IngestError::NoGeometry)));
		assert!(registry.is_empty());
	}

	#[test]
	fn dxf_upload_lands_as_polygon_layer() {
		let text = [
			"0", "LWPOLYLINE", "8", "Parcels", "70", "1", //
			"10", "0", "20", "0", "10", "10", "20", "0", "10", "10", "20", "10", //
			"0", "EOF",
		]
		.join("\n");
		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let id = pipeline
			.ingest(&RawUpload::new("plan.DXF", text.into_bytes()), CoordinateProfile::Wgs84, &mut registry)
			.unwrap();
		let layer = registry.get(id).unwrap();
		assert_eq!(layer.collection.features[0].geometry.type_as_str(), "Polygon");
	}

	#[test]
	fn inspect_reprojects_without_registering() {
		let pipeline = IngestPipeline::new();
		let collection = pipeline
			.inspect(&geojson_upload("grid.geojson", 2), CoordinateProfile::Wgs84)
			.unwrap();
		assert_eq!(collection.len(), 2);
		assert!(!pipeline.is_busy());
	}

	#[tokio::test]
	async fn ingest_path_reads_the_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("upload.geojson");
		std::fs::write(&path, geojson_upload("upload.geojson", 2).payload).unwrap();

		let pipeline = IngestPipeline::new();
		let mut registry = registry();
		let id = pipeline
			.ingest_path(&path, CoordinateProfile::Wgs84, &mut registry)
			.await
			.unwrap();
		assert_eq!(registry.get(id).unwrap().feature_count, 2);
		assert_eq!(registry.get(id).unwrap().name, "upload.geojson");
	}
}
