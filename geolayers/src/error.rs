//! Error taxonomy of the ingestion pipeline.
//!
//! Every fatal failure aborts the current ingestion and surfaces one of
//! these kinds; none of them crash the process. Per-coordinate transform
//! failures are deliberately absent: they are logged and swallowed by the
//! reprojector, which retains the original pair.

use thiserror::Error;

/// Maximum accepted upload payload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Failures of a single format parser.
#[derive(Debug, Error)]
pub enum ParseError {
	/// The external shapefile decoder rejected the bundle.
	#[error("failed to decode shapefile bundle: {0}")]
	ExternalDecodeFailed(String),

	/// The DXF stream contained no emittable entity.
	#[error("no valid geometry found, the DXF must contain LWPOLYLINE or LINE entities")]
	NoValidGeometry,

	/// The GeoJSON payload failed a structural check.
	#[error("invalid GeoJSON: {0}")]
	InvalidGeoJson(String),
}

/// Failures of the ingestion controller.
#[derive(Debug, Error)]
pub enum IngestError {
	#[error("file is empty")]
	EmptyFile,

	#[error("file is too large: {size} bytes (maximum {max} bytes)")]
	FileTooLarge { size: usize, max: usize },

	#[error("unsupported file extension '{extension}', use .zip, .dxf, .geojson or .json")]
	UnsupportedExtension { extension: String },

	/// Another ingestion is already in flight; concurrent calls are
	/// rejected, not queued.
	#[error("another upload is still being processed")]
	Busy,

	/// The parser succeeded but produced an empty collection.
	#[error("file does not contain any displayable geometry")]
	NoGeometry,

	#[error(transparent)]
	Parse(#[from] ParseError),

	#[error("failed to read file: {0}")]
	Io(#[from] std::io::Error),
}

impl IngestError {
	/// Short message suitable for direct display to the user.
	#[must_use]
	pub fn user_message(&self) -> String {
		match self {
			Self::FileTooLarge { max, .. } => {
				format!("File is too large, the maximum is {} MB.", max / 1024 / 1024)
			}
			Self::Busy => "A previous upload is still being processed, please wait.".to_string(),
			other => other.to_string(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_valid_geometry_names_supported_entities() {
		let message = ParseError::NoValidGeometry.to_string();
		assert!(message.contains("LWPOLYLINE"));
		assert!(message.contains("LINE"));
	}

	#[test]
	fn too_large_user_message_is_in_megabytes() {
		let error = IngestError::FileTooLarge {
			size: MAX_UPLOAD_BYTES + 1,
			max: MAX_UPLOAD_BYTES,
		};
		assert!(error.user_message().contains("10 MB"));
	}
}
