//! Seam to the external map rendering collaborator.
//!
//! The registry never draws anything itself; it hands each ingested
//! collection to a [`MapRenderer`] and keeps the opaque handle the
//! renderer minted. Registry mutations (add, toggle, delete) reach the
//! renderer through these calls.

use geolayers_geometry::{FeatureCollection, GeoBBox};

/// Opaque token for a renderable layer, minted by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderHandle(pub u64);

pub trait MapRenderer {
	/// Build the renderable representation of a collection and attach it
	/// to the map. Created layers start visible.
	fn create_layer(&mut self, name: &str, collection: &FeatureCollection) -> RenderHandle;

	/// Put a detached layer back on the map.
	fn attach_layer(&mut self, handle: RenderHandle);

	/// Take a layer off the map, keeping its resources.
	fn detach_layer(&mut self, handle: RenderHandle);

	/// Release every resource of a layer. The handle is dead afterwards.
	fn release_layer(&mut self, handle: RenderHandle);

	/// Move the viewport to the given bounds. Callers only pass
	/// well-formed bounds.
	fn fit_bounds(&mut self, bounds: &GeoBBox);
}

/// Renderer for headless use: counts handles, draws nothing.
#[derive(Debug, Default)]
pub struct NoopRenderer {
	next_handle: u64,
}

impl MapRenderer for NoopRenderer {
	fn create_layer(&mut self, _name: &str, _collection: &FeatureCollection) -> RenderHandle {
		self.next_handle += 1;
		RenderHandle(self.next_handle)
	}

	fn attach_layer(&mut self, _handle: RenderHandle) {}
	fn detach_layer(&mut self, _handle: RenderHandle) {}
	fn release_layer(&mut self, _handle: RenderHandle) {}
	fn fit_bounds(&mut self, _bounds: &GeoBBox) {}
}
