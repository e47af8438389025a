//! Registry of successfully ingested layers.
//!
//! Owns every uploaded layer, its visibility and its renderable handle.
//! Identifiers grow monotonically and are never reused, even after a
//! delete. Operations on an unknown identifier are logged and ignored:
//! under single-flight ingestion the UI cannot race ahead of the
//! registry, but the guard stays in place.

use crate::renderer::{MapRenderer, RenderHandle};
use geolayers_geometry::FeatureCollection;

/// Identifier of an uploaded layer, unique for the registry's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LayerId(u64);

impl std::fmt::Display for LayerId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "layer-{}", self.0)
	}
}

/// A registered upload: the normalized collection plus its presentation
/// state.
pub struct UploadedLayer {
	pub id: LayerId,
	pub name: String,
	pub feature_count: usize,
	pub visible: bool,
	handle: RenderHandle,
	pub collection: FeatureCollection,
}

pub struct LayerRegistry {
	layers: Vec<UploadedLayer>,
	next_id: u64,
	renderer: Box<dyn MapRenderer>,
}

impl LayerRegistry {
	#[must_use]
	pub fn new(renderer: Box<dyn MapRenderer>) -> Self {
		Self {
			layers: Vec::new(),
			next_id: 0,
			renderer,
		}
	}

	/// Register a collection as a new visible layer and return its
	/// identifier. The viewport is fitted to the layer's bounds when they
	/// are well-formed; malformed bounds skip the fit silently.
	pub fn add(&mut self, collection: FeatureCollection, name: &str) -> LayerId {
		self.next_id += 1;
		let id = LayerId(self.next_id);

		let handle = self.renderer.create_layer(name, &collection);
		let bounds = collection.bbox();
		if bounds.is_valid() {
			self.renderer.fit_bounds(&bounds);
		} else {
			log::warn!("not fitting viewport to '{name}': bounds are not well-formed");
		}

		self.layers.push(UploadedLayer {
			id,
			name: name.to_string(),
			feature_count: collection.len(),
			visible: true,
			handle,
			collection,
		});
		log::debug!("added {id} ('{name}')");
		id
	}

	/// Flip a layer's visibility. Hiding detaches the renderable but
	/// keeps the layer's data and registry entry.
	pub fn toggle(&mut self, id: LayerId) {
		let Some(layer) = self.layers.iter_mut().find(|layer| layer.id == id) else {
			log::warn!("toggle on unknown {id}, ignored");
			return;
		};
		if layer.visible {
			self.renderer.detach_layer(layer.handle);
			layer.visible = false;
		} else {
			self.renderer.attach_layer(layer.handle);
			layer.visible = true;
		}
	}

	/// Remove a layer and release its renderable resources. Asking the
	/// user for confirmation is the caller's concern. The identifier is
	/// never reused.
	pub fn delete(&mut self, id: LayerId) {
		let Some(index) = self.layers.iter().position(|layer| layer.id == id) else {
			log::warn!("delete on unknown {id}, ignored");
			return;
		};
		let layer = self.layers.remove(index);
		if layer.visible {
			self.renderer.detach_layer(layer.handle);
		}
		self.renderer.release_layer(layer.handle);
		log::debug!("deleted {id}");
	}

	/// Delete every layer. A no-op on an empty registry.
	pub fn clear(&mut self) {
		while let Some(layer) = self.layers.last() {
			let id = layer.id;
			self.delete(id);
		}
	}

	#[must_use]
	pub fn get(&self, id: LayerId) -> Option<&UploadedLayer> {
		self.layers.iter().find(|layer| layer.id == id)
	}

	pub fn layers(&self) -> impl Iterator<Item = &UploadedLayer> {
		self.layers.iter()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.layers.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}
}
