use std::collections::BTreeMap;

use crate::descriptor::LayerDescriptor;

/// Proof that a caller began registering a layer id at a point in time.
///
/// Async producers capture a token before fetching, then apply the result
/// with [`LayerRegistry::upsert_if_current`]. If the id was removed or
/// re-registered in the meantime the apply is refused, so a late response
/// cannot resurrect a dead layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationToken {
    id: String,
    epoch: u64,
}

impl RegistrationToken {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Ordered layer set keyed by id.
///
/// Ordering contract:
/// - `list` yields layers in render order, background first.
/// - `upsert` of a known id keeps its position; new ids append on top.
#[derive(Debug, Clone, Default)]
pub struct LayerRegistry {
    entries: Vec<LayerDescriptor>,
    epochs: BTreeMap<String, u64>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&LayerDescriptor> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Layers in render order, background first.
    pub fn list(&self) -> &[LayerDescriptor] {
        &self.entries
    }

    /// Inserts `layer`, replacing any layer with the same id in place.
    ///
    /// Returns `true` when an existing layer was replaced. Outstanding
    /// tokens for the id stay current: refreshing content is not a change
    /// of ownership.
    pub fn upsert(&mut self, layer: LayerDescriptor) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == layer.id) {
            *existing = layer;
            true
        } else {
            self.entries.push(layer);
            false
        }
    }

    /// Removes the layer with `id`.
    ///
    /// Returns `true` if the registry changed; unknown ids are a no-op.
    /// Outstanding tokens for `id` become stale either way, so a removal
    /// that races a first insert still wins.
    pub fn remove(&mut self, id: &str) -> bool {
        if let Some(epoch) = self.epochs.get_mut(id) {
            *epoch += 1;
        }
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Removes every layer and invalidates all outstanding tokens.
    pub fn clear(&mut self) {
        for epoch in self.epochs.values_mut() {
            *epoch += 1;
        }
        self.entries.clear();
    }

    /// Begins (or takes over) ownership of `id`.
    ///
    /// The token stays current until `remove`, `clear`, or a newer
    /// `begin_registration` for the same id.
    pub fn begin_registration(&mut self, id: impl Into<String>) -> RegistrationToken {
        let id = id.into();
        let epoch = self.epochs.entry(id.clone()).or_insert(0);
        *epoch += 1;
        RegistrationToken { id, epoch: *epoch }
    }

    pub fn is_current(&self, token: &RegistrationToken) -> bool {
        self.epochs.get(&token.id).copied() == Some(token.epoch)
    }

    /// Applies `layer` only when `token` is still current and names the
    /// same id.
    ///
    /// Returns `true` if the layer was applied.
    pub fn upsert_if_current(&mut self, token: &RegistrationToken, layer: LayerDescriptor) -> bool {
        if token.id != layer.id || !self.is_current(token) {
            return false;
        }
        self.upsert(layer);
        true
    }

    /// Removes `token`'s layer only when the token is still current.
    ///
    /// Returns `true` if a layer was removed.
    pub fn remove_if_current(&mut self, token: &RegistrationToken) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.remove(&token.id)
    }
}
