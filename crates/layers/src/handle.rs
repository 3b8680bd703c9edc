use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::descriptor::LayerDescriptor;
use crate::registry::{LayerRegistry, RegistrationToken};

/// Cheaply clonable handle to a session's layer registry.
///
/// Single-threaded by construction: features hold clones and mutate through
/// short borrows, so no borrow is held across an await point.
#[derive(Debug, Clone, Default)]
pub struct SharedLayerRegistry {
    inner: Rc<RefCell<LayerRegistry>>,
}

impl SharedLayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R>(&self, f: impl FnOnce(&LayerRegistry) -> R) -> R {
        f(&self.inner.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut LayerRegistry) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    /// Copy of the layer list in render order.
    pub fn snapshot(&self) -> Vec<LayerDescriptor> {
        self.inner.borrow().list().to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.borrow().contains(id)
    }

    pub fn upsert(&self, layer: LayerDescriptor) -> bool {
        self.inner.borrow_mut().upsert(layer)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.inner.borrow_mut().remove(id)
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().clear();
    }

    pub fn begin_registration(&self, id: impl Into<String>) -> RegistrationToken {
        self.inner.borrow_mut().begin_registration(id)
    }

    pub fn is_current(&self, token: &RegistrationToken) -> bool {
        self.inner.borrow().is_current(token)
    }

    pub fn upsert_if_current(&self, token: &RegistrationToken, layer: LayerDescriptor) -> bool {
        self.inner.borrow_mut().upsert_if_current(token, layer)
    }

    /// Registers `layer` and returns a guard that removes it on drop.
    ///
    /// Re-registering an id hands ownership to the newest guard; an older
    /// guard's drop then leaves the layer alone.
    pub fn upsert_scoped(&self, layer: LayerDescriptor) -> LayerHandle {
        let mut reg = self.inner.borrow_mut();
        let token = reg.begin_registration(layer.id.clone());
        reg.upsert(layer);
        LayerHandle { registry: Rc::downgrade(&self.inner), token }
    }
}

/// Owns one registry entry; dropping the handle removes the layer.
///
/// Every exit path of the owning feature releases the layer, with no
/// lifecycle callback to forget.
#[derive(Debug)]
pub struct LayerHandle {
    registry: Weak<RefCell<LayerRegistry>>,
    token: RegistrationToken,
}

impl LayerHandle {
    pub fn id(&self) -> &str {
        self.token.id()
    }

    /// Replaces the layer content in place while ownership holds.
    ///
    /// Returns `true` if the registry accepted the refresh.
    pub fn refresh(&self, layer: LayerDescriptor) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        registry.borrow_mut().upsert_if_current(&self.token, layer)
    }

    /// Removes the layer now instead of at drop.
    pub fn release(self) {}
}

impl Drop for LayerHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove_if_current(&self.token);
        }
    }
}
