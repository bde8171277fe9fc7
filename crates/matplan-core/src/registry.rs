//! Name-interned registries for products and locations.
//!
//! Each named entity gets exactly one handle per distinct name per session:
//! `create` is idempotent and returns the original handle when the name is
//! already registered. Removal frees the name for re-registration; handles
//! of removed entries go stale and are rejected wherever they are passed
//! back in.

use slotmap::{Key, SlotMap};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A named product.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Product {
    name: String,
}

impl Product {
    pub(crate) fn new(name: String) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A named location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Location {
    name: String,
}

impl Location {
    pub(crate) fn new(name: String) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Entity names and operation keys must contain at least one
    /// non-whitespace character.
    #[error("name must not be blank")]
    BlankName,

    /// Operation keys are unique per session; re-registering one is a
    /// conflict, not a create-or-get.
    #[error("operation key '{0}' is already registered")]
    DuplicateKey(String),

    /// A handle did not resolve to a live entry (removed, or from another
    /// session).
    #[error("stale {0} handle")]
    UnknownHandle(&'static str),

    /// A composite key was not of the form `product@location`.
    #[error("malformed product-location key '{0}'")]
    MalformedKey(String),
}

// ---------------------------------------------------------------------------
// Interning store
// ---------------------------------------------------------------------------

/// Interning store shared by the product and location registries: a slot map
/// of entries plus a name index handing out stable handles.
#[derive(Debug, Clone)]
pub(crate) struct NamedStore<K: Key, V> {
    entries: SlotMap<K, V>,
    by_name: HashMap<String, K>,
}

impl<K: Key, V> NamedStore<K, V> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            by_name: HashMap::new(),
        }
    }

    /// Create-or-get. `make` runs only when the name is new.
    pub fn create(
        &mut self,
        name: &str,
        make: impl FnOnce(String) -> V,
    ) -> Result<K, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::BlankName);
        }
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        let id = self.entries.insert(make(name.to_string()));
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn id(&self, name: &str) -> Option<K> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: K) -> Option<&V> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: K) -> bool {
        self.entries.contains_key(id)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Remove by name. Returns the freed handle, `None` when the name was
    /// not registered.
    pub fn remove(&mut self, name: &str) -> Option<K> {
        let id = self.by_name.remove(name)?;
        self.entries.remove(id);
        Some(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_name.clear();
    }
}

impl<K: Key, V> Default for NamedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
