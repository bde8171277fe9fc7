//! Product-location pairs: the composite entity the planning graph hangs
//! state off.
//!
//! A product-location is identified by its `(product, location)` handle pair
//! and exposed to callers as the composite key `"{product}@{location}"`.
//! Its inventory ledger and producing-operation assignment live in the
//! session's secondary maps, keyed by [`ProductLocationId`].
//!
//! [`ProductLocationId`]: crate::id::ProductLocationId

use crate::id::{LocationId, ProductId};
use crate::registry::RegistryError;

/// Separator between the product and location names in a composite key.
pub const KEY_SEPARATOR: char = '@';

/// A product stocked (or produced, or consumed) at a location.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProductLocation {
    product: ProductId,
    location: LocationId,
    key: String,
}

impl ProductLocation {
    pub(crate) fn new(product: ProductId, location: LocationId, key: String) -> Self {
        Self {
            product,
            location,
            key,
        }
    }

    pub fn product(&self) -> ProductId {
        self.product
    }

    pub fn location(&self) -> LocationId {
        self.location
    }

    /// The composite key, `"{product}@{location}"`.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Build the composite key for a product/location name pair.
pub fn make_key(product: &str, location: &str) -> String {
    format!("{product}{KEY_SEPARATOR}{location}")
}

/// Split a composite key into product and location names.
///
/// The split happens at the first separator, so product names must not
/// contain `@`; location names may.
pub fn parse_key(key: &str) -> Result<(&str, &str), RegistryError> {
    match key.split_once(KEY_SEPARATOR) {
        Some((product, location)) if !product.trim().is_empty() && !location.trim().is_empty() => {
            Ok((product, location))
        }
        _ => Err(RegistryError::MalformedKey(key.to_string())),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
