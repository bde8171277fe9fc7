use slotmap::new_key_type;

new_key_type! {
    /// Identifies a product in a session's product registry.
    pub struct ProductId;

    /// Identifies a location in a session's location registry.
    pub struct LocationId;

    /// Identifies a product-location pair in a session.
    pub struct ProductLocationId;

    /// Identifies an operation in a session's operation registry.
    pub struct OperationId;
}

/// Operation priority. Lower values are preferred by the resolver.
pub type Priority = i32;
