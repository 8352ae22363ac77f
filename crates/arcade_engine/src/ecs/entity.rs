//! Entity implementation

use crate::foundation::collections::new_key_type;

new_key_type! {
    /// Generational entity handle
    ///
    /// Copying a handle never keeps the entity alive. Once the entity is
    /// destroyed every outstanding copy resolves to nothing, and the slot's
    /// next occupant gets a different generation.
    pub struct EntityId;
}

/// Bookkeeping stored for every live entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMeta {
    /// Debug name
    pub name: String,
}
