//! ECS World implementation

use super::{Component, EntityId, EntityMeta};
use crate::foundation::collections::{SecondaryMap, SlotMap};
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-erased view of one component storage
trait ComponentStorage {
    fn remove_entity(&mut self, entity: EntityId);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ComponentStorage for SecondaryMap<EntityId, T> {
    fn remove_entity(&mut self, entity: EntityId) {
        self.remove(entity);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// ECS World containing all entities and components
#[derive(Default)]
pub struct World {
    entities: SlotMap<EntityId, EntityMeta>,
    component_storages: HashMap<TypeId, Box<dyn ComponentStorage>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity
    pub fn create_entity(&mut self, name: impl Into<String>) -> EntityId {
        let name = name.into();
        let entity = self.entities.insert(EntityMeta { name });
        log::trace!("Created entity {:?}", entity);
        entity
    }

    /// Destroy an entity and every component attached to it
    ///
    /// Returns false if the handle was already stale.
    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        if self.entities.remove(entity).is_none() {
            return false;
        }
        for storage in self.component_storages.values_mut() {
            storage.remove_entity(entity);
        }
        log::trace!("Destroyed entity {:?}", entity);
        true
    }

    /// Whether the handle still refers to a live entity
    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    /// Entity bookkeeping (name), if alive
    pub fn meta(&self, entity: EntityId) -> Option<&EntityMeta> {
        self.entities.get(entity)
    }

    fn storage<T: Component>(&self) -> Option<&SecondaryMap<EntityId, T>> {
        self.component_storages
            .get(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut SecondaryMap<EntityId, T>> {
        self.component_storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| storage.as_any_mut().downcast_mut())
    }

    /// Add a component to an entity, returning the one it replaced
    ///
    /// Adding to a stale handle is ignored.
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> Option<T> {
        if !self.is_alive(entity) {
            log::warn!("Ignoring component {} for stale entity {:?}", std::any::type_name::<T>(), entity);
            return None;
        }
        let storage = self
            .component_storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SecondaryMap::<EntityId, T>::new()) as Box<dyn ComponentStorage>);
        storage
            .as_any_mut()
            .downcast_mut::<SecondaryMap<EntityId, T>>()
            .and_then(|map| map.insert(entity, component))
    }

    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// Detach a component from an entity
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Whether the entity carries a component of type `T`
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.storage::<T>().is_some_and(|map| map.contains_key(entity))
    }

    /// Iterate every entity carrying a `T`, in arena order
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.storage::<T>().into_iter().flat_map(|map| map.iter())
    }

    /// Snapshot of the entities carrying a `T`
    ///
    /// Handy when the loop body needs `&mut World`.
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        self.query::<T>().map(|(entity, _)| entity).collect()
    }

    /// Get an iterator over all entities
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entity is alive
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Destroy everything
    pub fn clear(&mut self) {
        self.entities.clear();
        self.component_storages.clear();
    }
}
