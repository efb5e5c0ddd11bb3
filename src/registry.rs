//! `ComponentRegistry`: per-component dense storage with sparse-set
//! indirection. Each registered type gets a trait object wrapping its
//! concrete [`ComponentStore<T>`], downcast back to the concrete type on
//! typed access; a type mismatch between registration and access is a
//! programming error and panics rather than returning a silent `None`.
//!
//! Components are identified by a caller-assigned dense `u32` index rather
//! than by [`std::any::TypeId`]: the registry does not know or care what `T`
//! a slot holds until a generic method names it.

use std::any::Any;

const NONE: u32 = u32::MAX;

/// Dense storage for one component type: a packed payload array plus the
/// (`global_to_local`, `local_to_global`) sparse-set pair that makes attach,
/// detach, and lookup O(1) per entity.
struct ComponentStore<T> {
    payload: Vec<T>,
    global_to_local: Vec<u32>,
    local_to_global: Vec<u32>,
}

impl<T> ComponentStore<T> {
    fn new(max_entities: u32, capacity: u32) -> Self {
        ComponentStore {
            payload: Vec::with_capacity(capacity as usize),
            global_to_local: vec![NONE; max_entities as usize],
            local_to_global: vec![NONE; capacity as usize],
        }
    }

    /// Idempotent: if `entity_index` already owns a payload, `value` is
    /// discarded and the existing payload's reference is returned unchanged
    /// (P6 in the design this implements). `None` if `entity_index` is out
    /// of range, or if the store is already at `capacity` and `entity_index`
    /// does not already own a payload — mirroring `create_entity`'s
    /// NULL-at-capacity behaviour rather than indexing past the dense arrays.
    fn add(&mut self, entity_index: u32, value: T) -> Option<&mut T> {
        let slot = entity_index as usize;
        let existing = *self.global_to_local.get(slot)?;
        if existing == NONE {
            if self.payload.len() as u32 >= self.local_to_global.len() as u32 {
                return None;
            }
            let local = self.payload.len() as u32;
            self.global_to_local[slot] = local;
            self.local_to_global[local as usize] = entity_index;
            self.payload.push(value);
        }
        let local = self.global_to_local[slot] as usize;
        Some(&mut self.payload[local])
    }

    fn get(&self, entity_index: u32) -> Option<&T> {
        let local = *self.global_to_local.get(entity_index as usize)?;
        (local != NONE).then(|| &self.payload[local as usize])
    }

    fn get_mut(&mut self, entity_index: u32) -> Option<&mut T> {
        let local = *self.global_to_local.get(entity_index as usize)?;
        (local != NONE).then(|| &mut self.payload[local as usize])
    }

    /// Swap-remove: moves the last dense element into the removed slot's
    /// place and rewires both index maps, so every other entity's payload
    /// stays reachable at its (possibly new) dense index. `false` if
    /// `entity_index` is out of range or does not own a payload.
    fn remove(&mut self, entity_index: u32) -> bool {
        let slot = entity_index as usize;
        let Some(&local) = self.global_to_local.get(slot) else {
            return false;
        };
        if local == NONE {
            return false;
        }

        let last = self.payload.len() as u32 - 1;
        self.global_to_local[slot] = NONE;
        self.local_to_global[local as usize] = NONE;

        if local != last {
            let last_entity = self.local_to_global[last as usize];
            self.global_to_local[last_entity as usize] = local;
            self.local_to_global[local as usize] = last_entity;
        }
        self.local_to_global[last as usize] = NONE;
        self.payload.swap_remove(local as usize);
        true
    }
}

/// Type-erased facade over a `ComponentStore<T>` for operations the
/// registry needs without knowing `T` (teardown, membership, bookkeeping).
trait AnyComponentStore: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove(&mut self, entity_index: u32) -> bool;
}

impl<T: 'static> AnyComponentStore for ComponentStore<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove(&mut self, entity_index: u32) -> bool {
        ComponentStore::remove(self, entity_index)
    }
}

/// Per-component-type dense storage, indexed by the same `cp_index` the
/// caller uses for occupancy bits in [`EntityTable`](crate::entity_table::EntityTable).
pub(crate) struct ComponentRegistry {
    max_entities: u32,
    stores: Vec<Option<Box<dyn AnyComponentStore>>>,
}

impl ComponentRegistry {
    pub(crate) fn new(max_entities: u32, max_components: u32) -> Self {
        let mut stores = Vec::with_capacity(max_components as usize);
        stores.resize_with(max_components as usize, || None);
        ComponentRegistry { max_entities, stores }
    }

    fn slot(&self, cp_index: u32) -> Option<&Option<Box<dyn AnyComponentStore>>> {
        self.stores.get(cp_index as usize)
    }

    /// Idempotent-rejecting: fails if the store is already initialised.
    pub(crate) fn register<T: 'static>(&mut self, cp_index: u32, capacity: u32) -> bool {
        let Some(slot) = self.stores.get_mut(cp_index as usize) else {
            log::warn!("register_component: cp_index {cp_index} is out of range");
            return false;
        };
        if slot.is_some() {
            log::debug!("register_component: cp_index {cp_index} already registered, ignoring");
            return false;
        }
        *slot = Some(Box::new(ComponentStore::<T>::new(self.max_entities, capacity)));
        true
    }

    /// Releases the store. `false` if it was already dormant or out of range.
    pub(crate) fn unregister(&mut self, cp_index: u32) -> bool {
        match self.stores.get_mut(cp_index as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    fn downcast<T: 'static>(store: &dyn AnyComponentStore) -> &ComponentStore<T> {
        store.as_any().downcast_ref::<ComponentStore<T>>().unwrap_or_else(|| {
            panic!(
                "component store holds a different type than `{}`; registration and access types disagree",
                std::any::type_name::<T>()
            )
        })
    }

    fn downcast_mut<T: 'static>(store: &mut dyn AnyComponentStore) -> &mut ComponentStore<T> {
        let type_name = std::any::type_name::<T>();
        store
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .unwrap_or_else(|| panic!("component store holds a different type than `{type_name}`; registration and access types disagree"))
    }

    pub(crate) fn add<T: 'static>(&mut self, cp_index: u32, entity_index: u32, value: T) -> Option<&mut T> {
        let store = self.stores.get_mut(cp_index as usize)?.as_mut()?;
        Self::downcast_mut::<T>(store.as_mut()).add(entity_index, value)
    }

    pub(crate) fn get<T: 'static>(&self, cp_index: u32, entity_index: u32) -> Option<&T> {
        let store = self.slot(cp_index)?.as_ref()?;
        Self::downcast::<T>(store.as_ref()).get(entity_index)
    }

    pub(crate) fn get_mut<T: 'static>(&mut self, cp_index: u32, entity_index: u32) -> Option<&mut T> {
        let store = self.stores.get_mut(cp_index as usize)?.as_mut()?;
        Self::downcast_mut::<T>(store.as_mut()).get_mut(entity_index)
    }

    /// `false` (no-op) if the store is unregistered or the entity does not
    /// own the component.
    pub(crate) fn remove(&mut self, cp_index: u32, entity_index: u32) -> bool {
        match self.stores.get_mut(cp_index as usize).and_then(|slot| slot.as_mut()) {
            Some(store) => AnyComponentStore::remove(store.as_mut(), entity_index),
            None => false,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[test]
    fn register_is_idempotent_rejecting() {
        let mut r = ComponentRegistry::new(16, 8);
        assert!(r.register::<u8>(5, 16));
        assert!(!r.register::<u16>(5, 16), "second register of the same index must fail");
        assert!(r.get::<u8>(5, 0).is_none());
    }

    #[test]
    fn add_then_get_then_remove() {
        let mut r = ComponentRegistry::new(16, 8);
        r.register::<Position>(0, 16);

        assert!(r.get::<Position>(0, 3).is_none());
        r.add(0, 3, Position { x: 1.0, y: 2.0 });
        assert_eq!(r.get::<Position>(0, 3), Some(&Position { x: 1.0, y: 2.0 }));

        assert!(r.remove(0, 3));
        assert!(r.get::<Position>(0, 3).is_none());
    }

    #[test]
    fn add_is_idempotent_and_keeps_first_value() {
        let mut r = ComponentRegistry::new(16, 8);
        r.register::<u32>(0, 16);
        r.add(0, 1, 10u32);
        r.add(0, 1, 999u32);
        assert_eq!(r.get::<u32>(0, 1), Some(&10));
    }

    #[test]
    fn swap_remove_preserves_other_entities_payloads() {
        let mut r = ComponentRegistry::new(16, 8);
        r.register::<u32>(0, 16);
        r.add(0, 1, 111u32);
        r.add(0, 2, 222u32);
        r.add(0, 3, 333u32);

        assert!(r.remove(0, 2));

        assert_eq!(r.get::<u32>(0, 1), Some(&111));
        assert_eq!(r.get::<u32>(0, 3), Some(&333));
        assert!(r.get::<u32>(0, 2).is_none());
    }

    #[test]
    #[should_panic(expected = "different type")]
    fn mismatched_type_panics_instead_of_returning_none() {
        let mut r = ComponentRegistry::new(16, 8);
        r.register::<u32>(0, 16);
        r.add(0, 1, 5u32);
        let _ = r.get::<u64>(0, 1);
    }

    #[test]
    fn out_of_range_entity_index_returns_none_instead_of_panicking() {
        let mut r = ComponentRegistry::new(16, 8);
        r.register::<u32>(0, 16);

        let out_of_range = 16u32;
        assert!(r.add(0, out_of_range, 5u32).is_none());
        assert!(r.get::<u32>(0, out_of_range).is_none());
        assert!(!r.remove(0, out_of_range));
    }

    #[test]
    fn add_past_capacity_returns_none_instead_of_panicking() {
        let mut r = ComponentRegistry::new(16, 2);
        r.register::<u32>(0, 2);

        assert!(r.add(0, 0, 1u32).is_some());
        assert!(r.add(0, 1, 2u32).is_some());
        assert!(r.add(0, 2, 3u32).is_none(), "store is already at its registered capacity");

        assert!(r.get::<u32>(0, 0).is_some());
        assert!(r.get::<u32>(0, 1).is_some());
        assert!(r.get::<u32>(0, 2).is_none());
    }
}
