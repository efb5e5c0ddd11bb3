#![deny(missing_docs)]

//! # decs
//!
//! A dense Entity-Component-System core: fixed-width entity handles, typed
//! component payloads in per-component dense storage with sparse-set
//! indirection, tag membership as bitmap rows, and a reference-entity
//! iterator that composes membership sets into one scan.
//!
//! `World` is a single process-local, single-threaded container. There is
//! no cross-thread dispatcher, no archetype/group packing, and no
//! serialisation — entity storage and membership queries are the whole of
//! it.
//!
//! ```
//! use decs::World;
//!
//! let mut world = World::new(1024, 256, 64).unwrap();
//! let position = 0u32;
//! world.register_component::<(f32, f32)>(position, 1024);
//!
//! let e = world.create_entity();
//! let _ = world.add(e, position, (1.0, 2.0));
//! assert_eq!(world.get::<(f32, f32)>(e, position), Some(&(1.0, 2.0)));
//! ```

mod bits;
mod duomap;
pub mod entity;
mod entity_table;
pub mod error;
mod iter;
pub mod prelude;
mod registry;

pub use entity::{Entity, Index, MAX_INDEX};
pub use error::WorldError;
pub use iter::Iter;

use entity_table::EntityTable;
use registry::ComponentRegistry;

/// A fixed-capacity ECS container.
///
/// `World` composes an [`EntityTable`] (slot allocation, generations, and
/// component/tag occupancy bitmaps) with a [`ComponentRegistry`] (per-type
/// dense storage). Every capacity is fixed at construction; there is no
/// resizing, matching the fixed-width entity handle's 24-bit index field.
pub struct World {
    entities: EntityTable,
    components: ComponentRegistry,
    max_components: u32,
    max_tags: u32,
}

impl World {
    /// Creates a `World` with room for `max_entities` live entities,
    /// `max_components` distinct component types, and `max_tags` distinct
    /// tags. Fails if any of the three is zero.
    pub fn new(max_entities: u32, max_components: u32, max_tags: u32) -> Result<World, WorldError> {
        if max_entities == 0 || max_components == 0 || max_tags == 0 {
            return Err(WorldError::ZeroCapacity);
        }
        Ok(World {
            entities: EntityTable::new(max_entities, max_components, max_tags),
            components: ComponentRegistry::new(max_entities, max_components),
            max_components,
            max_tags,
        })
    }

    /// The entity capacity this `World` was constructed with.
    pub fn max_entities(&self) -> u32 {
        self.entities.max_entities()
    }

    /// The component-type capacity this `World` was constructed with.
    pub fn max_components(&self) -> u32 {
        self.max_components
    }

    /// The tag capacity this `World` was constructed with.
    pub fn max_tags(&self) -> u32 {
        self.max_tags
    }

    /// Allocates a new entity, or [`Entity::NULL`] if the `World` is at
    /// entity capacity. A freshly created entity owns no components or tags.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.create_entity()
    }

    /// Frees `entity`'s slot, allowing it to be recycled by a later
    /// `create_entity`. A no-op for a stale or already-null handle.
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.entities.destroy_entity(entity)
    }

    /// `true` iff `entity` refers to a currently-live slot: the slot is used
    /// and `entity`'s generation matches the slot's current one.
    pub fn is_live(&self, entity: Entity) -> bool {
        self.entities.is_live(entity)
    }

    /// Registers component type `T` at `cp_index`, with room for `capacity`
    /// simultaneously-attached instances. Idempotent-rejecting: returns
    /// `false` (and leaves the existing store untouched) if `cp_index` is
    /// already registered or out of range.
    pub fn register_component<T: 'static>(&mut self, cp_index: u32, capacity: u32) -> bool {
        self.components.register::<T>(cp_index, capacity)
    }

    /// Releases the component store at `cp_index` and clears bit `cp_index`
    /// from every entity's component-occupancy row, so `has` cannot report
    /// `true` for a component whose store no longer exists. `false` if
    /// `cp_index` was already dormant or out of range.
    pub fn unregister_component(&mut self, cp_index: u32) -> bool {
        let released = self.components.unregister(cp_index);
        if released {
            self.entities.clear_component_column(cp_index);
        }
        released
    }

    /// `true` iff `entity` currently owns component `cp_index`.
    pub fn has(&self, entity: Entity, cp_index: u32) -> bool {
        self.entities.has_component(entity.index(), cp_index)
    }

    /// Attaches component `cp_index` to `entity` with the given payload and
    /// returns a reference to the stored value. Idempotent: if `entity`
    /// already owns `cp_index`, `value` is discarded and a reference to the
    /// existing payload is returned. `None` if `cp_index` is unregistered,
    /// `entity`'s index is out of range (as `Entity::NULL`'s is), or the
    /// store is already at the capacity it was registered with and `entity`
    /// does not already own the component.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the type `cp_index` was registered with.
    pub fn add<T: 'static>(&mut self, entity: Entity, cp_index: u32, value: T) -> Option<&mut T> {
        let stored = self.components.add(cp_index, entity.index(), value)?;
        self.entities.set_component_bit(entity.index(), cp_index);
        Some(stored)
    }

    /// Returns a reference to `entity`'s payload for `cp_index`, or `None` if
    /// the store is unregistered, out of range, or `entity` lacks it.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the type `cp_index` was registered with.
    pub fn get<T: 'static>(&self, entity: Entity, cp_index: u32) -> Option<&T> {
        self.components.get(cp_index, entity.index())
    }

    /// Mutable counterpart to [`get`](World::get).
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the type `cp_index` was registered with.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity, cp_index: u32) -> Option<&mut T> {
        self.components.get_mut(cp_index, entity.index())
    }

    /// Detaches component `cp_index` from `entity` via swap-remove, moving
    /// the dense store's last element into the vacated slot. A no-op
    /// (returns `false`) if `cp_index` is unregistered, `entity`'s index is
    /// out of range, or `entity` does not own it.
    pub fn remove(&mut self, entity: Entity, cp_index: u32) -> bool {
        let removed = self.components.remove(cp_index, entity.index());
        if removed {
            self.entities.clear_component_bit(entity.index(), cp_index);
        }
        removed
    }

    /// `true` iff `entity` currently carries tag `tg_index`.
    pub fn has_tag(&self, entity: Entity, tg_index: u32) -> bool {
        self.entities.has_tag(entity.index(), tg_index)
    }

    /// Sets tag `tg_index` on `entity`. A silent no-op if `tg_index` is out
    /// of range.
    pub fn add_tag(&mut self, entity: Entity, tg_index: u32) {
        self.entities.set_tag_bit(entity.index(), tg_index)
    }

    /// Clears tag `tg_index` from `entity`. A silent no-op if `tg_index` is
    /// out of range.
    pub fn remove_tag(&mut self, entity: Entity, tg_index: u32) {
        self.entities.clear_tag_bit(entity.index(), tg_index)
    }

    /// Iterates every live entity in ascending slot-index order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::unconstrained(&self.entities)
    }

    /// Iterates every live entity (other than `reference` itself) whose
    /// component and tag occupancy is a superset of `reference`'s.
    pub fn iter_like(&self, reference: Entity) -> Iter<'_> {
        Iter::referenced(&self.entities, reference)
    }
}
