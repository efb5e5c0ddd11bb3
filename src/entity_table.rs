//! `EntityTable`: slot allocation, generation counters, and the per-entity
//! component/tag occupancy bitmaps.
//!
//! Tags have no storage of their own — per the design this core implements,
//! a tag is a flag-only component, so `TagRegistry` is not a separate type
//! here; its whole state is the `tag_occupancy` row matrix below, and its
//! operations (`has_tag`/`add_tag`/`remove_tag`) are the tag-prefixed
//! methods on this table.

use crate::bits;
use crate::duomap::Duomap;
use crate::entity::{Entity, Index};

pub(crate) struct EntityTable {
    max_entities: u32,
    component_words_per_entity: u32,
    tag_words_per_entity: u32,
    generations: Vec<u8>,
    component_occupancy: Vec<u32>,
    tag_occupancy: Vec<u32>,
    duomap: Duomap,
}

impl EntityTable {
    pub(crate) fn new(max_entities: u32, max_components: u32, max_tags: u32) -> Self {
        let component_words_per_entity = bits::words_for(max_components);
        let tag_words_per_entity = bits::words_for(max_tags);

        EntityTable {
            max_entities,
            component_words_per_entity,
            tag_words_per_entity,
            generations: vec![0u8; max_entities as usize],
            component_occupancy: vec![0u32; max_entities as usize * component_words_per_entity as usize],
            tag_occupancy: vec![0u32; max_entities as usize * tag_words_per_entity as usize],
            duomap: Duomap::new(max_entities),
        }
    }

    pub(crate) fn max_entities(&self) -> u32 {
        self.max_entities
    }

    /// Finds a free slot, clears its occupancy rows, and returns its handle
    /// at the slot's current generation. [`Entity::NULL`] at capacity.
    pub(crate) fn create_entity(&mut self) -> Entity {
        let Some(index) = self.duomap.find_free_and_set_used() else {
            return Entity::NULL;
        };

        for word in self.component_row_mut(index) {
            *word = 0;
        }
        for word in self.tag_row_mut(index) {
            *word = 0;
        }

        Entity::pack(self.generations[index as usize], index)
    }

    /// Frees `entity`'s slot if the handle's generation is still current.
    /// A stale or null handle is silently ignored.
    pub(crate) fn destroy_entity(&mut self, entity: Entity) {
        if entity.is_null() {
            return;
        }
        let index = entity.index();
        if index >= self.max_entities || self.generations[index as usize] != entity.generation() {
            log::debug!("destroy_entity: ignoring stale or out-of-range handle {entity:?}");
            return;
        }

        self.duomap.set_free(index);
        self.generations[index as usize] = self.generations[index as usize].wrapping_add(1);
    }

    pub(crate) fn is_live(&self, entity: Entity) -> bool {
        let index = entity.index();
        index < self.max_entities
            && self.duomap.is_used(index)
            && self.generations[index as usize] == entity.generation()
    }

    pub(crate) fn generation(&self, index: Index) -> u8 {
        self.generations[index as usize]
    }

    pub(crate) fn next_used_from(&self, index: Index) -> Option<Index> {
        self.duomap.next_used_up(index)
    }

    fn component_row_range(&self, index: Index) -> std::ops::Range<usize> {
        let start = index as usize * self.component_words_per_entity as usize;
        start..start + self.component_words_per_entity as usize
    }

    fn tag_row_range(&self, index: Index) -> std::ops::Range<usize> {
        let start = index as usize * self.tag_words_per_entity as usize;
        start..start + self.tag_words_per_entity as usize
    }

    pub(crate) fn component_row(&self, index: Index) -> &[u32] {
        &self.component_occupancy[self.component_row_range(index)]
    }

    fn component_row_mut(&mut self, index: Index) -> &mut [u32] {
        let range = self.component_row_range(index);
        &mut self.component_occupancy[range]
    }

    pub(crate) fn tag_row(&self, index: Index) -> &[u32] {
        &self.tag_occupancy[self.tag_row_range(index)]
    }

    fn tag_row_mut(&mut self, index: Index) -> &mut [u32] {
        let range = self.tag_row_range(index);
        &mut self.tag_occupancy[range]
    }

    pub(crate) fn has_component(&self, index: Index, cp_index: u32) -> bool {
        if index >= self.max_entities || cp_index >= self.component_words_per_entity * 32 {
            return false;
        }
        bits::is_set(self.component_row(index), cp_index)
    }

    pub(crate) fn set_component_bit(&mut self, index: Index, cp_index: u32) {
        if index >= self.max_entities || cp_index >= self.component_words_per_entity * 32 {
            return;
        }
        bits::set(self.component_row_mut(index), cp_index);
    }

    pub(crate) fn clear_component_bit(&mut self, index: Index, cp_index: u32) {
        if index >= self.max_entities || cp_index >= self.component_words_per_entity * 32 {
            return;
        }
        bits::clear(self.component_row_mut(index), cp_index);
    }

    /// Clears bit `cp_index` from every entity's component occupancy row.
    /// Called on `unregister_component` so `has()` cannot report `true` for
    /// a component whose store no longer exists.
    pub(crate) fn clear_component_column(&mut self, cp_index: u32) {
        if cp_index >= self.component_words_per_entity * 32 {
            return;
        }
        for slot in 0..self.max_entities {
            bits::clear(self.component_row_mut(slot), cp_index);
        }
    }

    pub(crate) fn has_tag(&self, index: Index, tg_index: u32) -> bool {
        if index >= self.max_entities || tg_index >= self.tag_words_per_entity * 32 {
            return false;
        }
        bits::is_set(self.tag_row(index), tg_index)
    }

    pub(crate) fn set_tag_bit(&mut self, index: Index, tg_index: u32) {
        if index >= self.max_entities || tg_index >= self.tag_words_per_entity * 32 {
            return;
        }
        bits::set(self.tag_row_mut(index), tg_index);
    }

    pub(crate) fn clear_tag_bit(&mut self, index: Index, tg_index: u32) {
        if index >= self.max_entities || tg_index >= self.tag_words_per_entity * 32 {
            return;
        }
        bits::clear(self.tag_row_mut(index), tg_index);
    }
}
