//! The reference-entity iterator: walks the duomap's used slots in
//! ascending order, and when a reference entity is set, skips any candidate
//! whose component/tag occupancy is not a superset of the reference's.
//! Expressed as a plain [`Iterator`] rather than a bespoke `begin`/`next`/
//! `end` cursor — idiomatic Rust already gives the "once exhausted, stays
//! exhausted" guarantee for free.

use crate::bits;
use crate::entity::{Entity, Index};
use crate::entity_table::EntityTable;

/// Yields every live entity whose occupancy is a superset of an (optional)
/// reference entity's. Returned by [`World::iter`](crate::World::iter) and
/// [`World::iter_like`](crate::World::iter_like).
pub struct Iter<'a> {
    table: &'a EntityTable,
    reference: Option<Index>,
    cursor: Option<Index>,
}

impl<'a> Iter<'a> {
    pub(crate) fn unconstrained(table: &'a EntityTable) -> Self {
        Iter {
            table,
            reference: None,
            cursor: Some(0),
        }
    }

    pub(crate) fn referenced(table: &'a EntityTable, reference: Entity) -> Self {
        Iter {
            table,
            reference: (!reference.is_null()).then(|| reference.index()),
            cursor: Some(0),
        }
    }

    fn matches(&self, candidate: Index) -> bool {
        let Some(reference) = self.reference else {
            return true;
        };
        if candidate == reference {
            return false;
        }
        bits::is_superset(self.table.component_row(candidate), self.table.component_row(reference))
            && bits::is_superset(self.table.tag_row(candidate), self.table.tag_row(reference))
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        let mut probe = self.cursor?;
        loop {
            let Some(candidate) = self.table.next_used_from(probe) else {
                self.cursor = None;
                return None;
            };
            if self.matches(candidate) {
                self.cursor = Some(candidate + 1);
                return Some(Entity::pack(self.table.generation(candidate), candidate));
            }
            probe = candidate + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::World;

    #[test]
    fn unconstrained_yields_every_live_entity_in_order() {
        let mut w = World::new(8, 8, 8).unwrap();
        let mut made = Vec::new();
        for _ in 0..4 {
            made.push(w.create_entity());
        }
        w.destroy_entity(made[1]);

        let seen: Vec<_> = w.iter().collect();
        assert_eq!(seen, vec![made[0], made[2], made[3]]);
    }

    #[test]
    fn referenced_excludes_reference_and_requires_superset() {
        const U8_CP: u32 = 0;
        const POSITION_CP: u32 = 1;
        const ENEMY_TAG: u32 = 0;

        let mut w = World::new(8, 8, 8).unwrap();
        w.register_component::<u8>(U8_CP, 8);
        w.register_component::<u32>(POSITION_CP, 8);

        let e1 = w.create_entity();
        let e2 = w.create_entity();
        let e3 = w.create_entity();
        let e4 = w.create_entity();

        for e in [e1, e3, e4] {
            w.add(e, U8_CP, 0u8);
        }
        for e in [e1, e3] {
            w.add(e, POSITION_CP, 0u32);
        }
        for e in [e1, e2, e3] {
            w.add_tag(e, ENEMY_TAG);
        }

        let reference = w.create_entity();
        w.add(reference, U8_CP, 0u8);
        w.add(reference, POSITION_CP, 0u32);
        w.add_tag(reference, ENEMY_TAG);

        let matched: Vec<_> = w.iter_like(reference).collect();
        assert_eq!(matched, vec![e1, e3]);
        assert!(!matched.contains(&reference));
    }

    #[test]
    fn end_is_idempotent() {
        let mut w = World::new(2, 4, 4).unwrap();
        w.create_entity();
        let mut it = w.iter();
        assert!(it.next().is_some());
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }
}
