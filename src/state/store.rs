//! The entity store
//!
//! `BoothStore` owns every photo entity in the session. All mutation goes
//! through explicit methods here, and every mutation bumps a revision
//! counter; the view layer compares revisions to know when its cached
//! geometry is stale. The store never touches UI types, so the whole
//! model can be exercised headless.

use cgmath::Point2;

use super::entity::{EntityId, PhotoEntity, Placement, Preview};
use super::style::FrameStyle;

/// Where newly spawned frames land, and how far each subsequent one is
/// nudged so a burst of captures doesn't stack into a single pile.
const SPAWN_BASE: (f32, f32) = (40.0, 30.0);
const SPAWN_STEP: f32 = 26.0;
const SPAWN_CYCLE: u64 = 8;

/// In-memory store of all live photo entities
#[derive(Debug)]
pub struct BoothStore {
    entities: Vec<PhotoEntity>,
    /// Next entity id to hand out; never reused within a session
    next_id: u64,
    /// Next stacking index; strictly increases on every spawn and raise
    next_stack: u32,
    /// Bumped on every mutation so views can invalidate caches
    revision: u64,
    /// How many entities have ever been spawned (drives stagger placement)
    spawned: u64,
}

impl BoothStore {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
            next_stack: 0,
            revision: 0,
            spawned: 0,
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Create a new entity from a captured payload.
    ///
    /// The new frame receives a fresh id, the top stacking index and a
    /// staggered default position. The payload is fixed for the entity's
    /// lifetime.
    pub fn spawn(
        &mut self,
        payload: Vec<u8>,
        px_width: u32,
        px_height: u32,
        preview: Preview,
        style: FrameStyle,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let stack = self.next_stack;
        self.next_stack += 1;

        let step = (self.spawned % SPAWN_CYCLE) as f32 * SPAWN_STEP;
        self.spawned += 1;

        self.entities.push(PhotoEntity {
            id,
            payload,
            px_width,
            px_height,
            preview,
            style,
            name: String::new(),
            placement: Placement::new(SPAWN_BASE.0 + step, SPAWN_BASE.1 + step, stack),
        });

        self.touch();
        id
    }

    /// Remove an entity, returning it if it existed
    pub fn remove(&mut self, id: EntityId) -> Option<PhotoEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        let entity = self.entities.remove(index);
        self.touch();
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&PhotoEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut PhotoEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Update an entity's display name
    pub fn set_name(&mut self, id: EntityId, name: String) {
        if let Some(entity) = self.get_mut(id) {
            entity.name = name;
            self.touch();
        }
    }

    /// Switch an entity to another frame design
    pub fn set_style(&mut self, id: EntityId, style: FrameStyle) {
        if let Some(entity) = self.get_mut(id) {
            entity.style = style;
            self.touch();
        }
    }

    /// Apply a placement computed by the gesture controller.
    ///
    /// Scale is clamped here as well, and the stacking index is NOT taken
    /// from the argument: stacking is owned by the store and only changes
    /// through `spawn` and `raise_to_front`.
    pub fn set_placement(&mut self, id: EntityId, placement: Placement) {
        if let Some(entity) = self.get_mut(id) {
            let stack = entity.placement.stack;
            entity.placement = Placement {
                scale: Placement::clamp_scale(placement.scale),
                stack,
                ..placement
            };
            self.touch();
        }
    }

    /// Raise an entity to the top of the stacking order.
    ///
    /// Always assigns a strictly greater index than any handed out before,
    /// even if the entity is already on top.
    pub fn raise_to_front(&mut self, id: EntityId) {
        let stack = self.next_stack;
        if let Some(entity) = self.get_mut(id) {
            entity.placement.stack = stack;
            self.next_stack += 1;
            self.touch();
        }
    }

    /// Entities in draw order, back to front
    pub fn ordered(&self) -> Vec<&PhotoEntity> {
        let mut entities: Vec<&PhotoEntity> = self.entities.iter().collect();
        entities.sort_by_key(|e| e.placement.stack);
        entities
    }

    /// Topmost entity under a canvas-space point, if any
    pub fn hit_test(&self, point: Point2<f32>) -> Option<EntityId> {
        self.ordered()
            .into_iter()
            .rev()
            .find(|e| e.placement.contains(point))
            .map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Current revision; changes whenever any entity changes
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for BoothStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview() -> Preview {
        Preview {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 255],
        }
    }

    fn store_with(n: usize) -> (BoothStore, Vec<EntityId>) {
        let mut store = BoothStore::new();
        let ids = (0..n)
            .map(|_| store.spawn(vec![1, 2, 3], 4, 4, preview(), FrameStyle::Candy))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_ids_unique() {
        let (store, ids) = store_with(5);
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_raise_always_strictly_increases_stack() {
        let (mut store, ids) = store_with(3);

        let mut highest = store
            .ordered()
            .last()
            .map(|e| e.placement.stack)
            .unwrap();

        // Raising any entity, repeatedly and in any order, must always
        // produce a stack index above everything seen so far.
        for &id in [ids[0], ids[2], ids[0], ids[1], ids[1]].iter() {
            store.raise_to_front(id);
            let stack = store.get(id).unwrap().placement.stack;
            assert!(stack > highest);
            highest = stack;
        }
    }

    #[test]
    fn test_ordered_is_back_to_front() {
        let (mut store, ids) = store_with(3);
        store.raise_to_front(ids[0]);

        let order: Vec<EntityId> = store.ordered().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![ids[1], ids[2], ids[0]]);

        let stacks: Vec<u32> = store.ordered().iter().map(|e| e.placement.stack).collect();
        let mut sorted = stacks.clone();
        sorted.sort_unstable();
        assert_eq!(stacks, sorted);
    }

    #[test]
    fn test_set_placement_clamps_scale_and_keeps_stack() {
        let (mut store, ids) = store_with(2);
        store.raise_to_front(ids[0]);
        let stack_before = store.get(ids[0]).unwrap().placement.stack;

        let mut wild = store.get(ids[0]).unwrap().placement;
        wild.scale = 250.0;
        wild.stack = 0; // must be ignored
        store.set_placement(ids[0], wild);

        let placement = store.get(ids[0]).unwrap().placement;
        assert_eq!(placement.scale, crate::state::entity::SCALE_MAX);
        assert_eq!(placement.stack, stack_before);
    }

    #[test]
    fn test_remove_deletes_entity() {
        let (mut store, ids) = store_with(2);
        assert!(store.remove(ids[0]).is_some());
        assert!(store.get(ids[0]).is_none());
        assert!(store.remove(ids[0]).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut store = BoothStore::new();
        let a = store.spawn(vec![], 4, 4, preview(), FrameStyle::Candy);
        let b = store.spawn(vec![], 4, 4, preview(), FrameStyle::Polka);

        // Stack both frames onto the same spot.
        let mut placement = store.get(a).unwrap().placement;
        placement.x = 100.0;
        placement.y = 100.0;
        store.set_placement(a, placement);
        store.set_placement(b, placement);

        let center = store.get(a).unwrap().placement.center();
        assert_eq!(store.hit_test(center), Some(b));

        store.raise_to_front(a);
        assert_eq!(store.hit_test(center), Some(a));

        assert_eq!(store.hit_test(Point2::new(-500.0, -500.0)), None);
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let (mut store, ids) = store_with(1);
        let before = store.revision();
        store.set_name(ids[0], "Alex".into());
        assert!(store.revision() > before);

        // Mutating a missing entity is a no-op, including the revision.
        let before = store.revision();
        store.set_name(EntityId(999), "ghost".into());
        assert_eq!(store.revision(), before);
    }
}
