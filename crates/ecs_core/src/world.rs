//! The ECS world: entities, component columns, tag bitsets and systems.

use crate::entity::{Entity, EntityAllocator, NULL_ENTITY};
use crate::query::{ForbiddenSet, QueryIter, RequiredSet, TagSet};
use crate::registry::{self, Component, ComponentTypeId, Tag, TagTypeId};
use crate::storage::{AnyStore, SparseSet};
use crate::system::System;
use crate::tags::Bitset;

type DeferredOp = Box<dyn FnOnce(&mut World)>;

/// The ECS container: owns the entity allocator, one component column per
/// registered component kind, one bitset per registered tag kind, and the
/// ordered list of systems.
///
/// # Example
/// ```ignore
/// let mut world = World::new();
/// let player = world.create_entity();
/// world.add_component(player, Position { x: 0.0, y: 0.0 });
/// world.add_tag::<Alive>(player);
///
/// for (entity, (pos,)) in world.query_entities::<(Position,), (), (Alive,)>() {
///     pos.x += 1.0;
/// }
/// ```
pub struct World {
    allocator: EntityAllocator,
    components: Vec<Option<Box<dyn AnyStore>>>,
    tags: Vec<Bitset>,
    systems: Vec<Box<dyn System>>,
    deferred: Vec<DeferredOp>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            components: Vec::new(),
            tags: Vec::new(),
            systems: Vec::new(),
            deferred: Vec::new(),
        }
    }

    /// Pre-sizes the entity allocator's bookkeeping for `capacity` entities.
    /// Component columns and tag bitsets still grow lazily on first use.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            allocator: EntityAllocator::with_capacity(capacity),
            ..Self::new()
        }
    }

    // -- entity lifecycle ---------------------------------------------

    pub fn create_entity(&mut self) -> Entity {
        self.allocator.create()
    }

    /// Removes every component and tag `e` holds, then returns its id to the
    /// allocator. No-op for [`NULL_ENTITY`]. Destroying an already-destroyed
    /// entity is undefined (see [`EntityAllocator::destroy`]).
    pub fn destroy_entity(&mut self, e: Entity) {
        if e == NULL_ENTITY {
            return;
        }
        debug_assert!(
            self.allocator.is_alive(e),
            "destroy_entity called on a dead or never-issued entity {e}"
        );
        for slot in self.components.iter_mut().flatten() {
            slot.remove(e.id());
        }
        for bitset in &mut self.tags {
            bitset.clear(e.id());
        }
        self.allocator.destroy(e);
    }

    pub fn is_alive(&self, e: Entity) -> bool {
        self.allocator.is_alive(e)
    }

    pub fn entity_count(&self) -> usize {
        self.allocator.count()
    }

    // -- components ------------------------------------------------------

    fn ensure_component_slot(&mut self, type_id: ComponentTypeId) -> &mut Option<Box<dyn AnyStore>> {
        let idx = type_id.raw() as usize;
        if idx >= self.components.len() {
            self.components.resize_with(idx + 1, || None);
        }
        &mut self.components[idx]
    }

    fn column_mut<C: Component>(&mut self) -> Option<&mut SparseSet<C>> {
        let type_id = registry::component_type_id::<C>();
        self.components
            .get_mut(type_id.raw() as usize)?
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<SparseSet<C>>()
    }

    fn column<C: Component>(&self) -> Option<&SparseSet<C>> {
        let type_id = registry::component_type_id::<C>();
        self.components
            .get(type_id.raw() as usize)?
            .as_ref()?
            .as_any()
            .downcast_ref::<SparseSet<C>>()
    }

    pub(crate) fn column_len<C: Component>(&self) -> usize {
        self.column::<C>().map_or(0, SparseSet::len)
    }

    fn warn_if_dead(&self, e: Entity, op: &str) {
        if cfg!(debug_assertions) && !self.allocator.is_alive(e) {
            log::warn!("{op} called on a dead or never-issued entity {e}");
        }
    }

    /// Adds `v` to `e`'s `C` column; a no-op (value discarded) if `e`
    /// already has a `C`. Calling this on an entity that was never issued
    /// or has been destroyed is a logic error; debug builds log a warning
    /// and the op still completes as a no-op.
    pub fn add_component<C: Component>(&mut self, e: Entity, v: C) {
        self.warn_if_dead(e, "add_component");
        let type_id = registry::component_type_id::<C>();
        let slot = self.ensure_component_slot(type_id);
        let store = slot.get_or_insert_with(|| Box::new(SparseSet::<C>::new()));
        let set = store
            .as_any_mut()
            .downcast_mut::<SparseSet<C>>()
            .expect("component store type mismatch");
        set.add(e.id(), v);
    }

    /// Sets `e`'s `C` value, overwriting any existing one. Debug builds log
    /// a warning if `e` is dead or was never issued; the op still completes.
    pub fn set_component<C: Component>(&mut self, e: Entity, v: C) {
        self.warn_if_dead(e, "set_component");
        let type_id = registry::component_type_id::<C>();
        let slot = self.ensure_component_slot(type_id);
        let store = slot.get_or_insert_with(|| Box::new(SparseSet::<C>::new()));
        let set = store
            .as_any_mut()
            .downcast_mut::<SparseSet<C>>()
            .expect("component store type mismatch");
        set.set(e.id(), v);
    }

    pub fn get_component<C: Component>(&mut self, e: Entity) -> Option<&mut C> {
        self.column_mut::<C>()?.get_mut(e.id())
    }

    pub fn remove_component<C: Component>(&mut self, e: Entity) {
        if let Some(col) = self.column_mut::<C>() {
            col.remove(e.id());
        }
    }

    pub fn has_component<C: Component>(&self, e: Entity) -> bool {
        self.column::<C>().is_some_and(|col| col.contains(e.id()))
    }

    pub(crate) fn has_component_raw<C: Component>(&self, entity_id: u32) -> bool {
        self.column::<C>().is_some_and(|col| col.contains(entity_id))
    }

    // -- tags --------------------------------------------------------------

    fn ensure_tag_slot(&mut self, tag_id: TagTypeId) -> &mut Bitset {
        let idx = tag_id.raw() as usize;
        if idx >= self.tags.len() {
            self.tags.resize_with(idx + 1, Bitset::new);
        }
        &mut self.tags[idx]
    }

    pub fn add_tag<T: Tag>(&mut self, e: Entity) {
        self.warn_if_dead(e, "add_tag");
        let tag_id = registry::tag_type_id::<T>();
        self.ensure_tag_slot(tag_id).set(e.id());
    }

    pub fn remove_tag<T: Tag>(&mut self, e: Entity) {
        let tag_id = registry::tag_type_id::<T>();
        if let Some(bitset) = self.tags.get_mut(tag_id.raw() as usize) {
            bitset.clear(e.id());
        }
    }

    pub fn has_tag<T: Tag>(&self, e: Entity) -> bool {
        self.has_tag_raw::<T>(e.id())
    }

    pub(crate) fn has_tag_raw<T: Tag>(&self, entity_id: u32) -> bool {
        let tag_id = registry::tag_type_id::<T>();
        self.tags
            .get(tag_id.raw() as usize)
            .is_some_and(|b| b.test(entity_id))
    }

    pub(crate) fn tag_population<T: Tag>(&self) -> usize {
        let tag_id = registry::tag_type_id::<T>();
        self.tags.get(tag_id.raw() as usize).map_or(0, Bitset::population)
    }

    // -- queries -------------------------------------------------------

    pub(crate) fn query_pivot_candidates<'w, Req, Tags>(&self) -> Vec<u32>
    where
        Req: RequiredSet<'w>,
        Tags: TagSet,
    {
        if let Some(type_id) = Req::pivot(self) {
            self.components
                .get(type_id.raw() as usize)
                .and_then(|s| s.as_ref())
                .map_or_else(Vec::new, |s| s.entity_ids())
        } else if let Some(tag_id) = Tags::pivot(self) {
            self.tags
                .get(tag_id.raw() as usize)
                .map_or_else(Vec::new, Bitset::set_ids)
        } else {
            self.allocator.alive_ids()
        }
    }

    /// Queries entities matching `Req` (required components), `Forbid`
    /// (forbidden components) and `Tags` (required tags). Each of the three
    /// type parameters is either `()`, a tuple of 1-8 registered
    /// component/tag types, or one of the `WithComponent`/`WithoutComponent`/
    /// `WithTag` wrapper types.
    pub fn query_entities<'w, Req, Forbid, Tags>(&'w mut self) -> QueryIter<'w, Req, Forbid, Tags>
    where
        Req: RequiredSet<'w>,
        Forbid: ForbiddenSet,
        Tags: TagSet,
    {
        QueryIter::new(self)
    }

    // -- systems -------------------------------------------------------

    pub fn add_system<S: System>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    /// Runs every registered system once, in registration order.
    pub fn update_systems(&mut self) {
        let mut systems = std::mem::take(&mut self.systems);
        for system in &mut systems {
            system.update(self);
        }
        self.systems = systems;
    }

    // -- deferred structural mutation ------------------------------------

    /// Queues `f` to run later via [`Self::apply_deferred`]. Useful for
    /// structural mutation (destroying entities, adding/removing components
    /// of the pivot type) that would otherwise invalidate an in-progress
    /// query.
    pub fn defer<F: FnOnce(&mut World) + 'static>(&mut self, f: F) {
        self.deferred.push(Box::new(f));
    }

    pub fn apply_deferred(&mut self) {
        let deferred = std::mem::take(&mut self.deferred);
        for f in deferred {
            f(self);
        }
    }

    pub fn shrink_to_fit(&mut self) {
        self.allocator.shrink_to_fit();
        for slot in self.components.iter_mut().flatten() {
            slot.shrink_to_fit();
        }
        for bitset in &mut self.tags {
            bitset.shrink_to_fit();
        }
    }

    // -- debug introspection -----------------------------------------------

    #[cfg(not(debug_assertions))]
    pub fn dump_all_memory(&self) {
        log::warn!("dump_all_memory is disabled in release builds");
    }

    #[cfg(debug_assertions)]
    pub fn dump_all_memory(&self) {
        println!(
            "World: {} entities, {} component kinds registered",
            self.entity_count(),
            self.components.iter().filter(|s| s.is_some()).count()
        );
        for slot in self.components.iter().flatten() {
            slot.dump_memory_layout();
        }
    }

    #[cfg(not(debug_assertions))]
    pub fn inspect(&self) {
        log::warn!("inspect is disabled in release builds");
    }

    #[cfg(debug_assertions)]
    pub fn inspect(&self) {
        let mut ids = self.allocator.alive_ids();
        ids.sort_unstable();
        println!("World inspector: {} entities alive", ids.len());
        for id in ids {
            let mut components = Vec::new();
            for slot in self.components.iter().flatten() {
                if let Some(entry) = slot.debug_entry(id) {
                    components.push(format!("{}={}", slot.type_name(), entry));
                }
            }
            println!("  entity {id}: {}", components.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, Clone, Copy)]
    struct PlayerTag;
    impl Tag for PlayerTag {}

    #[test]
    fn create_entity_is_alive() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(world.is_alive(e));
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn destroy_entity_clears_alive_flag() {
        let mut world = World::new();
        let e = world.create_entity();
        world.destroy_entity(e);
        assert!(!world.is_alive(e));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn destroy_null_entity_is_noop() {
        let mut world = World::new();
        world.create_entity();
        world.destroy_entity(NULL_ENTITY);
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn add_get_set_remove_roundtrip() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Health(100));
        assert_eq!(world.get_component::<Health>(e), Some(&mut Health(100)));
        world.set_component(e, Health(50));
        assert_eq!(world.get_component::<Health>(e), Some(&mut Health(50)));
        world.remove_component::<Health>(e);
        assert_eq!(world.get_component::<Health>(e), None);
    }

    #[test]
    fn add_on_existing_component_is_noop() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Health(100));
        world.add_component(e, Health(999));
        assert_eq!(world.get_component::<Health>(e), Some(&mut Health(100)));
    }

    #[test]
    fn has_component_reflects_presence() {
        let mut world = World::new();
        let e = world.create_entity();
        assert!(!world.has_component::<Health>(e));
        world.add_component(e, Health(10));
        assert!(world.has_component::<Health>(e));
    }

    #[test]
    fn destroy_cascades_components_and_tags() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Health(10));
        world.add_component(e, Position { x: 1.0, y: 1.0 });
        world.add_tag::<PlayerTag>(e);
        world.destroy_entity(e);
        assert!(!world.has_component::<Health>(e));
        assert!(!world.has_component::<Position>(e));
        assert!(!world.has_tag::<PlayerTag>(e));
    }

    #[test]
    fn tags_add_remove_idempotent() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_tag::<PlayerTag>(e);
        world.add_tag::<PlayerTag>(e);
        assert!(world.has_tag::<PlayerTag>(e));
        world.remove_tag::<PlayerTag>(e);
        assert!(!world.has_tag::<PlayerTag>(e));
    }

    #[test]
    fn entity_id_recycling() {
        let mut world = World::new();
        let e0 = world.create_entity();
        let e1 = world.create_entity();
        let e2 = world.create_entity();
        world.destroy_entity(e1);
        world.destroy_entity(e0);
        assert_eq!(world.create_entity().id(), e0.id());
        assert_eq!(world.create_entity().id(), e1.id());
        let _ = e2;
    }

    #[test]
    fn defer_queues_and_apply_runs_it() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Health(100));
        world.defer(move |w| {
            w.set_component(e, Health(0));
        });
        assert_eq!(world.get_component::<Health>(e), Some(&mut Health(100)));
        world.apply_deferred();
        assert_eq!(world.get_component::<Health>(e), Some(&mut Health(0)));
    }

    #[test]
    fn with_capacity_preallocates_without_changing_behavior() {
        let mut world = World::with_capacity(64);
        let e = world.create_entity();
        assert_eq!(e.id(), 0);
    }
}
