//! Query engine: `WithComponent` / `WithoutComponent` / `WithTag` filters
//! over a [`World`], with pivot selection bounding the scan to the smallest
//! candidate set rather than all entities.

use crate::World;
use crate::entity::Entity;
use crate::registry::{Component, ComponentTypeId, Tag, TagTypeId};
use std::marker::PhantomData;

/// Fetches a single required component's mutable reference for a query.
///
/// Blanket-implemented for every registered [`Component`]; user code never
/// implements this directly.
pub trait Fetch<'w> {
    type Output;
    fn type_id() -> ComponentTypeId;
    fn store_len(world: &World) -> usize;
    fn fetch(world: &'w mut World, entity_id: u32) -> Option<Self::Output>;
}

impl<'w, C: Component> Fetch<'w> for C {
    type Output = &'w mut C;

    fn type_id() -> ComponentTypeId {
        crate::registry::component_type_id::<C>()
    }

    fn store_len(world: &World) -> usize {
        world.column_len::<C>()
    }

    fn fetch(world: &'w mut World, entity_id: u32) -> Option<Self::Output> {
        world.column_mut::<C>()?.get_mut(entity_id)
    }
}

/// A tuple of 0..=8 required component types. Selects the query pivot (the
/// smallest column among the tuple's members, tie-broken by lowest
/// [`ComponentTypeId`]) and fetches the full tuple of mutable references.
pub trait RequiredSet<'w> {
    type Output;
    fn pivot(world: &World) -> Option<ComponentTypeId>;
    fn fetch_all(world: &'w mut World, entity_id: u32) -> Option<Self::Output>;
}

impl<'w> RequiredSet<'w> for () {
    type Output = ();
    fn pivot(_world: &World) -> Option<ComponentTypeId> {
        None
    }
    fn fetch_all(_world: &'w mut World, _entity_id: u32) -> Option<Self::Output> {
        Some(())
    }
}

/// A tuple of 0..=8 forbidden component types: entities carrying any of
/// them are excluded from query results.
pub trait ForbiddenSet {
    fn none_present(world: &World, entity_id: u32) -> bool;
}

impl ForbiddenSet for () {
    fn none_present(_world: &World, _entity_id: u32) -> bool {
        true
    }
}

/// A tuple of 0..=8 required tag types.
pub trait TagSet {
    fn all_present(world: &World, entity_id: u32) -> bool;
    /// Smallest tag bitset among the tuple's members, used as a fallback
    /// pivot when the required-component list is empty.
    fn pivot(world: &World) -> Option<TagTypeId>;
}

impl TagSet for () {
    fn all_present(_world: &World, _entity_id: u32) -> bool {
        true
    }
    fn pivot(_world: &World) -> Option<TagTypeId> {
        None
    }
}

macro_rules! impl_required_set {
    ($($name:ident),+) => {
        impl<'w, $($name: Component),+> RequiredSet<'w> for ($($name,)+) {
            type Output = ($(<$name as Fetch<'w>>::Output,)+);

            fn pivot(world: &World) -> Option<ComponentTypeId> {
                let candidates = [
                    $((<$name as Fetch<'w>>::type_id(), <$name as Fetch<'w>>::store_len(world)),)+
                ];
                candidates
                    .into_iter()
                    .min_by_key(|&(type_id, len)| (len, type_id.raw()))
                    .map(|(type_id, _)| type_id)
            }

            fn fetch_all(world: &'w mut World, entity_id: u32) -> Option<Self::Output> {
                // SAFETY: each `$name` addresses a distinct component column
                // (component kinds have disjoint type ids), so the mutable
                // references produced below never alias each other.
                let world_ptr = world as *mut World;
                unsafe {
                    Some(($(<$name as Fetch<'w>>::fetch(&mut *world_ptr, entity_id)?,)+))
                }
            }
        }
    };
}

impl_required_set!(A);
impl_required_set!(A, B);
impl_required_set!(A, B, C);
impl_required_set!(A, B, C, D);
impl_required_set!(A, B, C, D, E);
impl_required_set!(A, B, C, D, E, F);
impl_required_set!(A, B, C, D, E, F, G);
impl_required_set!(A, B, C, D, E, F, G, H);

macro_rules! impl_forbidden_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ForbiddenSet for ($($name,)+) {
            fn none_present(world: &World, entity_id: u32) -> bool {
                $(!world.has_component_raw::<$name>(entity_id))&&+
            }
        }
    };
}

impl_forbidden_set!(A);
impl_forbidden_set!(A, B);
impl_forbidden_set!(A, B, C);
impl_forbidden_set!(A, B, C, D);
impl_forbidden_set!(A, B, C, D, E);
impl_forbidden_set!(A, B, C, D, E, F);
impl_forbidden_set!(A, B, C, D, E, F, G);
impl_forbidden_set!(A, B, C, D, E, F, G, H);

macro_rules! impl_tag_set {
    ($($name:ident),+) => {
        impl<$($name: Tag),+> TagSet for ($($name,)+) {
            fn all_present(world: &World, entity_id: u32) -> bool {
                $(world.has_tag_raw::<$name>(entity_id))&&+
            }

            fn pivot(world: &World) -> Option<TagTypeId> {
                let candidates = [
                    $((crate::registry::tag_type_id::<$name>(), world.tag_population::<$name>()),)+
                ];
                candidates
                    .into_iter()
                    .min_by_key(|&(tag_id, population)| (population, tag_id.raw()))
                    .map(|(tag_id, _)| tag_id)
            }
        }
    };
}

impl_tag_set!(A);
impl_tag_set!(A, B);
impl_tag_set!(A, B, C);
impl_tag_set!(A, B, C, D);
impl_tag_set!(A, B, C, D, E);
impl_tag_set!(A, B, C, D, E, F);
impl_tag_set!(A, B, C, D, E, F, G);
impl_tag_set!(A, B, C, D, E, F, G, H);

/// Wraps a tuple of required component types, e.g.
/// `WithComponent<(Position, Velocity)>`.
pub struct WithComponent<T>(PhantomData<T>);

/// Wraps a tuple of forbidden component types, e.g.
/// `WithoutComponent<(Frozen,)>`, or `WithoutComponent<()>` for none.
pub struct WithoutComponent<T>(PhantomData<T>);

/// Wraps a tuple of required tag types, e.g. `WithTag<(Alive,)>`, or
/// `WithTag<()>` for none.
pub struct WithTag<T>(PhantomData<T>);

impl<'w, T: RequiredSet<'w>> RequiredSet<'w> for WithComponent<T> {
    type Output = T::Output;
    fn pivot(world: &World) -> Option<ComponentTypeId> {
        T::pivot(world)
    }
    fn fetch_all(world: &'w mut World, entity_id: u32) -> Option<Self::Output> {
        T::fetch_all(world, entity_id)
    }
}

impl<T: ForbiddenSet> ForbiddenSet for WithoutComponent<T> {
    fn none_present(world: &World, entity_id: u32) -> bool {
        T::none_present(world, entity_id)
    }
}

impl<T: TagSet> TagSet for WithTag<T> {
    fn all_present(world: &World, entity_id: u32) -> bool {
        T::all_present(world, entity_id)
    }
    fn pivot(world: &World) -> Option<TagTypeId> {
        T::pivot(world)
    }
}

/// Lazy sequence of entities (and their required components) produced by
/// [`World::query_entities`]. Borrows the world for its lifetime: no
/// structural mutation (adding/removing components or tags, destroying
/// entities) may happen while this iterator is alive.
pub struct QueryIter<'w, Req, Forbid, Tags> {
    world: &'w mut World,
    candidates: std::vec::IntoIter<u32>,
    _marker: PhantomData<(Req, Forbid, Tags)>,
}

impl<'w, Req, Forbid, Tags> QueryIter<'w, Req, Forbid, Tags>
where
    Req: RequiredSet<'w>,
    Forbid: ForbiddenSet,
    Tags: TagSet,
{
    pub(crate) fn new(world: &'w mut World) -> Self {
        let candidates = world.query_pivot_candidates::<Req, Tags>();
        Self {
            world,
            candidates: candidates.into_iter(),
            _marker: PhantomData,
        }
    }
}

impl<'w, Req, Forbid, Tags> Iterator for QueryIter<'w, Req, Forbid, Tags>
where
    Req: RequiredSet<'w>,
    Forbid: ForbiddenSet,
    Tags: TagSet,
{
    type Item = (Entity, Req::Output);

    fn next(&mut self) -> Option<Self::Item> {
        for id in self.candidates.by_ref() {
            if !Forbid::none_present(self.world, id) {
                continue;
            }
            if !Tags::all_present(self.world, id) {
                continue;
            }
            // SAFETY: `world` is reborrowed with the iterator's own lifetime
            // `'w`, matching `self.world`'s type; each candidate id is
            // visited at most once, so no two `fetch_all` calls ever target
            // the same entity concurrently.
            let world_ptr = self.world as *mut World;
            if let Some(output) = unsafe { Req::fetch_all(&mut *world_ptr, id) } {
                return Some((Entity::from_raw(id), output));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::World;
    use crate::registry::{Component, Tag};

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }
    impl Component for Position {}

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        x: f32,
        y: f32,
    }
    impl Component for Velocity {}

    #[derive(Debug, Clone, PartialEq)]
    struct Frozen;
    impl Component for Frozen {}

    #[derive(Debug, Clone, Copy)]
    struct Alive;
    impl Tag for Alive {}

    #[test]
    fn query_single_required_component() {
        let mut world = World::new();
        let e0 = world.create_entity();
        world.add_component(e0, Position { x: 1.0, y: 2.0 });
        let e1 = world.create_entity();
        world.add_component(e1, Position { x: 3.0, y: 4.0 });

        let count = world
            .query_entities::<(Position,), (), ()>()
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn query_with_forbidden_and_tag() {
        let mut world = World::new();
        let mut ids = Vec::new();
        for _ in 0..5 {
            let e = world.create_entity();
            world.add_component(e, Position { x: 0.0, y: 0.0 });
            ids.push(e);
        }
        world.add_component(ids[0], Velocity { x: 1.0, y: 0.0 });
        world.add_component(ids[2], Velocity { x: 1.0, y: 0.0 });
        world.add_component(ids[4], Velocity { x: 1.0, y: 0.0 });
        world.add_tag::<Alive>(ids[0]);
        world.add_tag::<Alive>(ids[1]);
        world.add_tag::<Alive>(ids[2]);

        let matched: Vec<_> = world
            .query_entities::<(Position,), (Velocity,), (Alive,)>()
            .map(|(e, _)| e)
            .collect();

        assert_eq!(matched, vec![ids[1]]);
    }

    #[test]
    fn query_fetches_mutable_references() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Position { x: 0.0, y: 0.0 });
        world.add_component(e, Velocity { x: 2.0, y: 3.0 });

        for (_, (pos, vel)) in world.query_entities::<(Position, Velocity), (), ()>() {
            pos.x += vel.x;
            pos.y += vel.y;
        }

        assert_eq!(world.get_component::<Position>(e), Some(&mut Position { x: 2.0, y: 3.0 }));
    }

    #[test]
    fn query_excludes_entities_missing_a_required_component() {
        let mut world = World::new();
        let e0 = world.create_entity();
        world.add_component(e0, Position { x: 0.0, y: 0.0 });
        let e1 = world.create_entity();
        world.add_component(e1, Position { x: 0.0, y: 0.0 });
        world.add_component(e1, Velocity { x: 1.0, y: 1.0 });

        let matched: Vec<_> = world
            .query_entities::<(Position, Velocity), (), ()>()
            .map(|(e, _)| e)
            .collect();
        assert_eq!(matched, vec![e1]);
    }

    #[test]
    fn query_pivots_on_smallest_required_column() {
        let mut world = World::new();
        for _ in 0..100 {
            let e = world.create_entity();
            world.add_component(e, Position { x: 0.0, y: 0.0 });
        }
        let tracked = world.create_entity();
        world.add_component(tracked, Position { x: 9.0, y: 9.0 });
        world.add_component(tracked, Velocity { x: 1.0, y: 1.0 });

        let matched: Vec<_> = world
            .query_entities::<(Velocity, Position), (), ()>()
            .map(|(e, _)| e)
            .collect();
        assert_eq!(matched, vec![tracked]);
    }
}
