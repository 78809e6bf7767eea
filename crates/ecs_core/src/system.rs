//! System runner: an ordered list of updatable objects driven once per
//! [`World::update_systems`](crate::World::update_systems) call.

use crate::World;

/// Anything that can be driven once per `update_systems` call.
///
/// Struct-based systems (mirroring a typical `MoveSystem`/`DamageSystem`
/// split) implement this trait directly; plain closures work too via the
/// blanket impl below.
pub trait System: 'static {
    fn update(&mut self, world: &mut World);
}

impl<F: FnMut(&mut World) + 'static> System for F {
    fn update(&mut self, world: &mut World) {
        self(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Component;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter(u32);
    impl Component for Counter {}

    struct IncrementAll;
    impl System for IncrementAll {
        fn update(&mut self, world: &mut World) {
            for (_, (counter,)) in world.query_entities::<(Counter,), (), ()>() {
                counter.0 += 1;
            }
        }
    }

    #[test]
    fn struct_system_runs_in_order() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Counter(0));
        world.add_system(IncrementAll);
        world.update_systems();
        world.update_systems();
        assert_eq!(world.get_component::<Counter>(e), Some(&mut Counter(2)));
    }

    #[test]
    fn closure_system_works_via_blanket_impl() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Counter(10));
        world.add_system(move |w: &mut World| {
            if let Some(c) = w.get_component::<Counter>(e) {
                c.0 += 5;
            }
        });
        world.update_systems();
        assert_eq!(world.get_component::<Counter>(e), Some(&mut Counter(15)));
    }

    #[test]
    fn systems_run_in_registration_order() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Counter(0));
        world.add_system(move |w: &mut World| {
            if let Some(c) = w.get_component::<Counter>(e) {
                c.0 = 1;
            }
        });
        world.add_system(move |w: &mut World| {
            if let Some(c) = w.get_component::<Counter>(e) {
                assert_eq!(c.0, 1);
                c.0 = 2;
            }
        });
        world.update_systems();
        assert_eq!(world.get_component::<Counter>(e), Some(&mut Counter(2)));
    }
}
