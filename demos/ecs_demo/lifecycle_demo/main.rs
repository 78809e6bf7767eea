//! Lifecycle Demo
//!
//! Demonstrates entity spawning, destruction, id recycling, and deferred
//! operations, driven by a plain loop rather than a game-engine scheduler.

use sparsecs::prelude::*;

#[component]
struct Health(i32);

#[component]
struct Lifetime(u32);

#[tag]
struct Temporary;

fn main() {
    env_logger::init();
    println!("=== Lifecycle Demo ===\n");

    let mut world = World::new();

    let permanent = world.create_entity();
    world.add_component(permanent, Health(100));

    let mut temporaries = Vec::new();
    for i in 1..=3u32 {
        let e = world.create_entity();
        world.add_component(e, Health(10 * i as i32));
        world.add_component(e, Lifetime(i));
        world.add_tag::<Temporary>(e);
        temporaries.push(e);
    }

    println!("[SETUP] {} entities alive\n", world.entity_count());
    world.inspect();

    for frame in 1..=5u32 {
        println!("\n[FRAME {frame}] checking lifetimes...");

        let mut expired = Vec::new();
        for (entity, (lifetime,)) in world.query_entities::<(Lifetime,), (), ()>() {
            if frame >= lifetime.0 {
                expired.push((entity, lifetime.0));
            } else {
                println!("  {entity} has {} frames left", lifetime.0 - frame);
            }
        }
        for (entity, lifetime) in expired {
            world.defer(move |w| w.destroy_entity(entity));
            println!("  {entity} expired (lifetime was {lifetime})");
        }
        world.apply_deferred();

        if frame == 2 {
            let e = world.create_entity();
            world.add_component(e, Health(999));
            world.add_component(e, Lifetime(4));
            world.add_tag::<Temporary>(e);
            println!("  [SPAWN] created {e} on frame 2");
        }
    }

    println!("\n=== Final State ===");
    world.inspect();
    println!("{} entities remain", world.entity_count());
}
