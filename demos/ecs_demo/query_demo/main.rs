//! Query Demo
//!
//! Demonstrates `WithComponent`/`WithoutComponent`/`WithTag` filtering and
//! the pivot-column selection that keeps queries cheap.

use sparsecs::prelude::*;

#[component]
struct Position {
    x: f32,
    y: f32,
}

#[component]
struct Velocity {
    x: f32,
    y: f32,
}

#[component]
struct Health(f32);

#[component]
struct Name(String);

#[component]
struct Armor;

fn main() {
    env_logger::init();
    println!("=== Query Demo: filtering ===\n");

    let mut world = World::new();

    let player = world.create_entity();
    world.add_component(player, Name("Player".into()));
    world.add_component(player, Position { x: 0.0, y: 0.0 });
    world.add_component(player, Velocity { x: 1.0, y: 1.0 });
    world.add_component(player, Health(100.0));
    world.add_component(player, Armor);

    let enemy = world.create_entity();
    world.add_component(enemy, Name("Enemy".into()));
    world.add_component(enemy, Position { x: 5.0, y: 5.0 });
    world.add_component(enemy, Velocity { x: -1.0, y: 0.0 });
    world.add_component(enemy, Health(100.0));

    let rock = world.create_entity();
    world.add_component(rock, Name("Rock".into()));
    world.add_component(rock, Position { x: 10.0, y: 10.0 });

    world.inspect();

    println!("\n[Movement] updating entities with Position+Velocity:");
    for (entity, (pos, vel)) in world.query_entities::<WithComponent<(Position, Velocity)>, WithoutComponent<()>, WithTag<()>>() {
        pos.x += vel.x;
        pos.y += vel.y;
        println!("  {entity} moved to ({:.1}, {:.1})", pos.x, pos.y);
    }

    println!("\n[Combat] environmental damage, armored entities take less:");
    for (entity, (hp,)) in world.query_entities::<WithComponent<(Health,)>, WithoutComponent<(Armor,)>, WithTag<()>>() {
        hp.0 -= 20.0;
        println!("  {entity} (no armor) took 20 damage, hp now {:.1}", hp.0);
    }
    for (entity, (hp, _armor)) in world.query_entities::<WithComponent<(Health, Armor)>, WithoutComponent<()>, WithTag<()>>() {
        hp.0 -= 5.0;
        println!("  {entity} (armored) took 5 damage, hp now {:.1}", hp.0);
    }

    println!("\n[Filter] entities with Name but no Velocity (static):");
    for (entity, (name,)) in world.query_entities::<WithComponent<(Name,)>, WithoutComponent<(Velocity,)>, WithTag<()>>() {
        println!("  {entity} is static: {}", name.0);
    }

    let _ = rock;
}
