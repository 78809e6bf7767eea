//! Tag Demo
//!
//! Demonstrates typed tags: zero-payload markers stored as bitsets,
//! queryable via `WithTag`.

use sparsecs::prelude::*;

#[component]
struct Name(String);

#[tag]
struct Npc;

#[tag]
struct Friendly;

fn main() {
    env_logger::init();
    println!("=== Tag Demo ===\n");

    let mut world = World::new();

    let guard = world.create_entity();
    world.add_component(guard, Name("Guard".into()));
    world.add_tag::<Npc>(guard);

    let merchant = world.create_entity();
    world.add_component(merchant, Name("Merchant".into()));
    world.add_tag::<Npc>(merchant);
    world.add_tag::<Friendly>(merchant);

    let bandit = world.create_entity();
    world.add_component(bandit, Name("Bandit".into()));
    world.add_tag::<Npc>(bandit);

    println!("NPCs that are also friendly:");
    for (entity, (name,)) in world.query_entities::<WithComponent<(Name,)>, WithoutComponent<()>, WithTag<(Npc, Friendly)>>() {
        println!("  {entity}: {}", name.0);
    }

    println!("\nNPCs that are not friendly:");
    let npcs: Vec<Entity> = world
        .query_entities::<WithComponent<(Name,)>, WithoutComponent<()>, WithTag<(Npc,)>>()
        .map(|(entity, _)| entity)
        .collect();
    for entity in npcs {
        if !world.has_tag::<Friendly>(entity) {
            let name = world.get_component::<Name>(entity).unwrap();
            println!("  {entity}: {}", name.0);
        }
    }

    world.remove_tag::<Friendly>(merchant);
    println!(
        "\nAfter removing Friendly from merchant: has_tag = {}",
        world.has_tag::<Friendly>(merchant)
    );
}
