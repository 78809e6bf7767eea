//! System Demo
//!
//! The Move / Damage / Health system triad, matching the benchmark this
//! runtime's query semantics were validated against: entities move every
//! tick, take fixed damage, and lose their `Alive` tag once health reaches
//! zero.

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
struct Health(i32);

#[component]
struct Damage(i32);

#[tag]
struct Alive;

struct MoveSystem;
impl System for MoveSystem {
    fn update(&mut self, world: &mut World) {
        for (_, (pos, vel)) in world.query_entities::<
            WithComponent<(Position, Velocity)>,
            WithoutComponent<()>,
            WithTag<(Alive,)>,
        >() {
            pos.x += vel.x;
            pos.y += vel.y;
        }
    }
}

struct DamageSystem;
impl System for DamageSystem {
    fn update(&mut self, world: &mut World) {
        for (_, (damage,)) in world.query_entities::<
            WithComponent<(Damage,)>,
            WithoutComponent<()>,
            WithTag<(Alive,)>,
        >() {
            damage.0 = 25;
        }
    }
}

struct HealthSystem;
impl System for HealthSystem {
    fn update(&mut self, world: &mut World) {
        let dying: Vec<Entity> = {
            let mut dying = Vec::new();
            for (entity, (health, damage)) in world.query_entities::<
                WithComponent<(Health, Damage)>,
                WithoutComponent<()>,
                WithTag<(Alive,)>,
            >() {
                health.0 -= damage.0;
                if health.0 <= 0 {
                    health.0 = 0;
                    dying.push(entity);
                }
            }
            dying
        };
        for entity in dying {
            world.remove_tag::<Alive>(entity);
        }
    }
}

fn main() {
    env_logger::init();
    println!("=== System Demo: Move/Damage/Health triad ===\n");

    let mut world = World::new();
    for _ in 0..3 {
        let e = world.create_entity();
        world.add_component(e, Position { x: 0.0, y: 0.0 });
        world.add_component(e, Velocity { x: 1.0, y: 1.0 });
        world.add_component(e, Health(50));
        world.add_component(e, Damage(0));
        world.add_tag::<Alive>(e);
    }

    world.add_system(MoveSystem);
    world.add_system(DamageSystem);
    world.add_system(HealthSystem);

    for tick in 1..=3 {
        world.update_systems();
        println!("tick {tick}:");
        for (entity, (pos, health)) in world.query_entities::<WithComponent<(Position, Health)>, WithoutComponent<()>, WithTag<()>>() {
            println!(
                "  {entity} pos=({:.1}, {:.1}) health={} alive={}",
                pos.x,
                pos.y,
                health.0,
                world.has_tag::<Alive>(entity)
            );
        }
    }
}
