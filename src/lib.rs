//! # sparsecs
//!
//! A sparse-set Entity-Component-System runtime for data-oriented
//! simulations: columnar component storage, bitset tags, a
//! pivot-selecting query engine, and a sequential system runner.
//!
//! # Example
//! ```ignore
//! use sparsecs::prelude::*;
//!
//! #[component]
//! struct Position { x: f32, y: f32 }
//!
//! #[component]
//! struct Velocity { x: f32, y: f32 }
//!
//! #[tag]
//! struct Alive;
//!
//! struct MoveSystem;
//! impl System for MoveSystem {
//!     fn update(&mut self, world: &mut World) {
//!         for (_, (pos, vel)) in world.query_entities::<
//!             WithComponent<(Position, Velocity)>,
//!             WithoutComponent<()>,
//!             WithTag<(Alive,)>,
//!         >() {
//!             pos.x += vel.x;
//!             pos.y += vel.y;
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let mut world = World::new();
//!     let player = world.create_entity();
//!     world.add_component(player, Position { x: 0.0, y: 0.0 });
//!     world.add_component(player, Velocity { x: 1.0, y: 1.0 });
//!     world.add_tag::<Alive>(player);
//!
//!     world.add_system(MoveSystem);
//!     world.update_systems();
//! }
//! ```

pub use log;
pub use sparsecs_core::*;

#[cfg(feature = "derive")]
pub use sparsecs_macros::{component, tag};

/// Runtime version, as declared in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    //! Common imports for `sparsecs` consumers.
    #[cfg(feature = "derive")]
    pub use crate::{component, tag};
    pub use sparsecs_core::{
        Component, Entity, Fetch, ForbiddenSet, NULL_ENTITY, QueryIter, RequiredSet, System, Tag,
        TagSet, WithComponent, WithTag, WithoutComponent, World,
    };
}
