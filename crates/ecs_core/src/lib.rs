//! # sparsecs_core
//!
//! A sparse-set Entity-Component-System runtime: entity allocation,
//! columnar component storage, bitset tags, a pivot-selecting query engine,
//! and a sequential system runner.
//!
//! Components and tags are ordinary Rust types enrolled in a process-wide
//! type registry by implementing [`Component`]/[`Tag`] (or, more
//! conveniently, via the `#[component]`/`#[tag]` attribute macros in
//! `sparsecs_macros`).

mod entity;
mod query;
mod registry;
mod storage;
mod system;
mod tags;
mod world;

pub use entity::{Entity, NULL_ENTITY};
pub use query::{Fetch, ForbiddenSet, QueryIter, RequiredSet, TagSet, WithComponent, WithTag, WithoutComponent};
pub use registry::{Component, ComponentTypeId, Tag, TagTypeId, component_count, tag_count};
pub use system::System;
pub use world::World;
