//! Process-wide type registry.
//!
//! Assigns every registered component kind a dense [`ComponentTypeId`] and
//! every registered tag kind a dense [`TagTypeId`], on first use. The two id
//! spaces are independent counters, so a type implementing both `Component`
//! and `Tag` gets one id in each without collision.

use std::any::{Any, TypeId as StdTypeId};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, OnceLock};

/// Dense id assigned to a registered [`Component`] kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Dense id assigned to a registered [`Tag`] kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagTypeId(u32);

impl TagTypeId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Marker trait gating a type's eligibility to be stored as a component
/// column. Implement it directly, or derive it with `#[component]` from
/// `sparsecs_macros`.
pub trait Component: Any + Send + Sync + Debug + 'static {}

/// Marker trait gating a type's eligibility to be used as a tag. Implement
/// it directly, or derive it with `#[tag]` from `sparsecs_macros`.
pub trait Tag: Any + Send + Sync + 'static {}

struct IdTable {
    ids: HashMap<StdTypeId, u32>,
    next: u32,
}

impl IdTable {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            next: 0,
        }
    }

    fn id_for<T: Any + ?Sized + 'static>(&mut self, name: &'static str) -> u32 {
        let std_id = StdTypeId::of::<T>();
        if let Some(&id) = self.ids.get(&std_id) {
            return id;
        }
        let id = self.next;
        self.next += 1;
        self.ids.insert(std_id, id);
        log::debug!("registered type {name} as id {id}");
        id
    }
}

fn component_table() -> &'static Mutex<IdTable> {
    static TABLE: OnceLock<Mutex<IdTable>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(IdTable::new()))
}

fn tag_table() -> &'static Mutex<IdTable> {
    static TABLE: OnceLock<Mutex<IdTable>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(IdTable::new()))
}

pub fn component_type_id<C: Component>() -> ComponentTypeId {
    let mut table = component_table().lock().expect("component registry poisoned");
    ComponentTypeId(table.id_for::<C>(std::any::type_name::<C>()))
}

pub fn tag_type_id<T: Tag>() -> TagTypeId {
    let mut table = tag_table().lock().expect("tag registry poisoned");
    TagTypeId(table.id_for::<T>(std::any::type_name::<T>()))
}

/// Number of distinct component kinds registered so far in this process.
pub fn component_count() -> usize {
    component_table().lock().expect("component registry poisoned").next as usize
}

/// Number of distinct tag kinds registered so far in this process.
pub fn tag_count() -> usize {
    tag_table().lock().expect("tag registry poisoned").next as usize
}
