use crate::{
    Error,
    cdk::structures::{
        BTreeMap, DefaultMemoryImpl,
        memory::{MemoryId, VirtualMemory},
    },
    impl_storable_unbounded,
    memory::{MEMORY_MANAGER, MEMORY_REGISTRY_MEMORY_ID, MemoryError},
    utils::time::now_secs,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use thiserror::Error as ThisError;

// thread local
thread_local! {
    static MEMORY_REGISTRY: RefCell<BTreeMap<u8, MemoryRegistryEntry, VirtualMemory<DefaultMemoryImpl>>> =
        RefCell::new(BTreeMap::init(
            MEMORY_MANAGER.with_borrow(|this| {
                this.get(MemoryId::new(MEMORY_REGISTRY_MEMORY_ID))
            }),
        ));
}

///
/// MemoryRegistryError
///

#[derive(Debug, ThisError)]
pub enum MemoryRegistryError {
    #[error("memory id {0} already claimed by {1}, refused {2}")]
    IdClash(u8, String, String),

    #[error("memory id {0} is reserved for the registry itself")]
    Reserved(u8),
}

///
/// MemoryRegistryEntry
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MemoryRegistryEntry {
    pub path: String,
    pub created_at: u64,
}

impl MemoryRegistryEntry {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            created_at: now_secs(),
        }
    }
}

impl_storable_unbounded!(MemoryRegistryEntry);

///
/// MemoryRegistry
///

pub struct MemoryRegistry;

pub type MemoryRegistryView = Vec<(u8, MemoryRegistryEntry)>;

impl MemoryRegistry {
    #[must_use]
    pub fn is_empty() -> bool {
        MEMORY_REGISTRY.with_borrow(|map| map.is_empty())
    }

    #[must_use]
    pub const fn is_reserved(id: u8) -> bool {
        id == MEMORY_REGISTRY_MEMORY_ID
    }

    /// Claim a memory id for the type at `path`.
    ///
    /// Re-claiming an id with its own path is a no-op; claiming it for a
    /// different path is a wiring bug and fails.
    pub fn register(id: u8, path: &str) -> Result<(), Error> {
        if Self::is_reserved(id) {
            return Err(MemoryError::from(MemoryRegistryError::Reserved(id)).into());
        }

        MEMORY_REGISTRY.with_borrow_mut(|map| match map.get(&id) {
            Some(existing) if existing.path == path => Ok(()),

            Some(existing) => Err(MemoryError::from(MemoryRegistryError::IdClash(
                id,
                existing.path,
                path.to_string(),
            ))
            .into()),

            None => {
                map.insert(id, MemoryRegistryEntry::new(path));

                Ok(())
            }
        })
    }

    #[must_use]
    pub fn get(id: u8) -> Option<MemoryRegistryEntry> {
        MEMORY_REGISTRY.with_borrow(|map| map.get(&id))
    }

    #[must_use]
    pub fn export() -> MemoryRegistryView {
        MEMORY_REGISTRY.with_borrow(BTreeMap::to_vec)
    }

    pub fn clear() {
        MEMORY_REGISTRY.with_borrow_mut(BTreeMap::clear);
    }
}

///
/// TESTS
///
