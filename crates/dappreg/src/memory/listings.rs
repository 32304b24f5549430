use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, Memory, memory::VirtualMemory},
    dappreg_register_memory, impl_storable_unbounded,
    memory::LISTING_REGISTRY_MEMORY_ID,
};
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

//
// LISTING_REGISTRY
//

thread_local! {
    static LISTING_REGISTRY: RefCell<ListingRegistryCore<VirtualMemory<DefaultMemoryImpl>>> =
        RefCell::new(ListingRegistryCore::new(BTreeMap::init(
            dappreg_register_memory!(ListingRegistry, LISTING_REGISTRY_MEMORY_ID),
        )));
}

///
/// ListingId
///
/// Sequential, assigned at creation starting from 0, never reused.
///

pub type ListingId = u64;

///
/// Listing
///
/// A listing exists iff an entry is present under its id; `developer` is set
/// at creation and never changes. Only `active` is mutable afterwards.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub developer: Principal,
    pub name: String,
    pub url: String,
    pub category: String,
    pub created_at: u64,
    pub active: bool,
}

impl_storable_unbounded!(Listing);

///
/// ListingRegistry
///

pub type ListingRegistryView = Vec<(ListingId, Listing)>;

pub struct ListingRegistry;

impl ListingRegistry {
    #[must_use]
    pub fn get(id: ListingId) -> Option<Listing> {
        LISTING_REGISTRY.with_borrow(|core| core.get(id))
    }

    #[must_use]
    pub fn exists(id: ListingId) -> bool {
        LISTING_REGISTRY.with_borrow(|core| core.get(id).is_some())
    }

    pub fn insert(listing: Listing) {
        LISTING_REGISTRY.with_borrow_mut(|core| core.insert(listing));
    }

    #[must_use]
    pub fn len() -> u64 {
        LISTING_REGISTRY.with_borrow(ListingRegistryCore::len)
    }

    #[must_use]
    pub fn export() -> ListingRegistryView {
        LISTING_REGISTRY.with_borrow(ListingRegistryCore::export)
    }

    #[cfg(test)]
    pub fn clear() {
        LISTING_REGISTRY.with_borrow_mut(|core| core.map.clear());
    }
}

///
/// ListingRegistryCore
///

pub struct ListingRegistryCore<M: Memory> {
    map: BTreeMap<ListingId, Listing, M>,
}

impl<M: Memory> ListingRegistryCore<M> {
    pub const fn new(map: BTreeMap<ListingId, Listing, M>) -> Self {
        Self { map }
    }

    pub fn get(&self, id: ListingId) -> Option<Listing> {
        self.map.get(&id)
    }

    pub fn insert(&mut self, listing: Listing) {
        self.map.insert(listing.id, listing);
    }

    pub fn len(&self) -> u64 {
        self.map.len()
    }

    pub fn export(&self) -> ListingRegistryView {
        self.map.to_vec()
    }
}
