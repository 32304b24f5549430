use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, Memory, memory::VirtualMemory},
    dappreg_register_memory, impl_storable_unbounded,
    memory::{DEVELOPER_INDEX_MEMORY_ID, ListingId},
};
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

//
// DEVELOPER_INDEX
//

thread_local! {
    static DEVELOPER_INDEX: RefCell<DeveloperIndexCore<VirtualMemory<DefaultMemoryImpl>>> =
        RefCell::new(DeveloperIndexCore::new(BTreeMap::init(
            dappreg_register_memory!(DeveloperIndex, DEVELOPER_INDEX_MEMORY_ID),
        )));
}

///
/// DeveloperIndexEntry
///
/// Append-only, insertion order. Deactivating a listing never removes it.
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct DeveloperIndexEntry {
    pub listings: Vec<ListingId>,
}

impl_storable_unbounded!(DeveloperIndexEntry);

///
/// DeveloperIndex
///

pub type DeveloperIndexView = Vec<(Principal, DeveloperIndexEntry)>;

pub struct DeveloperIndex;

impl DeveloperIndex {
    /// Listing ids created by the developer, in registration order.
    #[must_use]
    pub fn get(developer: Principal) -> Vec<ListingId> {
        DEVELOPER_INDEX
            .with_borrow(|core| core.get(developer))
            .map(|entry| entry.listings)
            .unwrap_or_default()
    }

    pub fn append(developer: Principal, id: ListingId) {
        DEVELOPER_INDEX.with_borrow_mut(|core| core.append(developer, id));
    }

    #[must_use]
    pub fn export() -> DeveloperIndexView {
        DEVELOPER_INDEX.with_borrow(DeveloperIndexCore::export)
    }

    #[cfg(test)]
    pub fn clear() {
        DEVELOPER_INDEX.with_borrow_mut(|core| core.map.clear());
    }
}

///
/// DeveloperIndexCore
///

pub struct DeveloperIndexCore<M: Memory> {
    map: BTreeMap<Principal, DeveloperIndexEntry, M>,
}

impl<M: Memory> DeveloperIndexCore<M> {
    pub const fn new(map: BTreeMap<Principal, DeveloperIndexEntry, M>) -> Self {
        Self { map }
    }

    pub fn get(&self, developer: Principal) -> Option<DeveloperIndexEntry> {
        self.map.get(&developer)
    }

    pub fn append(&mut self, developer: Principal, id: ListingId) {
        let mut entry = self.get(developer).unwrap_or_default();
        entry.listings.push(id);
        self.map.insert(developer, entry);
    }

    pub fn export(&self) -> DeveloperIndexView {
        self.map.to_vec()
    }
}

///
/// TESTS
///
