use crate::{
    cdk::structures::{DefaultMemoryImpl, Memory, cell::Cell, memory::VirtualMemory},
    dappreg_register_memory, impl_storable_bounded,
    memory::{ListingId, REGISTRY_STATE_MEMORY_ID},
};
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

//
// REGISTRY_STATE
// owner identity plus the next-id counter, in one stable cell
//

thread_local! {
    static REGISTRY_STATE: RefCell<RegistryStateCore<VirtualMemory<DefaultMemoryImpl>>> =
        RefCell::new(RegistryStateCore::new(Cell::init(
            dappreg_register_memory!(RegistryState, REGISTRY_STATE_MEMORY_ID),
            RegistryStateData::default(),
        )));
}

///
/// RegistryStateData
///
/// `owner` is the administrative identity, set once at canister init to the
/// deployer and replaced only via ownership transfer. `next_listing_id`
/// starts at 0 and only ever increments.
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegistryStateData {
    pub owner: Option<Principal>,
    pub next_listing_id: ListingId,
}

impl_storable_bounded!(RegistryStateData, 128, false);

///
/// RegistryState
///

pub struct RegistryState;

impl RegistryState {
    #[must_use]
    pub fn owner() -> Option<Principal> {
        REGISTRY_STATE.with_borrow(|core| core.get().owner)
    }

    pub fn set_owner(owner: Principal) {
        REGISTRY_STATE.with_borrow_mut(|core| {
            let mut data = core.get();
            data.owner = Some(owner);
            core.set(data);
        });
    }

    /// Allocate the next sequential listing id.
    pub fn allocate_listing_id() -> ListingId {
        REGISTRY_STATE.with_borrow_mut(|core| {
            let mut data = core.get();
            let id = data.next_listing_id;
            data.next_listing_id += 1;
            core.set(data);

            id
        })
    }

    #[must_use]
    pub fn export() -> RegistryStateData {
        REGISTRY_STATE.with_borrow(RegistryStateCore::get)
    }

    #[cfg(test)]
    pub fn clear() {
        REGISTRY_STATE.with_borrow_mut(|core| core.set(RegistryStateData::default()));
    }
}

///
/// RegistryStateCore
///

pub struct RegistryStateCore<M: Memory> {
    cell: Cell<RegistryStateData, M>,
}

impl<M: Memory> RegistryStateCore<M> {
    pub const fn new(cell: Cell<RegistryStateData, M>) -> Self {
        Self { cell }
    }

    pub fn get(&self) -> RegistryStateData {
        *self.cell.get()
    }

    pub fn set(&mut self, data: RegistryStateData) {
        self.cell.set(data);
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_allocate_monotonically_from_zero() {
        RegistryState::clear();

        assert_eq!(RegistryState::allocate_listing_id(), 0);
        assert_eq!(RegistryState::allocate_listing_id(), 1);
        assert_eq!(RegistryState::allocate_listing_id(), 2);
    }

    #[test]
    fn owner_starts_unset_and_is_replaceable() {
        RegistryState::clear();
        assert!(RegistryState::owner().is_none());

        let a = Principal::from_slice(&[1; 29]);
        let b = Principal::from_slice(&[2; 29]);

        RegistryState::set_owner(a);
        assert_eq!(RegistryState::owner(), Some(a));

        RegistryState::set_owner(b);
        assert_eq!(RegistryState::owner(), Some(b));
    }
}
