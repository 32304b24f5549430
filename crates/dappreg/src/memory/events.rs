use crate::{
    Error,
    cdk::structures::{
        DefaultMemoryImpl,
        log::{Log as StableLogImpl, WriteError},
        memory::VirtualMemory,
    },
    dappreg_register_memory, impl_storable_unbounded,
    memory::{EVENT_LOG_DATA_MEMORY_ID, EVENT_LOG_INDEX_MEMORY_ID, ListingId, MemoryError},
    utils::time,
};
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use thiserror::Error as ThisError;

//
// EVENT_LOG
// append-only, one record per committed mutation, in mutation order
//

type EventLogStorage =
    StableLogImpl<EventEntry, VirtualMemory<DefaultMemoryImpl>, VirtualMemory<DefaultMemoryImpl>>;

// Marker structs for the memory registry
struct EventLogIndexMemory;
struct EventLogDataMemory;

fn create_log() -> EventLogStorage {
    StableLogImpl::init(
        dappreg_register_memory!(EventLogIndexMemory, EVENT_LOG_INDEX_MEMORY_ID),
        dappreg_register_memory!(EventLogDataMemory, EVENT_LOG_DATA_MEMORY_ID),
    )
}

#[cfg(test)]
fn reset_log() -> EventLogStorage {
    StableLogImpl::new(
        dappreg_register_memory!(EventLogIndexMemory, EVENT_LOG_INDEX_MEMORY_ID),
        dappreg_register_memory!(EventLogDataMemory, EVENT_LOG_DATA_MEMORY_ID),
    )
}

thread_local! {
    static EVENT_LOG: RefCell<EventLogStorage> = RefCell::new(create_log());
}

///
/// EventLogError
///

#[derive(Debug, ThisError)]
pub enum EventLogError {
    #[error("event write failed: current_size={current_size}, delta={delta}")]
    WriteFailed { current_size: u64, delta: u64 },
}

impl From<WriteError> for EventLogError {
    fn from(err: WriteError) -> Self {
        let WriteError::GrowFailed {
            current_size,
            delta,
        } = err;

        Self::WriteFailed {
            current_size,
            delta,
        }
    }
}

///
/// RegistryEvent
///
/// Payloads mirror the fields of the mutation that produced them; the rating
/// payload carries the post-update aggregates.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RegistryEvent {
    ListingRegistered {
        id: ListingId,
        developer: Principal,
        name: String,
        url: String,
        category: String,
    },
    ListingStatusChanged {
        id: ListingId,
        active: bool,
    },
    ListingRated {
        id: ListingId,
        rater: Principal,
        rating: u8,
        rating_count: u64,
        rating_sum: u64,
    },
    OwnershipTransferred {
        previous_owner: Option<Principal>,
        new_owner: Principal,
    },
}

///
/// EventEntry
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventEntry {
    pub created_at: u64,
    pub event: RegistryEvent,
}

impl EventEntry {
    #[must_use]
    pub fn new(event: RegistryEvent) -> Self {
        Self {
            created_at: time::now_secs(),
            event,
        }
    }
}

impl_storable_unbounded!(EventEntry);

///
/// EventLog
///

pub struct EventLog;

impl EventLog {
    /// Append one event record. Called synchronously inside the mutation
    /// that the record describes, after all validation has passed.
    pub fn append(event: RegistryEvent) -> Result<u64, Error> {
        let entry = EventEntry::new(event);

        let index = EVENT_LOG
            .with_borrow(|log| log.append(&entry))
            .map_err(EventLogError::from)
            .map_err(MemoryError::from)?;

        Ok(index)
    }

    #[must_use]
    pub fn len() -> u64 {
        EVENT_LOG.with_borrow(|log| log.len())
    }

    #[must_use]
    pub fn get(index: u64) -> Option<EventEntry> {
        EVENT_LOG.with_borrow(|log| log.get(index))
    }

    /// Page through the log in append order. Arguments past `usize::MAX`
    /// saturate rather than wrap on 32-bit wasm.
    #[must_use]
    pub fn page(offset: u64, limit: u64) -> Vec<EventEntry> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        EVENT_LOG.with_borrow(|log| log.iter().skip(skip).take(take).collect())
    }

    #[cfg(test)]
    pub fn clear() {
        EVENT_LOG.with_borrow_mut(|log| *log = reset_log());
    }
}

///
/// TESTS
///
