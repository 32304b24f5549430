pub mod developer_index;
pub mod events;
pub mod listings;
pub mod memory_registry;
pub mod ratings;
pub mod registry_state;

pub use developer_index::{DeveloperIndex, DeveloperIndexEntry, DeveloperIndexView};
pub use events::{EventEntry, EventLog, RegistryEvent};
pub use listings::{Listing, ListingId, ListingRegistry, ListingRegistryView};
pub use memory_registry::MemoryRegistry;
pub use ratings::{RatingKey, RatingLedger, RatingStats};
pub use registry_state::{RegistryState, RegistryStateData};

use crate::{
    cdk::structures::{DefaultMemoryImpl, memory::MemoryManager},
    memory::{events::EventLogError, memory_registry::MemoryRegistryError},
};
use std::cell::RefCell;
use thiserror::Error as ThisError;

//
// MEMORY_IDs
//

pub(crate) const MEMORY_REGISTRY_MEMORY_ID: u8 = 0;

// registry scalars
pub(crate) const REGISTRY_STATE_MEMORY_ID: u8 = 1;

// mappings
pub(crate) const LISTING_REGISTRY_MEMORY_ID: u8 = 2;
pub(crate) const RATING_STATS_MEMORY_ID: u8 = 3;
pub(crate) const RATING_MARKS_MEMORY_ID: u8 = 4;
pub(crate) const DEVELOPER_INDEX_MEMORY_ID: u8 = 5;

// event log
pub(crate) const EVENT_LOG_INDEX_MEMORY_ID: u8 = 6;
pub(crate) const EVENT_LOG_DATA_MEMORY_ID: u8 = 7;

//
// MEMORY_MANAGER
//

thread_local! {
    ///
    /// Define MEMORY_MANAGER thread-locally for the entire scope
    ///
    pub static MEMORY_MANAGER: RefCell<MemoryManager<DefaultMemoryImpl>> =
        RefCell::new(MemoryManager::init(
            DefaultMemoryImpl::default()
        ));
}

///
/// MemoryError
///

#[derive(Debug, ThisError)]
pub enum MemoryError {
    #[error(transparent)]
    EventLogError(#[from] EventLogError),

    #[error(transparent)]
    MemoryRegistryError(#[from] MemoryRegistryError),
}
