//! dappreg core: a dApp listing registry with per-user ratings.
//!
//! All durable state (listings, rating stats, rating marks, developer
//! indexes, the owner/next-id cell and the event log) lives in stable
//! structures behind [`memory`]. Every mutation goes through [`ops`], which
//! validates before touching any map and appends one event per committed
//! mutation. Canister crates bind these operations to endpoints; this crate
//! never reads the message caller itself, so the whole thing runs natively
//! under `cargo test`.

pub mod cdk;
pub mod macros;
pub mod memory;
pub mod ops;
pub mod serialize;
pub mod utils;

pub use thiserror::Error as ThisError;

use crate::cdk::candid::CandidType;
use serde::Deserialize;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error as DappregError, Log, log,
        memory::{Listing, ListingId, RatingStats},
        ops::{RegistryError, RegistryOps},
    };
    pub use candid::Principal;
}

///
/// Crate Version
///

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Error
///
/// top level error should handle all sub-errors, but not expose the child candid types
///

#[derive(CandidType, Debug, Deserialize, ThisError)]
pub enum Error {
    #[error("{0}")]
    CustomError(String),

    #[error("{0}")]
    MemoryError(String),

    #[error("{0}")]
    RegistryError(String),

    #[error("{0}")]
    SerializeError(String),
}

macro_rules! from_to_string {
    ($from:ty, $variant:ident) => {
        impl From<$from> for Error {
            fn from(e: $from) -> Self {
                Error::$variant(e.to_string())
            }
        }
    };
}

impl Error {
    #[must_use]
    pub fn custom<S: Into<String>>(s: S) -> Self {
        Self::CustomError(s.into())
    }
}

from_to_string!(memory::MemoryError, MemoryError);
from_to_string!(ops::RegistryError, RegistryError);
from_to_string!(serialize::SerializeError, SerializeError);

///
/// Log
///

pub enum Log {
    Ok,
    Info,
    Warn,
    Error,
}
