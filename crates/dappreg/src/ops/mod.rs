pub mod registry;

pub use registry::RegistryOps;

use crate::memory::ListingId;
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// RegistryError
///
/// The full validation taxonomy. Every operation validates against current
/// state before mutating anything, so a returned error guarantees the
/// registry is untouched.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[remain::sorted]
pub enum RegistryError {
    /// Rating attempted against a deactivated listing.
    #[error("listing {0} is not active")]
    InactiveListing(ListingId),

    /// Malformed argument, e.g. the anonymous principal as transfer target.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Rating value outside the valid 1..=5 range.
    #[error("rating {0} is outside the valid range 1-5")]
    InvalidRating(u8),

    /// Referenced listing does not exist.
    #[error("listing {0} not found")]
    NotFound(ListingId),

    /// Caller lacks the required role (listing developer or registry owner).
    #[error("caller '{0}' is not authorized")]
    Unauthorized(Principal),
}
