///
/// Unified façade over the Internet Computer SDK
///
/// Re-exports the IC developer crates (`ic_cdk`, `candid`,
/// `ic_stable_structures`) under a single namespace so the rest of the crate
/// and downstream canisters import from one place, and the SDK can be bumped
/// without touching call sites.
///
pub use candid;
pub use ic_cdk::{api, export_candid, init, post_upgrade, query, trap, update};

pub mod structures;

#[cfg(target_arch = "wasm32")]
pub use ic_cdk::println;
#[cfg(not(target_arch = "wasm32"))]
pub use std::println;
