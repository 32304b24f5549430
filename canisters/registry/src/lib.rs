//! Registry canister: binds the dappreg core operations to IC endpoints.
//!
//! All policy lives in `dappreg::ops`; this crate only reads the message
//! caller, forwards arguments, and converts the typed registry errors into
//! the public error envelope.

use candid::Principal;
use dappreg::{
    Error, Log, log,
    memory::{EventEntry, EventLog, Listing, ListingId, ListingRegistry, RatingStats, RegistryState},
    ops::RegistryOps,
};
use ic_cdk::{api::msg_caller, init, post_upgrade, query, update};

//
// LIFECYCLE
//

#[init]
fn init() {
    RegistryOps::init_owner(msg_caller());

    log!(Log::Ok, "registry canister installed (v{})", dappreg::VERSION);
}

#[post_upgrade]
fn post_upgrade() {
    log!(Log::Ok, "registry canister upgraded (v{})", dappreg::VERSION);
}

//
// LISTINGS
//

#[update]
fn register_listing(name: String, url: String, category: String) -> Result<ListingId, Error> {
    let id = RegistryOps::register_listing(msg_caller(), name, url, category)?;

    Ok(id)
}

#[update]
fn set_listing_status(id: ListingId, active: bool) -> Result<(), Error> {
    RegistryOps::set_listing_status(msg_caller(), id, active)?;

    Ok(())
}

#[query]
fn get_listing(id: ListingId) -> Option<Listing> {
    ListingRegistry::get(id)
}

#[query]
fn listings_of(developer: Principal) -> Vec<ListingId> {
    RegistryOps::listings_of(developer)
}

//
// RATINGS
//

#[update]
fn rate_listing(id: ListingId, rating: u8) -> Result<(), Error> {
    RegistryOps::rate_listing(msg_caller(), id, rating)?;

    Ok(())
}

#[query]
fn average_rating(id: ListingId) -> Result<u64, Error> {
    let avg = RegistryOps::average_rating(id)?;

    Ok(avg)
}

#[query]
fn rating_stats(id: ListingId) -> Result<RatingStats, Error> {
    let stats = RegistryOps::rating_stats(id)?;

    Ok(stats)
}

//
// ADMIN
//

#[update]
fn transfer_ownership(new_owner: Principal) -> Result<(), Error> {
    RegistryOps::transfer_ownership(msg_caller(), new_owner)?;

    Ok(())
}

#[query]
fn registry_owner() -> Option<Principal> {
    RegistryState::owner()
}

//
// EVENTS
//

#[query]
fn registry_events(offset: u64, limit: u64) -> Vec<EventEntry> {
    EventLog::page(offset, limit)
}

#[query]
fn registry_event_count() -> u64 {
    EventLog::len()
}

ic_cdk::export_candid!();
