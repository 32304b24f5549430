use crate::{
    Log, log,
    memory::{
        DeveloperIndex, EventLog, Listing, ListingId, ListingRegistry, RatingLedger, RatingStats,
        RegistryEvent, RegistryState,
    },
    ops::RegistryError,
    utils::time::now_secs,
};
use candid::Principal;

/// Minimum and maximum accepted rating values.
pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

///
/// RegistryOps
///
/// Every mutating operation validates first, applies its whole effect, then
/// appends exactly one event. Callers are passed in explicitly; nothing here
/// reads the message caller or traps.
///

pub struct RegistryOps;

// Stable memory exhaustion is the only way an append can fail; the mutation
// itself has already committed at that point, so the failure is logged and
// the call still succeeds.
fn record_event(event: RegistryEvent) {
    if let Err(e) = EventLog::append(event) {
        log!(Log::Error, "event append failed: {}", e);
    }
}

impl RegistryOps {
    /// Set the administrative owner at canister init.
    pub fn init_owner(deployer: Principal) {
        RegistryState::set_owner(deployer);

        log!(Log::Ok, "registry owner initialized to {}", deployer);
    }

    /// Register a new listing for `caller` and return its id.
    ///
    /// Name, url and category are stored verbatim; the execution environment
    /// has already authenticated the caller, so there is nothing to validate.
    pub fn register_listing(
        caller: Principal,
        name: String,
        url: String,
        category: String,
    ) -> Result<ListingId, RegistryError> {
        let id = RegistryState::allocate_listing_id();

        let listing = Listing {
            id,
            developer: caller,
            name: name.clone(),
            url: url.clone(),
            category: category.clone(),
            created_at: now_secs(),
            active: true,
        };

        ListingRegistry::insert(listing);
        DeveloperIndex::append(caller, id);

        record_event(RegistryEvent::ListingRegistered {
            id,
            developer: caller,
            name,
            url,
            category,
        });

        log!(Log::Info, "listing {} registered by {}", id, caller);

        Ok(id)
    }

    /// Toggle a listing's active flag.
    ///
    /// Idempotent state-wise; a same-value write still succeeds and still
    /// appends an event.
    pub fn set_listing_status(
        caller: Principal,
        id: ListingId,
        active: bool,
    ) -> Result<(), RegistryError> {
        let mut listing = ListingRegistry::get(id).ok_or(RegistryError::NotFound(id))?;

        if listing.developer != caller {
            return Err(RegistryError::Unauthorized(caller));
        }

        listing.active = active;
        ListingRegistry::insert(listing);

        record_event(RegistryEvent::ListingStatusChanged { id, active });

        log!(Log::Info, "listing {} active={}", id, active);

        Ok(())
    }

    /// Record or overwrite `caller`'s rating for a listing.
    ///
    /// A user's contribution to the aggregates is always exactly their
    /// latest rating: the first rating grows `count`, a repeat rating only
    /// moves `sum` by the delta against the prior mark. The prior mark is
    /// read before the new one is stored.
    pub fn rate_listing(
        caller: Principal,
        id: ListingId,
        rating: u8,
    ) -> Result<(), RegistryError> {
        let listing = ListingRegistry::get(id).ok_or(RegistryError::NotFound(id))?;

        if !listing.active {
            return Err(RegistryError::InactiveListing(id));
        }
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(RegistryError::InvalidRating(rating));
        }

        let mut stats = RatingLedger::stats(id);

        match RatingLedger::mark(id, caller) {
            None => {
                stats.count += 1;
                stats.sum += u64::from(rating);
            }
            Some(prior) => {
                stats.sum = stats.sum - u64::from(prior) + u64::from(rating);
            }
        }

        RatingLedger::insert_stats(id, stats);
        RatingLedger::insert_mark(id, caller, rating);

        record_event(RegistryEvent::ListingRated {
            id,
            rater: caller,
            rating,
            rating_count: stats.count,
            rating_sum: stats.sum,
        });

        log!(
            Log::Info,
            "listing {} rated {} by {} (count={}, sum={})",
            id,
            rating,
            caller,
            stats.count,
            stats.sum
        );

        Ok(())
    }

    /// Average rating scaled by 100, truncating. Zero for unrated listings.
    pub fn average_rating(id: ListingId) -> Result<u64, RegistryError> {
        if !ListingRegistry::exists(id) {
            return Err(RegistryError::NotFound(id));
        }

        Ok(RatingLedger::stats(id).scaled_average())
    }

    /// Aggregate stats for one listing.
    pub fn rating_stats(id: ListingId) -> Result<RatingStats, RegistryError> {
        if !ListingRegistry::exists(id) {
            return Err(RegistryError::NotFound(id));
        }

        Ok(RatingLedger::stats(id))
    }

    /// Listing ids registered by the developer, in registration order.
    #[must_use]
    pub fn listings_of(developer: Principal) -> Vec<ListingId> {
        DeveloperIndex::get(developer)
    }

    /// Replace the administrative owner.
    pub fn transfer_ownership(
        caller: Principal,
        new_owner: Principal,
    ) -> Result<(), RegistryError> {
        let previous_owner = RegistryState::owner();

        if previous_owner != Some(caller) {
            return Err(RegistryError::Unauthorized(caller));
        }
        if new_owner == Principal::anonymous() {
            return Err(RegistryError::InvalidArgument(
                "new owner cannot be the anonymous principal".to_string(),
            ));
        }

        RegistryState::set_owner(new_owner);

        record_event(RegistryEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });

        log!(Log::Info, "registry owner transferred to {}", new_owner);

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{DeveloperIndex, EventLog, ListingRegistry, RatingLedger, RegistryState};

    fn p(id: u8) -> Principal {
        Principal::from_slice(&[id; 29])
    }

    fn reset() {
        ListingRegistry::clear();
        RatingLedger::clear();
        DeveloperIndex::clear();
        RegistryState::clear();
        EventLog::clear();
    }

    fn register(dev: Principal) -> ListingId {
        RegistryOps::register_listing(
            dev,
            "Foo".to_string(),
            "foo.example".to_string(),
            "defi".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn register_assigns_sequential_ids_and_indexes() {
        reset();
        let dev = p(1);

        assert_eq!(register(dev), 0);
        assert_eq!(register(dev), 1);

        assert_eq!(RegistryOps::listings_of(dev), vec![0, 1]);

        let listing = ListingRegistry::get(0).unwrap();
        assert_eq!(listing.developer, dev);
        assert_eq!(listing.name, "Foo");
        assert_eq!(listing.url, "foo.example");
        assert_eq!(listing.category, "defi");
        assert!(listing.active);
    }

    #[test]
    fn register_emits_registration_event() {
        reset();
        let dev = p(1);
        let id = register(dev);

        let entry = EventLog::get(0).unwrap();
        assert_eq!(
            entry.event,
            RegistryEvent::ListingRegistered {
                id,
                developer: dev,
                name: "Foo".to_string(),
                url: "foo.example".to_string(),
                category: "defi".to_string(),
            }
        );
    }

    #[test]
    fn rating_scenario_overwrite_then_second_user() {
        reset();
        let dev = p(1);
        let user_a = p(2);
        let user_b = p(3);

        let id = register(dev);
        assert_eq!(id, 0);

        // A rates 4
        RegistryOps::rate_listing(user_a, id, 4).unwrap();
        assert_eq!(RatingLedger::stats(id), RatingStats { count: 1, sum: 4 });
        assert_eq!(RegistryOps::average_rating(id).unwrap(), 400);

        // A overwrites with 2
        RegistryOps::rate_listing(user_a, id, 2).unwrap();
        assert_eq!(RatingLedger::stats(id), RatingStats { count: 1, sum: 2 });
        assert_eq!(RegistryOps::average_rating(id).unwrap(), 200);

        // B rates 5
        RegistryOps::rate_listing(user_b, id, 5).unwrap();
        assert_eq!(RatingLedger::stats(id), RatingStats { count: 2, sum: 7 });
        assert_eq!(RegistryOps::average_rating(id).unwrap(), 350);
    }

    #[test]
    fn latest_rating_wins_across_many_overwrites() {
        reset();
        let id = register(p(1));
        let user = p(2);

        for rating in [5, 1, 3, 2, 4] {
            RegistryOps::rate_listing(user, id, rating).unwrap();
        }

        assert_eq!(RatingLedger::stats(id), RatingStats { count: 1, sum: 4 });
        assert_eq!(RatingLedger::mark(id, user), Some(4));
    }

    #[test]
    fn average_truncates_not_rounds() {
        reset();
        let id = register(p(1));

        RegistryOps::rate_listing(p(2), id, 4).unwrap();
        RegistryOps::rate_listing(p(3), id, 2).unwrap();
        RegistryOps::rate_listing(p(4), id, 1).unwrap();

        // sum=7, count=3 → 233, not 234
        assert_eq!(RegistryOps::average_rating(id).unwrap(), 233);
    }

    #[test]
    fn average_of_unrated_listing_is_zero() {
        reset();
        let id = register(p(1));

        assert_eq!(RegistryOps::average_rating(id).unwrap(), 0);
    }

    #[test]
    fn average_of_missing_listing_is_not_found() {
        reset();

        assert_eq!(
            RegistryOps::average_rating(99),
            Err(RegistryError::NotFound(99))
        );
    }

    #[test]
    fn rating_boundaries() {
        reset();
        let id = register(p(1));

        assert_eq!(
            RegistryOps::rate_listing(p(2), id, 0),
            Err(RegistryError::InvalidRating(0))
        );
        assert_eq!(
            RegistryOps::rate_listing(p(2), id, 6),
            Err(RegistryError::InvalidRating(6))
        );

        RegistryOps::rate_listing(p(2), id, 1).unwrap();
        RegistryOps::rate_listing(p(3), id, 5).unwrap();

        assert_eq!(RatingLedger::stats(id), RatingStats { count: 2, sum: 6 });
    }

    #[test]
    fn rating_missing_listing_is_not_found() {
        reset();

        assert_eq!(
            RegistryOps::rate_listing(p(2), 7, 3),
            Err(RegistryError::NotFound(7))
        );
    }

    #[test]
    fn inactive_listing_rejects_ratings_and_keeps_stats() {
        reset();
        let dev = p(1);
        let id = register(dev);

        RegistryOps::rate_listing(p(2), id, 4).unwrap();
        RegistryOps::rate_listing(p(2), id, 2).unwrap();
        RegistryOps::rate_listing(p(3), id, 5).unwrap();

        RegistryOps::set_listing_status(dev, id, false).unwrap();

        let user_c = p(4);
        assert_eq!(
            RegistryOps::rate_listing(user_c, id, 3),
            Err(RegistryError::InactiveListing(id))
        );

        // stats and marks untouched by the failed call
        assert_eq!(RatingLedger::stats(id), RatingStats { count: 2, sum: 7 });
        assert_eq!(RatingLedger::mark(id, user_c), None);
    }

    #[test]
    fn stats_survive_deactivation_cycles() {
        reset();
        let dev = p(1);
        let id = register(dev);

        RegistryOps::rate_listing(p(2), id, 5).unwrap();

        RegistryOps::set_listing_status(dev, id, false).unwrap();
        RegistryOps::set_listing_status(dev, id, true).unwrap();

        assert_eq!(RatingLedger::stats(id), RatingStats { count: 1, sum: 5 });
        RegistryOps::rate_listing(p(3), id, 1).unwrap();
        assert_eq!(RatingLedger::stats(id), RatingStats { count: 2, sum: 6 });
    }

    #[test]
    fn set_status_is_idempotent_but_always_emits() {
        reset();
        let dev = p(1);
        let id = register(dev);
        let events_before = EventLog::len();

        RegistryOps::set_listing_status(dev, id, true).unwrap();
        RegistryOps::set_listing_status(dev, id, true).unwrap();

        assert!(ListingRegistry::get(id).unwrap().active);
        assert_eq!(EventLog::len(), events_before + 2);
    }

    #[test]
    fn set_status_requires_the_developer() {
        reset();
        let dev = p(1);
        let intruder = p(9);
        let id = register(dev);

        assert_eq!(
            RegistryOps::set_listing_status(intruder, id, false),
            Err(RegistryError::Unauthorized(intruder))
        );
        assert!(ListingRegistry::get(id).unwrap().active);

        assert_eq!(
            RegistryOps::set_listing_status(dev, 99, false),
            Err(RegistryError::NotFound(99))
        );
    }

    #[test]
    fn developer_index_unaffected_by_deactivation() {
        reset();
        let dev = p(1);

        let first = register(dev);
        let second = register(dev);

        RegistryOps::set_listing_status(dev, first, false).unwrap();

        assert_eq!(RegistryOps::listings_of(dev), vec![first, second]);
    }

    #[test]
    fn self_rating_is_allowed() {
        reset();
        let dev = p(1);
        let id = register(dev);

        RegistryOps::rate_listing(dev, id, 5).unwrap();
        assert_eq!(RatingLedger::stats(id), RatingStats { count: 1, sum: 5 });
    }

    #[test]
    fn failed_rating_emits_no_event() {
        reset();
        let id = register(p(1));
        let events_before = EventLog::len();

        let _ = RegistryOps::rate_listing(p(2), id, 9);

        assert_eq!(EventLog::len(), events_before);
    }

    #[test]
    fn rating_event_carries_post_update_aggregates() {
        reset();
        let id = register(p(1));
        let rater = p(2);

        RegistryOps::rate_listing(rater, id, 3).unwrap();

        let entry = EventLog::get(EventLog::len() - 1).unwrap();
        assert_eq!(
            entry.event,
            RegistryEvent::ListingRated {
                id,
                rater,
                rating: 3,
                rating_count: 1,
                rating_sum: 3,
            }
        );
    }

    #[test]
    fn ownership_transfer_rules() {
        reset();
        let deployer = p(1);
        let next = p(2);
        let intruder = p(3);

        RegistryOps::init_owner(deployer);

        assert_eq!(
            RegistryOps::transfer_ownership(intruder, next),
            Err(RegistryError::Unauthorized(intruder))
        );

        assert_eq!(
            RegistryOps::transfer_ownership(deployer, Principal::anonymous()),
            Err(RegistryError::InvalidArgument(
                "new owner cannot be the anonymous principal".to_string()
            ))
        );
        assert_eq!(RegistryState::owner(), Some(deployer));

        RegistryOps::transfer_ownership(deployer, next).unwrap();
        assert_eq!(RegistryState::owner(), Some(next));

        // old owner lost the role
        assert_eq!(
            RegistryOps::transfer_ownership(deployer, intruder),
            Err(RegistryError::Unauthorized(deployer))
        );

        let entry = EventLog::get(EventLog::len() - 1).unwrap();
        assert_eq!(
            entry.event,
            RegistryEvent::OwnershipTransferred {
                previous_owner: Some(deployer),
                new_owner: next,
            }
        );
    }

    #[test]
    fn stats_invariants_hold_against_marks() {
        reset();
        let id = register(p(1));

        RegistryOps::rate_listing(p(2), id, 4).unwrap();
        RegistryOps::rate_listing(p(3), id, 2).unwrap();
        RegistryOps::rate_listing(p(2), id, 1).unwrap();

        let marks = RatingLedger::marks_of(id);
        let stats = RatingLedger::stats(id);

        assert_eq!(stats.count, marks.len() as u64);
        assert_eq!(stats.sum, marks.iter().map(|(_, r)| u64::from(*r)).sum::<u64>());
    }
}
