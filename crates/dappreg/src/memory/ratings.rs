use crate::{
    cdk::structures::{BTreeMap, DefaultMemoryImpl, Memory, memory::VirtualMemory},
    dappreg_register_memory, impl_storable_bounded,
    memory::{ListingId, RATING_MARKS_MEMORY_ID, RATING_STATS_MEMORY_ID},
};
use candid::{CandidType, Principal};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

//
// RATING_LEDGER
// aggregate stats plus the per-(listing, user) marks backing them
//

thread_local! {
    static RATING_LEDGER: RefCell<RatingLedgerCore<VirtualMemory<DefaultMemoryImpl>>> =
        RefCell::new(RatingLedgerCore::new(
            BTreeMap::init(dappreg_register_memory!(RatingLedger, RATING_STATS_MEMORY_ID)),
            BTreeMap::init(dappreg_register_memory!(RatingLedger, RATING_MARKS_MEMORY_ID)),
        ));
}

///
/// RatingKey
/// Composite key: (listing, user) → last submitted rating
///
/// An absent key is the "no rating yet" sentinel; a stored mark is always in
/// the valid 1..=5 range.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RatingKey {
    pub listing_id: ListingId,
    pub user: Principal,
}

impl RatingKey {
    pub const STORABLE_MAX_SIZE: u32 = 64;

    #[must_use]
    pub const fn new(listing_id: ListingId, user: Principal) -> Self {
        Self { listing_id, user }
    }
}

impl_storable_bounded!(RatingKey, RatingKey::STORABLE_MAX_SIZE, false);

///
/// RatingStats
///
/// Invariants (enforced by the ops layer, preserved here):
/// - `count` equals the number of users holding a mark for the listing
/// - `sum` equals the sum of those marks
///

#[derive(CandidType, Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RatingStats {
    pub count: u64,
    pub sum: u64,
}

impl RatingStats {
    pub const STORABLE_MAX_SIZE: u32 = 32;

    /// Average scaled by 100, truncating division. `sum=7, count=3` → `233`.
    #[must_use]
    pub const fn scaled_average(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            self.sum * 100 / self.count
        }
    }
}

impl_storable_bounded!(RatingStats, RatingStats::STORABLE_MAX_SIZE, false);

///
/// RatingLedger
///

pub struct RatingLedger;

impl RatingLedger {
    #[must_use]
    pub fn stats(id: ListingId) -> RatingStats {
        RATING_LEDGER.with_borrow(|core| core.get_stats(id)).unwrap_or_default()
    }

    #[must_use]
    pub fn mark(id: ListingId, user: Principal) -> Option<u8> {
        RATING_LEDGER.with_borrow(|core| core.get_mark(&RatingKey::new(id, user)))
    }

    pub fn insert_stats(id: ListingId, stats: RatingStats) {
        RATING_LEDGER.with_borrow_mut(|core| core.insert_stats(id, stats));
    }

    pub fn insert_mark(id: ListingId, user: Principal, rating: u8) {
        RATING_LEDGER.with_borrow_mut(|core| core.insert_mark(RatingKey::new(id, user), rating));
    }

    /// All marks recorded against the given listing, in user order.
    #[must_use]
    pub fn marks_of(id: ListingId) -> Vec<(Principal, u8)> {
        RATING_LEDGER.with_borrow(|core| core.marks_of(id))
    }

    #[cfg(test)]
    pub fn clear() {
        RATING_LEDGER.with_borrow_mut(|core| {
            core.stats.clear();
            core.marks.clear();
        });
    }
}

///
/// RatingLedgerCore
///

pub struct RatingLedgerCore<M: Memory> {
    stats: BTreeMap<ListingId, RatingStats, M>,
    marks: BTreeMap<RatingKey, u8, M>,
}

impl<M: Memory> RatingLedgerCore<M> {
    pub const fn new(stats: BTreeMap<ListingId, RatingStats, M>, marks: BTreeMap<RatingKey, u8, M>) -> Self {
        Self { stats, marks }
    }

    pub fn get_stats(&self, id: ListingId) -> Option<RatingStats> {
        self.stats.get(&id)
    }

    pub fn insert_stats(&mut self, id: ListingId, stats: RatingStats) {
        self.stats.insert(id, stats);
    }

    pub fn get_mark(&self, key: &RatingKey) -> Option<u8> {
        self.marks.get(key)
    }

    pub fn insert_mark(&mut self, key: RatingKey, rating: u8) {
        self.marks.insert(key, rating);
    }

    pub fn marks_of(&self, id: ListingId) -> Vec<(Principal, u8)> {
        // The empty principal is the minimum in the key ordering, so the
        // scan starts at this listing's first mark.
        let start = RatingKey::new(id, Principal::from_slice(&[]));

        self.marks
            .range(start..)
            .take_while(|e| e.key().listing_id == id)
            .map(|e| (e.key().user, e.value()))
            .collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_average_truncates() {
        let stats = RatingStats { count: 3, sum: 7 };
        assert_eq!(stats.scaled_average(), 233);
    }

    #[test]
    fn scaled_average_of_empty_stats_is_zero() {
        assert_eq!(RatingStats::default().scaled_average(), 0);
    }

    #[test]
    fn marks_iterate_per_listing() {
        RatingLedger::clear();

        let a = Principal::from_slice(&[1; 29]);
        let b = Principal::from_slice(&[2; 29]);

        RatingLedger::insert_mark(0, a, 4);
        RatingLedger::insert_mark(0, b, 5);
        RatingLedger::insert_mark(1, a, 1);

        let marks = RatingLedger::marks_of(0);
        assert_eq!(marks.len(), 2);
        assert!(marks.contains(&(a, 4)));
        assert!(marks.contains(&(b, 5)));

        assert_eq!(RatingLedger::marks_of(1), vec![(a, 1)]);
        assert!(RatingLedger::marks_of(2).is_empty());
    }

    #[test]
    fn marks_scan_includes_the_minimum_principal() {
        RatingLedger::clear();

        let min = Principal::from_slice(&[]);
        let a = Principal::from_slice(&[1; 29]);

        RatingLedger::insert_mark(7, min, 3);
        RatingLedger::insert_mark(7, a, 5);

        let marks = RatingLedger::marks_of(7);
        assert_eq!(marks.len(), 2);
        assert!(marks.contains(&(min, 3)));
    }
}
