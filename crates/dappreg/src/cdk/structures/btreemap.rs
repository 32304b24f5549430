pub use ic_stable_structures::btreemap::*;

use derive_more::{Deref, DerefMut};
use ic_stable_structures::{Memory, Storable, btreemap::BTreeMap as StableBTreeMap};

///
/// BTreeMap
/// stable map with owned-pair export and in-place clearing
///

#[derive(Deref, DerefMut)]
pub struct BTreeMap<K, V, M>
where
    K: Storable + Ord + Clone,
    V: Storable + Clone,
    M: Memory,
{
    data: StableBTreeMap<K, V, M>,
}

impl<K, V, M> BTreeMap<K, V, M>
where
    K: Storable + Ord + Clone,
    V: Storable + Clone,
    M: Memory,
{
    #[must_use]
    pub fn init(memory: M) -> Self {
        Self {
            data: StableBTreeMap::init(memory),
        }
    }

    /// Snapshot every entry as owned pairs, in key order.
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.iter().map(|e| (e.key().clone(), e.value())).collect()
    }

    /// Remove every entry without consuming the map.
    pub fn clear(&mut self) {
        self.clear_new();
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use ic_stable_structures::DefaultMemoryImpl;

    #[test]
    fn to_vec_snapshots_in_key_order() {
        let mut map: BTreeMap<u8, u8, _> = BTreeMap::init(DefaultMemoryImpl::default());

        map.insert(2, 20);
        map.insert(1, 10);

        assert_eq!(map.to_vec(), vec![(1, 10), (2, 20)]);

        map.clear();
        assert!(map.is_empty());
    }
}
