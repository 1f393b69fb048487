// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Split of a block into conflict-free waves

use morpheus_models::StateKey;
use std::collections::BTreeSet;

/// Consecutive transactions whose declared key sets are pairwise disjoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wave {
    /// positions of the transactions in the block, increasing
    pub indices: Vec<usize>,
}

/// Splits transactions into waves.
///
/// Transactions are scanned in submission order: a transaction joins the
/// current wave unless one of its keys is already used by the wave, in which
/// case the wave is closed and a new one starts with it. The result only
/// depends on the order and on the key sets.
///
/// ```
/// use morpheus_execution_worker::partition_waves;
/// use morpheus_models::StateKey;
/// use std::collections::BTreeSet;
///
/// let set = |keys: &[u8]| keys.iter().map(|k| StateKey::new(vec![*k])).collect::<BTreeSet<_>>();
/// let waves = partition_waves(&[set(&[1]), set(&[2]), set(&[1, 3])]);
/// assert_eq!(waves.len(), 2);
/// assert_eq!(waves[0].indices, vec![0, 1]);
/// assert_eq!(waves[1].indices, vec![2]);
/// ```
pub fn partition_waves(key_sets: &[BTreeSet<StateKey>]) -> Vec<Wave> {
    let mut waves = Vec::new();
    let mut current = Wave::default();
    let mut used: BTreeSet<&StateKey> = BTreeSet::new();
    for (index, keys) in key_sets.iter().enumerate() {
        if keys.iter().any(|key| used.contains(key)) {
            waves.push(std::mem::take(&mut current));
            used.clear();
        }
        used.extend(keys.iter());
        current.indices.push(index);
    }
    if !current.indices.is_empty() {
        waves.push(current);
    }
    waves
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn set(keys: &[u8]) -> BTreeSet<StateKey> {
        keys.iter().map(|k| StateKey::new(vec![*k])).collect()
    }

    #[test]
    #[serial]
    fn empty_block_has_no_wave() {
        assert!(partition_waves(&[]).is_empty());
    }

    #[test]
    #[serial]
    fn disjoint_transactions_share_a_wave() {
        let waves = partition_waves(&[set(&[1, 2]), set(&[3]), set(&[4, 5])]);
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].indices, vec![0, 1, 2]);
    }

    #[test]
    #[serial]
    fn conflicts_keep_submission_order() {
        let waves = partition_waves(&[set(&[1]), set(&[1]), set(&[2]), set(&[2]), set(&[1])]);
        let indices: Vec<Vec<usize>> = waves.into_iter().map(|w| w.indices).collect();
        assert_eq!(indices, vec![vec![0], vec![1, 2], vec![3, 4]]);
    }

    #[test]
    #[serial]
    fn every_transaction_lands_in_exactly_one_wave() {
        let sets: Vec<_> = (0..50u8).map(|i| set(&[i % 7, 100 + i % 3])).collect();
        let waves = partition_waves(&sets);
        let flattened: Vec<usize> = waves.iter().flat_map(|w| w.indices.clone()).collect();
        assert_eq!(flattened, (0..50).collect::<Vec<_>>());
        for wave in &waves {
            let mut seen = BTreeSet::new();
            for index in &wave.indices {
                for key in &sets[*index] {
                    assert!(seen.insert(key.clone()), "conflict inside a wave");
                }
            }
        }
    }

    #[test]
    #[serial]
    fn transaction_without_keys_never_conflicts() {
        let waves = partition_waves(&[set(&[1]), set(&[]), set(&[])]);
        assert_eq!(waves.len(), 1);
    }
}
