// ============================================================
// Layer 4 — Group Sampler and Train/Validation Splitter
// ============================================================
// Two record-level operations that run before pairing:
//
//   subsample_groups  — keep only a random subset of paraphrase
//                       groups (quick experiments on big corpora)
//   split_by_group    — deterministic train/validation partition
//
// Why split by group instead of by row?
//   Every sentence of a group is a paraphrase of every other.
//   A row-level split would put "the cat sat" in training and
//   "the cat sits" in validation, leaking the answer. Splitting
//   on `group_id % modulus` keeps whole groups on one side.
//
// Subsampling draws group ids WITH replacement, so asking for
// 1000 groups usually yields slightly fewer distinct groups.
//
// Reference: rand crate documentation (SliceRandom)

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashSet};

use crate::domain::sentence::SentenceRecord;

/// Keep the records whose group id is among `draws` ids sampled
/// uniformly with replacement from the distinct ids.
///
/// `draws == 0` disables sampling and returns the input unchanged.
pub fn subsample_groups<R: Rng + ?Sized>(
    records: Vec<SentenceRecord>,
    draws:   usize,
    rng:     &mut R,
) -> Vec<SentenceRecord> {
    if draws == 0 || records.is_empty() {
        return records;
    }

    // BTreeSet gives a stable id order so a fixed seed
    // always picks the same groups
    let distinct: Vec<u64> = records
        .iter()
        .map(|r| r.group_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let chosen: HashSet<u64> = (0..draws)
        .filter_map(|_| distinct.choose(&mut *rng).copied())
        .collect();

    let kept: Vec<SentenceRecord> = records
        .into_iter()
        .filter(|r| chosen.contains(&r.group_id))
        .collect();

    tracing::info!(
        "Subsampled {} of {} groups ({} sentences kept)",
        chosen.len(),
        distinct.len(),
        kept.len()
    );
    kept
}

/// Partition records into (train, validation).
/// `group_id % modulus == 0` goes to validation, everything else to training.
///
/// # Example
/// ```ignore
/// let (train, valid) = split_by_group(records, 4);
/// // groups 4, 8, 12, ... are in `valid`
/// ```
pub fn split_by_group(
    records: Vec<SentenceRecord>,
    modulus: u64,
) -> (Vec<SentenceRecord>, Vec<SentenceRecord>) {
    let modulus = modulus.max(1);
    let (valid, train): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.group_id % modulus == 0);

    let total = train.len() + valid.len();
    tracing::debug!(
        "Group split: {} training, {} validation sentences ({}% / {}%)",
        train.len(),
        valid.len(),
        (train.len() * 100) / total.max(1),
        (valid.len() * 100) / total.max(1),
    );

    (train, valid)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn records(ids: &[u64]) -> Vec<SentenceRecord> {
        ids.iter()
            .enumerate()
            .map(|(i, &g)| SentenceRecord::new(g, i as u64, format!("sentence {i}")))
            .collect()
    }

    #[test]
    fn test_split_uses_group_modulus() {
        let (train, valid) = split_by_group(records(&[1, 2, 3, 4, 5, 8, 8]), 4);
        assert!(train.iter().all(|r| r.group_id % 4 != 0));
        assert!(valid.iter().all(|r| r.group_id % 4 == 0));
        assert_eq!(train.len(), 4);
        assert_eq!(valid.len(), 3);
    }

    #[test]
    fn test_split_keeps_groups_whole() {
        let (train, valid) = split_by_group(records(&[7, 7, 7, 12, 12]), 4);
        assert_eq!(train.len(), 3);
        assert_eq!(valid.len(), 2);
    }

    #[test]
    fn test_subsample_zero_is_noop() {
        let mut rng = StdRng::seed_from_u64(7);
        let input   = records(&[1, 2, 3]);
        assert_eq!(subsample_groups(input.clone(), 0, &mut rng), input);
    }

    #[test]
    fn test_subsample_keeps_whole_groups() {
        let mut rng = StdRng::seed_from_u64(7);
        let input   = records(&[1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
        let kept    = subsample_groups(input, 2, &mut rng);

        let groups: BTreeSet<u64> = kept.iter().map(|r| r.group_id).collect();
        assert!(!groups.is_empty() && groups.len() <= 2);
        // every chosen group keeps both of its sentences
        assert_eq!(kept.len(), groups.len() * 2);
    }

    #[test]
    fn test_subsample_is_deterministic_for_a_seed() {
        let input = records(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let a = subsample_groups(input.clone(), 3, &mut StdRng::seed_from_u64(42));
        let b = subsample_groups(input, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
