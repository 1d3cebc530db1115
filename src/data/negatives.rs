// ============================================================
// Layer 4 — Negative Sampler
// ============================================================
// Attaches a hard-negative candidate ("other") to every pair.
//
// The candidate is found by rotating the whole `set_b` column of
// the split, like numpy's `roll`:
//
//   other[i] = set_b[(i - offset) mod len]
//
// offset = the largest number of pairs any single group produced.
//
// Because the pair builder emits each group's rows contiguously
// and no group block is longer than `offset`, the rotated value
// normally comes from a DIFFERENT group — an unrelated sentence.
//
// Known weakness: when the shift is degenerate (offset is a
// multiple of the table length, e.g. only one group in the
// split) every `other` equals its own `set_b`, i.e. a real
// paraphrase gets labelled fake. Even a non-degenerate shift can
// wrap around into the same group on tiny splits. This is not
// silently repaired: `attach_negatives` reports the number of
// collisions and logs a warning so the data issue stays visible.
//
// Reference: Rust Book §8 (Vectors), §13 (Iterators)

use std::collections::HashMap;

use crate::domain::pair::{NegativePair, Pair};

/// Diagnostics produced alongside the rotated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeReport {
    /// Largest per-group pair count (the requested rotation)
    pub offset: usize,

    /// Rotation actually applied, `offset % len`
    pub effective_shift: usize,

    /// Rows where `other == set_b`, i.e. false negatives
    pub collisions: usize,
}

impl NegativeReport {
    /// True when the rotation is a no-op over a non-empty table
    pub fn is_degenerate(&self) -> bool {
        self.effective_shift == 0 && self.offset > 0
    }
}

/// Largest number of pairs belonging to one group.
pub fn rotation_offset(pairs: &[Pair]) -> usize {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for p in pairs {
        *counts.entry(p.group_id).or_insert(0) += 1;
    }
    counts.into_values().max().unwrap_or(0)
}

/// Cyclic right shift: element `i` of the output is `values[(i - shift) mod len]`.
pub fn roll<T: Clone>(values: &[T], shift: usize) -> Vec<T> {
    let len = values.len();
    if len == 0 {
        return Vec::new();
    }
    let shift = shift % len;
    values[len - shift..]
        .iter()
        .chain(values[..len - shift].iter())
        .cloned()
        .collect()
}

/// Attach the rotated `set_b` value to every pair.
pub fn attach_negatives(pairs: Vec<Pair>) -> (Vec<NegativePair>, NegativeReport) {
    if pairs.is_empty() {
        tracing::warn!("Negative sampler received an empty pair table");
        let report = NegativeReport { offset: 0, effective_shift: 0, collisions: 0 };
        return (Vec::new(), report);
    }

    let offset = rotation_offset(&pairs);
    let set_b: Vec<&str> = pairs.iter().map(|p| p.set_b.as_str()).collect();
    let others: Vec<String> = roll(&set_b, offset)
        .into_iter()
        .map(str::to_string)
        .collect();

    let collisions = set_b
        .iter()
        .zip(others.iter())
        .filter(|(b, o)| **b == o.as_str())
        .count();

    let report = NegativeReport {
        offset,
        effective_shift: offset % pairs.len(),
        collisions,
    };

    if report.is_degenerate() {
        tracing::warn!(
            "Rotation offset {} is a multiple of the table length {}: every 'other' equals its set_b",
            offset,
            pairs.len()
        );
    } else if collisions > 0 {
        tracing::warn!(
            "{} of {} negative candidates equal their own set_b (false negatives)",
            collisions,
            pairs.len()
        );
    }

    let negatives = pairs
        .into_iter()
        .zip(others)
        .map(|(pair, other)| NegativePair::from_pair(pair, other))
        .collect();

    (negatives, report)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::pairing::permutations_of_two;

    #[test]
    fn test_roll_matches_right_shift() {
        let v = vec![1, 2, 3, 4, 5];
        assert_eq!(roll(&v, 2), vec![4, 5, 1, 2, 3]);
        assert_eq!(roll(&v, 0), v);
        assert_eq!(roll(&v, 7), vec![4, 5, 1, 2, 3]);
        assert!(roll::<i32>(&[], 3).is_empty());
    }

    #[test]
    fn test_offset_is_max_pairs_per_group() {
        let mut pairs = permutations_of_two(1, &["a", "b", "c"]); // 6
        pairs.extend(permutations_of_two(2, &["x", "y"]));      // 2
        assert_eq!(rotation_offset(&pairs), 6);
    }

    #[test]
    fn test_other_comes_from_another_group() {
        let mut pairs = permutations_of_two(1, &["a", "b", "c"]);
        pairs.extend(permutations_of_two(2, &["x", "y", "z"]));
        let (negatives, report) = attach_negatives(pairs);

        assert_eq!(negatives.len(), 12);
        assert_eq!(report.offset, 6);
        assert_eq!(report.collisions, 0);
        for n in &negatives {
            let own_group = if n.group_id == 1 { ["a", "b", "c"] } else { ["x", "y", "z"] };
            assert!(!own_group.contains(&n.other.as_str()), "{n:?}");
        }
    }

    #[test]
    fn test_single_group_is_flagged_degenerate() {
        let pairs = permutations_of_two(1, &["a", "b", "c"]);
        let (negatives, report) = attach_negatives(pairs);

        assert!(report.is_degenerate());
        assert_eq!(report.collisions, 6);
        assert!(negatives.iter().all(|n| n.other == n.set_b));
    }

    #[test]
    fn test_empty_table() {
        let (negatives, report) = attach_negatives(Vec::new());
        assert!(negatives.is_empty());
        assert!(!report.is_degenerate());
    }
}
