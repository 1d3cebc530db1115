// ============================================================
// Layer 4 — Pair Builder
// ============================================================
// Turns paraphrase groups into positive training pairs.
//
// For a group of n sentences every ORDERED pair of two different
// positions is emitted (2-permutations), so:
//
//   n = 3  ["the cat sat", "the cat sits", "a cat sat"]
//          → 3 × 2 = 6 pairs
//   n = 1  → 0 pairs (a lone sentence has nothing to pair with)
//
// Ordered pairs matter: the classifier sees (A, B) and (B, A)
// as two separate examples because the input is [CLS] A [SEP] B.
//
// Groups are emitted in ascending id order and sentences in
// ascending sentence id order. Consumers must not rely on that
// order beyond "rows of one group are contiguous", which the
// negative sampler needs.
//
// Reference: Rust Book §8 (HashMap / BTreeMap)
//            Rust Book §13 (Iterators)

use std::collections::BTreeMap;

use crate::domain::pair::Pair;
use crate::domain::sentence::SentenceRecord;

/// Group sentence texts by `group_id`, each group sorted by `sentence_id`.
pub fn group_sentences(records: &[SentenceRecord]) -> BTreeMap<u64, Vec<&str>> {
    let mut by_group: BTreeMap<u64, Vec<(u64, &str)>> = BTreeMap::new();
    for r in records {
        by_group
            .entry(r.group_id)
            .or_default()
            .push((r.sentence_id, r.text.as_str()));
    }

    by_group
        .into_iter()
        .map(|(id, mut members)| {
            members.sort_by_key(|(sentence_id, _)| *sentence_id);
            (id, members.into_iter().map(|(_, text)| text).collect())
        })
        .collect()
}

/// Every ordered pair of two distinct positions within one group.
pub fn permutations_of_two(group_id: u64, sentences: &[&str]) -> Vec<Pair> {
    let n = sentences.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1));

    for (i, a) in sentences.iter().enumerate() {
        for (j, b) in sentences.iter().enumerate() {
            if i != j {
                pairs.push(Pair::new(group_id, *a, *b));
            }
        }
    }
    pairs
}

/// Build the pair table for one split.
pub fn build_pairs(records: &[SentenceRecord]) -> Vec<Pair> {
    let groups = group_sentences(records);

    let singletons = groups.values().filter(|g| g.len() < 2).count();
    if singletons > 0 {
        tracing::debug!("{} single-sentence groups contribute no pairs", singletons);
    }

    let pairs: Vec<Pair> = groups
        .iter()
        .flat_map(|(id, sentences)| permutations_of_two(*id, sentences))
        .collect();

    tracing::info!("Built {} pairs from {} groups", pairs.len(), groups.len());
    pairs
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: u64, texts: &[&str]) -> Vec<SentenceRecord> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| SentenceRecord::new(id, i as u64, *t))
            .collect()
    }

    #[test]
    fn test_three_sentence_group_gives_six_pairs() {
        let records = group(1, &["the cat sat", "the cat sits", "a cat sat"]);
        let pairs   = build_pairs(&records);
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().all(|p| p.group_id == 1));
        assert!(pairs.contains(&Pair::new(1, "the cat sat", "a cat sat")));
        assert!(pairs.contains(&Pair::new(1, "a cat sat", "the cat sat")));
    }

    #[test]
    fn test_pair_count_is_n_times_n_minus_one() {
        for n in 0..7usize {
            let texts: Vec<String> = (0..n).map(|i| format!("s{i}")).collect();
            let refs: Vec<&str>    = texts.iter().map(String::as_str).collect();
            let pairs = permutations_of_two(9, &refs);
            assert_eq!(pairs.len(), n * n.saturating_sub(1), "n = {n}");
        }
    }

    #[test]
    fn test_singleton_group_gives_no_pairs() {
        let records = group(5, &["alone"]);
        assert!(build_pairs(&records).is_empty());
    }

    #[test]
    fn test_set_a_never_equals_set_b_for_distinct_texts() {
        let mut records = group(1, &["a b", "b c", "c d"]);
        records.extend(group(2, &["x", "y"]));
        for p in build_pairs(&records) {
            assert_ne!(p.set_a, p.set_b);
        }
    }

    #[test]
    fn test_groups_are_contiguous_and_ordered() {
        // interleaved input, sentence ids out of order
        let records = vec![
            SentenceRecord::new(2, 1, "y"),
            SentenceRecord::new(1, 5, "b"),
            SentenceRecord::new(2, 0, "x"),
            SentenceRecord::new(1, 3, "a"),
        ];
        let pairs = build_pairs(&records);
        let ids: Vec<u64> = pairs.iter().map(|p| p.group_id).collect();
        assert_eq!(ids, vec![1, 1, 2, 2]);
        assert_eq!(pairs[0], Pair::new(1, "a", "b"));
        assert_eq!(pairs[2], Pair::new(2, "x", "y"));
    }
}
