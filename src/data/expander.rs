// ============================================================
// Layer 4 — Example Expander
// ============================================================
// Doubles every pair into one REAL and one FAKE labelled example.
//
//   input batch (n rows):  set_a | set_b | other
//
//   output batch (2n rows):
//     rows 0..n   label 1   set_a | set_b              (real pair)
//     rows n..2n  label 0   set_a | fake               (fake pair)
//
// `fake` is chosen ONCE per batch by a coin flip:
//   heads (p = 0.5) → an EDA-augmented copy of each set_a
//   tails           → the pair's `other` negative candidate
//
// Every row in a batch therefore shares the same kind of fake.
// That correlation is part of the recipe; `expand` keeps the
// batch granularity (default 1000 rows) and shuffles afterwards
// so the model never sees a whole batch of one fake kind.
//
// Reference: rand crate documentation
//            Rust Book §13 (Iterators)

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::domain::pair::{LabeledExample, NegativePair, LABEL_FAKE, LABEL_REAL};
use crate::domain::traits::Augmenter;

/// Default number of pairs handled per `expand_batch` call
pub const DEFAULT_EXPAND_BATCH: usize = 1000;

/// Which kind of fake a batch received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeSource {
    Augmented,
    Other,
}

/// Flip the per-batch coin.
pub fn choose_fake_source<R: Rng + ?Sized>(rng: &mut R) -> FakeSource {
    if rng.gen::<f64>() <= 0.5 {
        FakeSource::Augmented
    } else {
        FakeSource::Other
    }
}

/// Expand one batch. Output length is exactly `2 * batch.len()`.
pub fn expand_batch(
    batch:     &[NegativePair],
    rng:       &mut dyn RngCore,
    augmenter: &dyn Augmenter,
) -> (Vec<LabeledExample>, FakeSource) {
    let source = choose_fake_source(rng);

    let mut out = Vec::with_capacity(batch.len() * 2);
    out.extend(
        batch
            .iter()
            .map(|p| LabeledExample::new(p.set_a.as_str(), p.set_b.as_str(), LABEL_REAL)),
    );

    for p in batch {
        let fake = match source {
            FakeSource::Augmented => augmenter.augment(&p.set_a, rng),
            FakeSource::Other     => p.other.clone(),
        };
        out.push(LabeledExample::new(p.set_a.as_str(), fake, LABEL_FAKE));
    }

    (out, source)
}

/// Expand a whole split in chunks of `batch_size`, then shuffle.
pub fn expand(
    pairs:      &[NegativePair],
    batch_size: usize,
    rng:        &mut dyn RngCore,
    augmenter:  &dyn Augmenter,
) -> Vec<LabeledExample> {
    let batch_size = batch_size.max(1);
    let mut examples  = Vec::with_capacity(pairs.len() * 2);
    let mut augmented = 0usize;
    let mut batches   = 0usize;

    for chunk in pairs.chunks(batch_size) {
        let (expanded, source) = expand_batch(chunk, rng, augmenter);
        if source == FakeSource::Augmented {
            augmented += 1;
        }
        batches += 1;
        examples.extend(expanded);
    }

    examples.shuffle(rng);

    tracing::info!(
        "Expanded {} pairs into {} examples ({} of {} batches used augmented fakes)",
        pairs.len(),
        examples.len(),
        augmented,
        batches
    );
    examples
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::negatives::attach_negatives;
    use crate::data::pairing::permutations_of_two;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Marks its output so tests can tell augmented rows apart
    struct Tagger;

    impl Augmenter for Tagger {
        fn augment(&self, sentence: &str, _rng: &mut dyn RngCore) -> String {
            format!("aug:{sentence}")
        }
    }

    fn cat_pairs() -> Vec<NegativePair> {
        let pairs = permutations_of_two(1, &["the cat sat", "the cat sits", "a cat sat"]);
        attach_negatives(pairs).0
    }

    #[test]
    fn test_cat_group_expands_to_twelve_rows() {
        let mut rng = StdRng::seed_from_u64(0);
        let (rows, _) = expand_batch(&cat_pairs(), &mut rng, &Tagger);

        assert_eq!(rows.len(), 12);
        assert_eq!(rows.iter().filter(|r| r.label == LABEL_REAL).count(), 6);
        assert_eq!(rows.iter().filter(|r| r.label == LABEL_FAKE).count(), 6);
    }

    #[test]
    fn test_first_half_real_second_half_fake() {
        let pairs = cat_pairs();
        let mut rng = StdRng::seed_from_u64(1);
        let (rows, _) = expand_batch(&pairs, &mut rng, &Tagger);

        for (i, p) in pairs.iter().enumerate() {
            assert_eq!(rows[i], LabeledExample::new(p.set_a.as_str(), p.set_b.as_str(), LABEL_REAL));
            assert_eq!(rows[i + pairs.len()].set_a, p.set_a);
            assert_eq!(rows[i + pairs.len()].label, LABEL_FAKE);
        }
    }

    #[test]
    fn test_fake_kind_is_uniform_within_a_call() {
        let pairs = cat_pairs();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (rows, source) = expand_batch(&pairs, &mut rng, &Tagger);
            let fakes = &rows[pairs.len()..];
            match source {
                FakeSource::Augmented => {
                    assert!(fakes.iter().all(|r| r.set_b == format!("aug:{}", r.set_a)))
                }
                FakeSource::Other => {
                    for (row, p) in fakes.iter().zip(&pairs) {
                        assert_eq!(row.set_b, p.other);
                    }
                }
            }
        }
    }

    #[test]
    fn test_coin_is_fresh_per_call() {
        let pairs = cat_pairs();
        let mut rng  = StdRng::seed_from_u64(99);
        let sources: Vec<FakeSource> = (0..40)
            .map(|_| expand_batch(&pairs, &mut rng, &Tagger).1)
            .collect();
        assert!(sources.contains(&FakeSource::Augmented));
        assert!(sources.contains(&FakeSource::Other));
    }

    #[test]
    fn test_expand_doubles_and_balances() {
        let mut pairs = permutations_of_two(1, &["a", "b", "c"]);
        pairs.extend(permutations_of_two(2, &["x", "y", "z", "w"]));
        let (negatives, _) = attach_negatives(pairs);

        let mut rng = StdRng::seed_from_u64(4);
        let rows = expand(&negatives, 5, &mut rng, &Tagger);

        assert_eq!(rows.len(), negatives.len() * 2);
        assert_eq!(rows.iter().filter(|r| r.is_real()).count(), negatives.len());
    }

    #[test]
    fn test_expand_empty() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(expand(&[], DEFAULT_EXPAND_BATCH, &mut rng, &Tagger).is_empty());
    }
}
