// ============================================================
// Layer 4 — EDA Augmenter
// ============================================================
// "Easy Data Augmentation" — four cheap word-level edits that
// change a sentence's surface form while keeping most of its
// words. Used to manufacture convincing FAKE paraphrases:
//
//   SR  synonym replacement   swap n non-stop-words for a synonym
//   RI  random insertion      insert n synonyms of random words
//   RS  random swap           swap the positions of two words, n times
//   RD  random deletion       drop each word with probability p
//
// n = max(1, ⌊α · word_count⌋), α = p = 0.1 by default.
//
// One sentence is produced per technique, the four are shuffled
// and the first one is returned — a uniformly random technique.
//
// Before editing, the sentence is reduced to lowercase a–z words
// (apostrophes dropped, hyphens become spaces).
//
// Reference: Wei & Zou (2019) EDA paper
//            rand crate documentation

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::collections::HashSet;

use crate::domain::traits::{Augmenter, SynonymSource};

const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she",
    "her", "hers", "herself", "it", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of",
    "at", "by", "for", "with", "about", "against", "between", "into", "through",
    "during", "before", "after", "above", "below", "to", "from", "up", "down",
    "in", "out", "on", "off", "over", "under", "again", "further", "then",
    "once", "here", "there", "when", "where", "why", "how", "all", "any", "both",
    "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
    "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now",
];

/// Give up inserting after this many words without synonyms
const MAX_INSERT_LOOKUPS: usize = 10;
/// Give up swapping after this many identical index draws
const MAX_SWAP_DRAWS: usize = 3;

/// Strip a sentence down to lowercase a–z words separated by single spaces.
pub fn clean_chars(sentence: &str) -> String {
    let lowered = sentence
        .replace(['\u{2019}', '\''], "")
        .replace(['-', '\t', '\n'], " ")
        .to_lowercase();

    let mapped: String = lowered
        .chars()
        .map(|c| if c.is_ascii_lowercase() { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Word-level EDA augmenter over any synonym source.
pub struct EdaAugmenter<S: SynonymSource> {
    synonyms:   S,
    alpha_sr:   f64,
    alpha_ri:   f64,
    alpha_rs:   f64,
    p_rd:       f64,
    stop_words: HashSet<&'static str>,
}

impl<S: SynonymSource> EdaAugmenter<S> {
    /// Augmenter with the standard α = 0.1 for every technique
    pub fn new(synonyms: S) -> Self {
        Self::with_rates(synonyms, 0.1, 0.1, 0.1, 0.1)
    }

    pub fn with_rates(synonyms: S, alpha_sr: f64, alpha_ri: f64, alpha_rs: f64, p_rd: f64) -> Self {
        Self {
            synonyms,
            alpha_sr,
            alpha_ri,
            alpha_rs,
            p_rd,
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    fn edits_for(&self, alpha: f64, num_words: usize) -> usize {
        ((alpha * num_words as f64) as usize).max(1)
    }

    /// Replace up to `n` distinct non-stop-words (every occurrence) with a synonym.
    pub fn synonym_replacement<R: Rng + ?Sized>(&self, words: &[String], n: usize, rng: &mut R) -> Vec<String> {
        let mut new_words = words.to_vec();

        let mut candidates: Vec<&String> = Vec::new();
        for w in words {
            if !self.stop_words.contains(w.as_str()) && !candidates.contains(&w) {
                candidates.push(w);
            }
        }
        candidates.shuffle(rng);

        let mut replaced = 0usize;
        for word in candidates {
            let syns = self.synonyms.synonyms(word);
            if let Some(syn) = syns.choose(rng) {
                for w in new_words.iter_mut().filter(|w| w.as_str() == word.as_str()) {
                    *w = syn.clone();
                }
                replaced += 1;
            }
            if replaced >= n {
                break;
            }
        }

        // multi-word synonyms become separate words again
        new_words.join(" ").split(' ').map(str::to_string).collect()
    }

    /// Insert `n` synonyms of randomly chosen words at random positions.
    pub fn random_insertion<R: Rng + ?Sized>(&self, words: &[String], n: usize, rng: &mut R) -> Vec<String> {
        let mut new_words = words.to_vec();
        for _ in 0..n {
            self.add_word(&mut new_words, rng);
        }
        new_words
    }

    fn add_word<R: Rng + ?Sized>(&self, words: &mut Vec<String>, rng: &mut R) {
        if words.is_empty() {
            return;
        }
        let mut lookups = 0usize;
        let synonym = loop {
            let word = &words[rng.gen_range(0..words.len())];
            if let Some(first) = self.synonyms.synonyms(word).into_iter().next() {
                break first;
            }
            lookups += 1;
            if lookups >= MAX_INSERT_LOOKUPS {
                return;
            }
        };
        let idx = rng.gen_range(0..words.len());
        words.insert(idx, synonym);
    }

    /// Swap two random positions, `n` times.
    pub fn random_swap<R: Rng + ?Sized>(&self, words: &[String], n: usize, rng: &mut R) -> Vec<String> {
        let mut new_words = words.to_vec();
        for _ in 0..n {
            swap_word(&mut new_words, rng);
        }
        new_words
    }

    /// Drop each word with probability `p`; never returns an empty sentence
    /// for non-empty input.
    pub fn random_deletion<R: Rng + ?Sized>(&self, words: &[String], p: f64, rng: &mut R) -> Vec<String> {
        if words.len() <= 1 {
            return words.to_vec();
        }

        let kept: Vec<String> = words
            .iter()
            .filter(|_| rng.gen::<f64>() > p)
            .cloned()
            .collect();

        if kept.is_empty() {
            vec![words[rng.gen_range(0..words.len())].clone()]
        } else {
            kept
        }
    }

    /// One sentence per technique, cleaned, in random order.
    pub fn variants<R: Rng + ?Sized>(&self, sentence: &str, rng: &mut R) -> Vec<String> {
        let cleaned = clean_chars(sentence);
        let words: Vec<String> = cleaned.split(' ').filter(|w| !w.is_empty()).map(str::to_string).collect();
        if words.is_empty() {
            return vec![cleaned];
        }
        let num_words = words.len();

        let mut out = vec![
            self.synonym_replacement(&words, self.edits_for(self.alpha_sr, num_words), rng),
            self.random_insertion(&words, self.edits_for(self.alpha_ri, num_words), rng),
            self.random_swap(&words, self.edits_for(self.alpha_rs, num_words), rng),
            self.random_deletion(&words, self.p_rd, rng),
        ]
        .into_iter()
        .map(|ws| clean_chars(&ws.join(" ")))
        .collect::<Vec<_>>();

        out.shuffle(rng);
        out
    }
}

fn swap_word<R: Rng + ?Sized>(words: &mut [String], rng: &mut R) {
    if words.is_empty() {
        return;
    }
    let first = rng.gen_range(0..words.len());
    let mut second = first;
    let mut draws = 0usize;
    while second == first {
        second = rng.gen_range(0..words.len());
        draws += 1;
        if draws > MAX_SWAP_DRAWS {
            return;
        }
    }
    words.swap(first, second);
}

impl<S: SynonymSource> Augmenter for EdaAugmenter<S> {
    fn augment(&self, sentence: &str, rng: &mut dyn RngCore) -> String {
        self.variants(sentence, rng)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::thesaurus::BuiltinThesaurus;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn words(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_string).collect()
    }

    fn eda() -> EdaAugmenter<BuiltinThesaurus> {
        EdaAugmenter::new(BuiltinThesaurus::new())
    }

    #[test]
    fn test_clean_chars() {
        assert_eq!(clean_chars("Don't well-known\tcat, 42 sat!"), "dont well known cat sat");
        assert_eq!(clean_chars("?!"), "");
    }

    #[test]
    fn test_synonym_replacement_skips_stop_words() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = eda().synonym_replacement(&words("the cat sat"), 1, &mut rng);
        assert_eq!(out[0], "the");
        assert_ne!(out, words("the cat sat"));
    }

    #[test]
    fn test_synonym_replacement_replaces_every_occurrence() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = eda().synonym_replacement(&words("dog sees dog"), 1, &mut rng);
        assert_eq!(out[0], out[2]);
        assert_ne!(out[0], "dog");
    }

    #[test]
    fn test_random_insertion_adds_words() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = eda().random_insertion(&words("the big cat"), 2, &mut rng);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_random_insertion_without_synonyms_is_noop() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = eda().random_insertion(&words("zzz qqq"), 1, &mut rng);
        assert_eq!(out, words("zzz qqq"));
    }

    #[test]
    fn test_random_swap_keeps_multiset() {
        let mut rng = StdRng::seed_from_u64(9);
        let input   = words("a b c d e");
        let mut out = eda().random_swap(&input, 2, &mut rng);
        out.sort();
        assert_eq!(out, input);
    }

    #[test]
    fn test_random_deletion_never_empty() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = eda().random_deletion(&words("a b c"), 1.0, &mut rng);
        assert_eq!(out.len(), 1);
        let single = eda().random_deletion(&words("alone"), 1.0, &mut rng);
        assert_eq!(single, words("alone"));
    }

    #[test]
    fn test_variants_one_per_technique() {
        let mut rng = StdRng::seed_from_u64(13);
        let out = eda().variants("The big cat sat on the old mat.", &mut rng);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_augment_empty_sentence() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(eda().augment("...", &mut rng), "");
    }

    #[test]
    fn test_augment_is_deterministic_for_a_seed() {
        let a = eda().augment("the happy dog runs home", &mut StdRng::seed_from_u64(21));
        let b = eda().augment("the happy dog runs home", &mut StdRng::seed_from_u64(21));
        assert_eq!(a, b);
    }
}
