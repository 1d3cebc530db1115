use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded, padded pair ready for batching.
/// Sequence format: [CLS] set_a [SEP] set_b [SEP] [PAD]...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub token_type_ids: Vec<u32>,
    pub label:          u8,
}

impl PairSample {
    /// Number of non-padding tokens
    pub fn real_length(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

pub struct PairDataset {
    samples: Vec<PairSample>,
}

impl PairDataset {
    pub fn new(samples: Vec<PairSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// (real, fake) counts
    pub fn label_counts(&self) -> (usize, usize) {
        let real = self.samples.iter().filter(|s| s.label == 1).count();
        (real, self.samples.len() - real)
    }
}

impl Dataset<PairSample> for PairDataset {
    fn get(&self, index: usize) -> Option<PairSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(label: u8) -> PairSample {
        PairSample {
            input_ids:      vec![101, 5, 102, 0],
            attention_mask: vec![1, 1, 1, 0],
            token_type_ids: vec![0, 0, 0, 0],
            label,
        }
    }

    #[test]
    fn test_dataset_access() {
        let ds = PairDataset::new(vec![sample(1), sample(0), sample(0)]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.get(0).unwrap().label, 1);
        assert!(ds.get(3).is_none());
        assert_eq!(ds.label_counts(), (1, 2));
        assert_eq!(sample(1).real_length(), 3);
    }
}
