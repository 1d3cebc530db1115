// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Resolves the tokenizer for a training run and keeps a copy
// next to the model so `score` encodes exactly the same way.
//
// Resolution for training (the result always overwrites
// <output_dir>/tokenizer.json):
//   1. <model_name>/tokenizer.json   (a pretrained tokenizer)
//   2. otherwise build a word-level vocabulary from the
//      training corpus of THIS run
//
// Scoring only ever calls `load()`.
//
// The built tokenizer is written directly as HuggingFace JSON
// and loaded back, which sidesteps the trainer generics of the
// tokenizers crate. It uses BERT conventions: [CLS]=101,
// [SEP]=102, [PAD]=0, and a BertProcessing post-processor so
// pairs are encoded as [CLS] A [SEP] B [SEP].
//
// Words are counted through the tokenizer's own normalizer and
// pre-tokenizer (a skeleton tokenizer holding only the special
// tokens), so every counted word is a word the encoder produces.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokenizers::{
    Normalizer, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer,
};

const TOKENIZER_FILE: &str = "tokenizer.json";
/// Ids below this are reserved for special tokens
const FIRST_WORD_ID: usize = 104;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Use the pretrained tokenizer under `model_name` if there is one,
    /// else build from `texts`. Either way the result replaces this
    /// store's tokenizer.json.
    pub fn load_or_build(
        &self,
        model_name: &str,
        texts:      &[&str],
        max_words:  usize,
    ) -> Result<Tokenizer> {
        let pretrained = Path::new(model_name).join(TOKENIZER_FILE);
        if pretrained.exists() {
            tracing::info!("Using pretrained tokenizer '{}'", pretrained.display());
            let tokenizer = load_file(&pretrained)?;
            self.save(&tokenizer)?;
            return Ok(tokenizer);
        }

        if self.path().exists() {
            tracing::info!("Replacing tokenizer from an earlier run at '{}'", self.path().display());
        }
        tracing::info!("Building word-level tokenizer (max {} words)", max_words);
        self.build_and_save(texts, max_words)
    }

    /// Load the tokenizer saved in this store
    pub fn load(&self) -> Result<Tokenizer> {
        load_file(&self.path())
    }

    fn save(&self, tokenizer: &Tokenizer) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;
        tokenizer
            .save(self.path(), true)
            .map_err(|e| anyhow::anyhow!("Cannot save tokenizer to '{}': {e}", self.path().display()))
    }

    fn build_and_save(&self, texts: &[&str], max_words: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // ── Step 1: Count words as the tokenizer itself splits them ───────────
        let skeleton = Tokenizer::from_str(&tokenizer_json(special_vocab()).to_string())
            .map_err(|e| anyhow::anyhow!("Invalid tokenizer template: {e}"))?;
        let mut freq: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for word in split_words(&skeleton, text)? {
                *freq.entry(word).or_insert(0) += 1;
            }
        }

        // Most frequent first; ties broken alphabetically so the
        // vocabulary is identical across runs
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(max_words);

        // ── Step 2: Vocab after the BERT special ids ──────────────────────────
        let mut vocab = special_vocab();
        let mut next_id = FIRST_WORD_ID;
        for (word, _) in &words {
            if vocab.get(word).is_none() {
                vocab[word] = serde_json::json!(next_id);
                next_id += 1;
            }
        }

        // ── Step 3: Write HuggingFace tokenizer JSON ──────────────────────────
        let tok_path = self.path();
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json(vocab))?)
            .with_context(|| format!("Cannot write '{}'", tok_path.display()))?;

        tracing::info!(
            "Tokenizer built with {} words, saved to '{}'",
            next_id - FIRST_WORD_ID,
            tok_path.display()
        );

        load_file(&tok_path)
    }
}

fn special_vocab() -> serde_json::Value {
    serde_json::json!({
        "[PAD]":  0,
        "[UNK]":  1,
        "[CLS]":  101,
        "[SEP]":  102,
        "[MASK]": 103,
    })
}

fn tokenizer_json(vocab: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [
            {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
            {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
        ],
        "normalizer": {
            "type": "BertNormalizer",
            "clean_text": true,
            "handle_chinese_chars": true,
            "strip_accents": null,
            "lowercase": true
        },
        "pre_tokenizer": {
            "type": "Whitespace"
        },
        "post_processor": {
            "type": "BertProcessing",
            "sep": ["[SEP]", 102],
            "cls": ["[CLS]", 101]
        },
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": vocab,
            "unk_token": "[UNK]"
        }
    })
}

/// Normalise and pre-tokenize `text` with `tokenizer`'s own pipeline.
fn split_words(tokenizer: &Tokenizer, text: &str) -> Result<Vec<String>> {
    let mut pre = PreTokenizedString::from(text);
    if let Some(normalizer) = tokenizer.get_normalizer() {
        pre.normalize(|s| normalizer.normalize(s))
            .map_err(|e| anyhow::anyhow!("Normalisation error: {e}"))?;
    }
    if let Some(pre_tokenizer) = tokenizer.get_pre_tokenizer() {
        pre_tokenizer
            .pre_tokenize(&mut pre)
            .map_err(|e| anyhow::anyhow!("Pre-tokenisation error: {e}"))?;
    }
    Ok(pre
        .get_splits(OffsetReferential::Normalized, OffsetType::Byte)
        .into_iter()
        .map(|(word, _, _)| word.to_string())
        .collect())
}

/// Embedding table size needed for this tokenizer: highest id + 1.
pub fn id_space(tokenizer: &Tokenizer) -> usize {
    tokenizer
        .get_vocab(true)
        .values()
        .max()
        .map_or(0, |&id| id as usize + 1)
}

fn load_file(path: &Path) -> Result<Tokenizer> {
    Tokenizer::from_file(path)
        .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {e}", path.display()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("paraphrase-critic-tok-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn skeleton() -> Tokenizer {
        Tokenizer::from_str(&tokenizer_json(special_vocab()).to_string()).unwrap()
    }

    #[test]
    fn test_split_words_matches_pre_tokenizer() {
        let tok = skeleton();
        assert_eq!(split_words(&tok, "The cat sat.").unwrap(), vec!["the", "cat", "sat", "."]);
        assert_eq!(split_words(&tok, "don't  stop!!").unwrap(), vec!["don", "'", "t", "stop", "!!"]);
    }

    #[test]
    fn test_every_counted_word_encodes_known() {
        let dir   = scratch("cjk");
        let store = TokenizerStore::new(dir.to_string_lossy().to_string());
        let text  = "tom ate 你好 x²";
        let tok   = store.load_or_build("no-such-model", &[text], 100).unwrap();

        let enc = tok.encode(text, false).unwrap();
        assert!(enc.get_tokens().iter().all(|t| t != "[UNK]"), "{:?}", enc.get_tokens());
        // chinese characters are split one per token by the normalizer
        assert!(tok.token_to_id("你").is_some());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_build_then_reload() {
        let dir   = scratch("build");
        let store = TokenizerStore::new(dir.to_string_lossy().to_string());

        let tok = store
            .load_or_build("no-such-model", &["the cat sat", "the cat sits"], 100)
            .unwrap();
        assert!(store.path().exists());
        assert_eq!(tok.token_to_id("[CLS]"), Some(101));
        assert!(tok.token_to_id("cat").is_some());
        // 4 words after the reserved range
        assert_eq!(id_space(&tok), FIRST_WORD_ID + 4);

        let again = store.load().unwrap();
        assert_eq!(again.token_to_id("cat"), tok.token_to_id("cat"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rebuild_replaces_earlier_vocabulary() {
        let dir   = scratch("rebuild");
        let store = TokenizerStore::new(dir.to_string_lossy().to_string());
        store.load_or_build("no-such-model", &["the cat sat"], 100).unwrap();

        let tok = store.load_or_build("no-such-model", &["dogs bark loudly"], 100).unwrap();
        assert!(tok.token_to_id("dogs").is_some());
        assert!(tok.token_to_id("cat").is_none());
        let ids = tok.encode("dogs bark loudly", false).unwrap().get_ids().to_vec();
        assert!(ids.iter().all(|&id| id >= FIRST_WORD_ID as u32));

        // the saved copy is the new one too
        assert!(store.load().unwrap().token_to_id("dogs").is_some());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_max_words_caps_vocabulary() {
        let dir   = scratch("cap");
        let store = TokenizerStore::new(dir.to_string_lossy().to_string());
        let tok = store
            .load_or_build("no-such-model", &["a a a b b c"], 2)
            .unwrap();
        assert!(tok.token_to_id("a").is_some());
        assert!(tok.token_to_id("b").is_some());
        assert!(tok.token_to_id("c").is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_pretrained_directory_wins() {
        let pretrained = scratch("pretrained");
        let first = TokenizerStore::new(pretrained.to_string_lossy().to_string());
        first.load_or_build("no-such-model", &["zebra"], 10).unwrap();

        let out   = scratch("out");
        let store = TokenizerStore::new(out.to_string_lossy().to_string());
        let tok = store
            .load_or_build(&pretrained.to_string_lossy(), &["other words"], 10)
            .unwrap();
        assert!(tok.token_to_id("zebra").is_some());
        assert!(store.path().exists());

        let _ = std::fs::remove_dir_all(&pretrained);
        let _ = std::fs::remove_dir_all(&out);
    }
}
