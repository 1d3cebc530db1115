// ============================================================
// Layer 4 — Corpus Loader
// ============================================================
// Reads the paraphrase corpus from a locally cached CSV file
// (TaPaCo layout) using the csv crate + serde.
//
// Expected header (extra columns are ignored):
//   paraphrase_set_id, sentence_id, paraphrase, lists, tags, language
//
// `language` is optional. When present, only rows matching the
// configured language survive; when absent the whole file is
// assumed to already be single-language.
//
// Every kept sentence goes through the Preprocessor, so records
// leave this module lower-cased and whitespace-normalised.
//
// Reference: csv crate documentation (serde deserialisation)
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::data::preprocessor::Preprocessor;
use crate::domain::sentence::SentenceRecord;
use crate::domain::traits::CorpusSource;

/// One CSV row exactly as it appears on disk.
/// Column names match the corpus header, not our domain names.
#[derive(Debug, Deserialize)]
struct CorpusRow {
    paraphrase_set_id: u64,
    sentence_id:       u64,
    paraphrase:        String,
    #[serde(default)]
    language:          Option<String>,
}

/// Loads a paraphrase corpus CSV from disk.
/// Implements the CorpusSource trait from Layer 3.
pub struct CsvCorpusLoader {
    path:         PathBuf,
    language:     String,
    preprocessor: Preprocessor,
}

impl CsvCorpusLoader {
    /// Create a loader for `path` keeping rows in `language` (e.g. "en")
    pub fn new(path: impl AsRef<Path>, language: impl Into<String>) -> Self {
        Self {
            path:         path.as_ref().to_path_buf(),
            language:     language.into(),
            preprocessor: Preprocessor::new(),
        }
    }

    /// Parse records from any reader. Split out from `load_all`
    /// so tests can feed in-memory CSV.
    fn read_records<R: std::io::Read>(&self, reader: R) -> Result<Vec<SentenceRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut dropped_language = 0usize;
        let mut dropped_empty    = 0usize;

        for (line, row) in csv_reader.deserialize::<CorpusRow>().enumerate() {
            // +2: one for the header, one because enumerate starts at 0
            let row = row.with_context(|| {
                format!("Malformed corpus row {} in '{}'", line + 2, self.path.display())
            })?;

            if let Some(lang) = &row.language {
                if lang.trim() != self.language {
                    dropped_language += 1;
                    continue;
                }
            }

            let text = self.preprocessor.clean(&row.paraphrase);
            if text.is_empty() {
                dropped_empty += 1;
                continue;
            }

            records.push(SentenceRecord::new(row.paraphrase_set_id, row.sentence_id, text));
        }

        tracing::debug!(
            "Corpus parse: kept {}, dropped {} other-language, {} empty",
            records.len(),
            dropped_language,
            dropped_empty,
        );

        Ok(records)
    }
}

impl CorpusSource for CsvCorpusLoader {
    fn load_all(&self) -> Result<Vec<SentenceRecord>> {
        let file = std::fs::File::open(&self.path).with_context(|| {
            format!(
                "Cannot open corpus '{}'. Export the paraphrase dataset to CSV first.",
                self.path.display()
            )
        })?;

        let records = self.read_records(file)?;
        tracing::info!(
            "Loaded {} '{}' sentences from '{}'",
            records.len(),
            self.language,
            self.path.display()
        );
        Ok(records)
    }
}
