// ============================================================
// Layer 4 — Synonym Sources
// ============================================================
// Word → synonyms lookups used by the EDA augmenter.
//
//   BuiltinThesaurus — a small English table compiled into the
//                      binary; good enough to make augmented
//                      sentences differ from their source
//   FileThesaurus    — loads a larger table from disk, one
//                      entry per line:
//
//                        big<TAB>large,huge,great
//
// Synonyms may contain spaces ("sit down"); the augmenter
// re-splits the sentence after substituting them.
//
// Reference: Rust Book §8 (HashMap)

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

use crate::domain::traits::SynonymSource;

const BUILTIN: &[(&str, &[&str])] = &[
    ("big",       &["large", "huge", "great"]),
    ("small",     &["little", "tiny", "minor"]),
    ("little",    &["small", "tiny"]),
    ("good",      &["fine", "nice", "great"]),
    ("bad",       &["poor", "awful", "terrible"]),
    ("happy",     &["glad", "pleased", "cheerful"]),
    ("sad",       &["unhappy", "sorrowful", "down"]),
    ("fast",      &["quick", "rapid", "speedy"]),
    ("quick",     &["fast", "rapid"]),
    ("slow",      &["sluggish", "unhurried"]),
    ("old",       &["aged", "elderly", "ancient"]),
    ("new",       &["fresh", "novel", "recent"]),
    ("begin",     &["start", "commence"]),
    ("start",     &["begin", "commence"]),
    ("end",       &["finish", "stop", "terminate"]),
    ("stop",      &["halt", "cease", "end"]),
    ("help",      &["aid", "assist"]),
    ("buy",       &["purchase", "acquire"]),
    ("get",       &["obtain", "receive", "acquire"]),
    ("go",        &["move", "travel", "proceed"]),
    ("come",      &["arrive", "approach"]),
    ("see",       &["view", "watch", "observe"]),
    ("look",      &["glance", "peek", "watch"]),
    ("say",       &["state", "tell", "speak"]),
    ("said",      &["stated", "told"]),
    ("tell",      &["inform", "say"]),
    ("think",     &["believe", "suppose", "reckon"]),
    ("know",      &["understand", "realize"]),
    ("want",      &["wish", "desire"]),
    ("like",      &["enjoy", "love"]),
    ("love",      &["adore", "like"]),
    ("hate",      &["detest", "loathe", "dislike"]),
    ("make",      &["create", "build", "produce"]),
    ("give",      &["hand", "offer", "provide"]),
    ("take",      &["grab", "seize", "carry"]),
    ("walk",      &["stroll", "step"]),
    ("run",       &["sprint", "dash", "race"]),
    ("sit",       &["sit down", "rest"]),
    ("sat",       &["rested", "perched"]),
    ("eat",       &["consume", "dine"]),
    ("house",     &["home", "dwelling"]),
    ("home",      &["house", "residence"]),
    ("car",       &["automobile", "vehicle", "auto"]),
    ("cat",       &["kitty", "feline"]),
    ("dog",       &["hound", "puppy", "canine"]),
    ("child",     &["kid", "youngster"]),
    ("man",       &["guy", "fellow", "gentleman"]),
    ("woman",     &["lady", "female"]),
    ("friend",    &["buddy", "pal", "companion"]),
    ("job",       &["work", "occupation", "employment"]),
    ("work",      &["job", "labor", "toil"]),
    ("money",     &["cash", "funds"]),
    ("problem",   &["issue", "trouble", "difficulty"]),
    ("answer",    &["reply", "response"]),
    ("question",  &["query", "inquiry"]),
    ("idea",      &["notion", "thought", "concept"]),
    ("easy",      &["simple", "effortless"]),
    ("hard",      &["difficult", "tough"]),
    ("difficult", &["hard", "tough"]),
    ("beautiful", &["pretty", "lovely", "gorgeous"]),
    ("angry",     &["mad", "furious", "annoyed"]),
    ("tired",     &["weary", "exhausted", "sleepy"]),
    ("smart",     &["clever", "intelligent", "bright"]),
    ("rich",      &["wealthy", "affluent"]),
    ("strong",    &["powerful", "sturdy"]),
    ("afraid",    &["scared", "frightened", "fearful"]),
    ("important", &["significant", "crucial", "essential"]),
    ("maybe",     &["perhaps", "possibly"]),
    ("often",     &["frequently", "regularly"]),
    ("always",    &["forever", "constantly"]),
    ("today",     &["nowadays"]),
    ("lot",       &["great deal", "heap"]),
    ("talk",      &["speak", "chat", "converse"]),
    ("read",      &["peruse", "study"]),
    ("write",     &["compose", "pen"]),
    ("leave",     &["depart", "exit", "go"]),
    ("try",       &["attempt", "endeavor"]),
    ("need",      &["require", "want"]),
    ("room",      &["chamber", "space"]),
    ("book",      &["volume", "novel"]),
];

/// Synonyms compiled into the binary.
pub struct BuiltinThesaurus {
    table: HashMap<&'static str, &'static [&'static str]>,
}

impl BuiltinThesaurus {
    pub fn new() -> Self {
        Self { table: BUILTIN.iter().copied().collect() }
    }
}

impl Default for BuiltinThesaurus {
    fn default() -> Self {
        Self::new()
    }
}

impl SynonymSource for BuiltinThesaurus {
    fn synonyms(&self, word: &str) -> Vec<String> {
        self.table
            .get(word)
            .map(|syns| {
                syns.iter()
                    .filter(|s| **s != word)
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Synonyms loaded from a tab-separated text file.
pub struct FileThesaurus {
    table: HashMap<String, Vec<String>>,
}

impl FileThesaurus {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read thesaurus '{}'", path.display()))?;
        let thesaurus = Self::parse(&text);
        tracing::info!(
            "Loaded {} thesaurus entries from '{}'",
            thesaurus.table.len(),
            path.display()
        );
        Ok(thesaurus)
    }

    /// Lines without a tab, and `#` comments, are skipped.
    pub fn parse(text: &str) -> Self {
        let mut table: HashMap<String, Vec<String>> = HashMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((word, syns)) = line.split_once('\t') else {
                continue;
            };
            let word = word.trim().to_lowercase();
            let entry = table.entry(word.clone()).or_default();
            for syn in syns.split(',') {
                let syn = syn.trim().to_lowercase().replace(['_', '-'], " ");
                if !syn.is_empty() && syn != word && !entry.contains(&syn) {
                    entry.push(syn);
                }
            }
        }

        Self { table }
    }
}

impl SynonymSource for FileThesaurus {
    fn synonyms(&self, word: &str) -> Vec<String> {
        self.table.get(word).cloned().unwrap_or_default()
    }
}
