// ============================================================
// Layer 4 — Sentence Preprocessor
// ============================================================
// Normalises raw corpus text before pairing and tokenisation.
//
// Corpus sentences are short, single-line strings, but scraped
// paraphrase collections still contain:
//   - Non-breaking spaces (U+00A0) and zero-width spaces (U+200B)
//   - Byte order marks left over from file concatenation
//   - Tabs, carriage returns and stray newlines
//   - Runs of spaces
//
// Cleaning steps (applied in order):
//   1. Map Unicode whitespace variants and control characters to space
//   2. Collapse runs of spaces into one
//   3. Trim the ends
//   4. Lower-case (everything downstream assumes lower-case text)
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one sentence. Always returns a single line.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true; // swallows leading whitespace

        for c in text.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() || c.is_whitespace() => ' ',
                c => c,
            };

            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim_end().to_lowercase()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
