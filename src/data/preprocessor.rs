// ============================================================
// Layer 4: Utterance Preprocessor
// ============================================================
// Normalises example text as it is read from a training file or
// an endpoint response, before anything is stored in TrainingData.
//
// Training files are hand-edited and often contain:
//   - tabs and non-breaking spaces from copy-pasting
//   - zero-width spaces and byte order marks
//   - stray carriage returns from Windows line endings
//   - runs of spaces used for alignment
//
// Cleaning steps (applied in order):
//   1. Map Unicode whitespace variants and control chars to a space
//   2. Collapse consecutive spaces into one
//   3. Trim both ends
//
// Utterances are single-line, so unlike document cleaning no
// line structure is preserved.
//
// Reference: Rust Book §8 (Strings in Rust)

#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean one utterance.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true; // drops leading whitespace

        for c in text.chars() {
            let c = match c {
                '\u{00A0}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_whitespace() || c.is_control() => ' ',
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

        // at most one trailing space can be left over
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}
