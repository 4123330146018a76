//! Small text helpers shared by the line classifier, the declaration scan
//! and the evaluator.
//!
//! Pseudocode lines are handled textually, so every helper here is careful
//! not to look inside string (`"..."`) or character (`'.'`) literals.

/// Fold accented Latin letters to their ASCII base, lowercase everything and
/// drop apostrophes, so `Écrire` and `ecrire` name the same routine.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| *c != '\'')
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'à' | 'â' | 'ä' => 'a',
            'ì' | 'î' | 'ï' => 'i',
            'ò' | 'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

/// Tracks whether a scan position sits inside a quoted literal.
#[derive(Debug, Default, Clone, Copy)]
struct QuoteState {
    in_string: bool,
    in_char: bool,
    escaped: bool,
}

impl QuoteState {
    /// Feed one character. Returns true when the character belongs to a literal
    /// (including its delimiting quotes).
    fn feed(&mut self, c: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return true;
        }
        if self.in_string || self.in_char {
            match c {
                '\\' => self.escaped = true,
                '"' if self.in_string => self.in_string = false,
                '\'' if self.in_char => self.in_char = false,
                _ => {}
            }
            return true;
        }
        match c {
            '"' => {
                self.in_string = true;
                true
            }
            '\'' => {
                self.in_char = true;
                true
            }
            _ => false,
        }
    }
}

/// Remove a trailing `// comment`, ignoring `//` inside literals.
pub fn strip_comment(line: &str) -> &str {
    let mut state = QuoteState::default();
    let mut prev_slash = false;

    for (idx, c) in line.char_indices() {
        if state.feed(c) {
            prev_slash = false;
            continue;
        }
        if c == '/' {
            if prev_slash {
                return &line[..idx - 1];
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
    }

    line
}

/// Split on commas that are outside literals and parentheses.
///
/// An empty (or all-whitespace) input yields no parts at all.
pub fn split_top_level(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut state = QuoteState::default();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        if state.feed(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());

    parts
}

/// Replace whole words (case-insensitive) outside literals.
///
/// A word is a maximal run of alphanumeric characters or `_`.
pub fn replace_words(text: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = QuoteState::default();
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        if word.is_empty() {
            return;
        }
        let lower = word.to_lowercase();
        match replacements.iter().find(|(from, _)| *from == lower) {
            Some((_, to)) => out.push_str(to),
            None => out.push_str(word),
        }
        word.clear();
    };

    for c in text.chars() {
        if state.feed(c) {
            flush(&mut word, &mut out);
            out.push(c);
            continue;
        }
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);

    out
}
