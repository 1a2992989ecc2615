//! Atomic obligation splitting.
//!
//! A paragraph is cut on strong sentence delimiters (`.` and `;`), then any sentence
//! carrying two or more obligation triggers is cut again so that every piece holds
//! exactly one trigger:
//!
//! ```text
//! The vendor shall encrypt data at rest and shall notify the client within 24 hours.
//!            ╰───────────────────────────╯  ╰──────────────────────────────────────╯
//!            "Shall encrypt data at rest and" "Shall notify the client within 24 hours"
//! ```
//!
//! Sentences with zero or one trigger are kept whole (trimmed), so a single
//! obligation never loses its subject.


/// Obligation trigger phrases, longest first so "shall not" wins over "shall".
pub const OBLIGATION_TRIGGERS: &[&str] = &[
    "shall not",
    "must not",
    "required to",
    "prohibited",
    "shall",
    "must",
];

const SENTENCE_DELIMITERS: &[char] = &['.', ';'];

/// A trigger occurrence as a byte range into the sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSpan {
    pub start: usize,
    pub end: usize,
}

/// Splits a paragraph into atomic obligation sentences, preserving order.
pub fn split_into_atomic(text: &str) -> Vec<String> {
    let mut atomics = Vec::new();

    for sentence in text.split(SENTENCE_DELIMITERS) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let triggers = find_triggers(sentence);
        if triggers.len() < 2 {
            atomics.push(sentence.to_string());
            continue;
        }

        for (i, span) in triggers.iter().enumerate() {
            let end = triggers
                .get(i + 1)
                .map(|next| next.start)
                .unwrap_or(sentence.len());
            let piece = sentence[span.start..end].trim();
            if !piece.is_empty() {
                atomics.push(capitalize_first(piece));
            }
        }
    }

    atomics
}

/// Finds non-overlapping trigger occurrences on word boundaries (ASCII case-insensitive).
pub fn find_triggers(sentence: &str) -> Vec<TriggerSpan> {
    // ASCII lowering keeps byte offsets identical to `sentence`.
    let lower = sentence.to_ascii_lowercase();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < lower.len() {
        if !lower.is_char_boundary(pos) || !starts_word(sentence, pos) {
            pos += 1;
            continue;
        }

        let hit = OBLIGATION_TRIGGERS.iter().find_map(|trigger| {
            let end = pos + trigger.len();
            let matches = lower[pos..].starts_with(trigger) && ends_word(sentence, end);
            matches.then_some(TriggerSpan { start: pos, end })
        });

        match hit {
            Some(span) => {
                pos = span.end;
                spans.push(span);
            }
            None => pos += 1,
        }
    }

    spans
}

/// Counts obligation triggers in a sentence.
pub fn count_triggers(sentence: &str) -> usize {
    find_triggers(sentence).len()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_word(s: &str, pos: usize) -> bool {
    s[..pos].chars().next_back().is_none_or(|c| !is_word_char(c))
}

fn ends_word(s: &str, pos: usize) -> bool {
    s.is_char_boundary(pos) && s[pos..].chars().next().is_none_or(|c| !is_word_char(c))
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
