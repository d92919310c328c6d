// Soundex-style phonetic codes, used to catch spelling variants of banned
// terms ("fuk" sounds like "fuck", "viagara" like "viagra").

use std::collections::{HashMap, HashSet};

/// Compute the 4-character phonetic code for a word.
///
/// The code starts with the word's first character unchanged. Each later
/// letter maps to a class digit; unmapped letters (vowels, H, W, Y, digits)
/// contribute nothing. A digit is appended only when it differs from the
/// previously appended digit, even when unmapped letters sit in between -
/// the classic Soundex tie-break. The body is padded with zeros and cut to
/// exactly four characters. Empty input yields an empty code.
pub fn phonetic_code(word: &str) -> String {
    let word = word.to_uppercase();
    let mut chars = word.chars();

    let first = match chars.next() {
        Some(c) => c,
        None => return String::new(),
    };

    let mut code = String::with_capacity(8);
    code.push(first);
    let mut len = 1;
    let mut last_digit: Option<char> = None;

    for c in chars {
        if len >= 4 {
            break;
        }
        let digit = match letter_class(c) {
            Some(d) => d,
            None => continue,
        };
        if last_digit != Some(digit) {
            code.push(digit);
            len += 1;
            last_digit = Some(digit);
        }
    }

    while len < 4 {
        code.push('0');
        len += 1;
    }
    code
}

/// The six Soundex letter groups.
fn letter_class(c: char) -> Option<char> {
    match c {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}

/// Mapping from a phonetic code to the lexicon words sharing it.
///
/// Derived entirely from the banned word set and rebuilt together with it
/// on every reload.
#[derive(Debug, Clone, Default)]
pub struct PhoneticIndex {
    by_code: HashMap<String, HashSet<String>>,
}

impl PhoneticIndex {
    /// Build the code -> {words} index for a set of lexicon words.
    pub fn build<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut by_code: HashMap<String, HashSet<String>> = HashMap::new();
        for word in words {
            let code = phonetic_code(word);
            if code.is_empty() {
                continue;
            }
            by_code.entry(code).or_default().insert(word.to_string());
        }
        Self { by_code }
    }

    /// True when any indexed word shares this code.
    ///
    /// Matching is deliberately against the whole code set rather than one
    /// specific word: a token that merely sounds like *some* banned word is
    /// enough. This is a known source of false positives, kept as shipped.
    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// The words behind a code, for diagnostics.
    pub fn words_for(&self, code: &str) -> Option<&HashSet<String>> {
        self.by_code.get(code)
    }

    /// Number of distinct codes in the index.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
