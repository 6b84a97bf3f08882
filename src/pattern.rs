use std::fmt;

/// The repeated-letter signature of a word, e.g. `dotted` -> `abccda`.
///
/// Each newly seen letter is assigned the next symbol of the alphabet, so two words share a
/// pattern exactly when some letter bijection turns one into the other. Letters are compared
/// case-insensitively. Anything that is not an ASCII letter is copied through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(String);

impl Pattern {
    pub fn of(word: impl AsRef<str>) -> Self {
        let word = word.as_ref();
        let mut symbols = [None; 26];
        let mut next = b'a';
        let mut pattern = String::with_capacity(word.len());

        for c in word.chars() {
            if !c.is_ascii_alphabetic() {
                pattern.push(c);
                continue;
            }

            let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
            let symbol = match symbols[idx] {
                Some(symbol) => symbol,
                None => {
                    let symbol = next;
                    symbols[idx] = Some(symbol);
                    next += 1;
                    symbol
                }
            };
            pattern.push(symbol as char);
        }

        Pattern(pattern)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for Pattern {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
