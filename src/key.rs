use std::fmt;

use crate::matcher::KeyFragment;

pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

fn rank(u: u8) -> Option<usize> {
    if u.is_ascii_alphabetic() {
        Some((u.to_ascii_lowercase() - b'a') as usize)
    } else {
        None
    }
}

/// A partial substitution key.
///
/// `forward` maps plain letters to cipher letters and `backward` maps cipher letters to plain
/// letters. Both are indexed by letter rank and hold lowercase ASCII letters. The two sides are
/// always inverse partial functions of each other; the only way to add a pairing is through
/// [`Key::insert`], which refuses anything that would make either side many-to-one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Key {
    forward: [Option<u8>; 26],
    backward: [Option<u8>; 26],
}

impl Key {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plain letter a cipher letter decodes to.
    pub fn plain(&self, cipher: u8) -> Option<u8> {
        rank(cipher).and_then(|idx| self.backward[idx])
    }

    /// The cipher letter a plain letter encodes to.
    pub fn cipher(&self, plain: u8) -> Option<u8> {
        rank(plain).and_then(|idx| self.forward[idx])
    }

    /// Pairs `cipher` with `plain`.
    ///
    /// Returns `false` and leaves the key untouched if either letter is not ASCII alphabetic or
    /// if either is already paired with a different letter. Re-inserting an existing pairing is
    /// accepted.
    pub fn insert(&mut self, cipher: u8, plain: u8) -> bool {
        let (c, p) = match (rank(cipher), rank(plain)) {
            (Some(c), Some(p)) => (c, p),
            _ => return false,
        };

        match (self.backward[c], self.forward[p]) {
            (None, None) => {
                self.backward[c] = Some(ALPHABET[p]);
                self.forward[p] = Some(ALPHABET[c]);
                true
            }
            (Some(existing), Some(_)) => existing == ALPHABET[p],
            _ => false,
        }
    }

    /// A copy of this key with every pairing of `fragment` added.
    pub fn extended(&self, fragment: &KeyFragment) -> Key {
        let mut key = *self;
        for &(cipher, plain) in fragment.pairs() {
            let inserted = key.insert(cipher, plain);
            debug_assert!(inserted, "fragment conflicts with its parent key");
        }
        key
    }

    /// True if every letter of `word` already has a plain image.
    pub fn resolves(&self, word: &str) -> bool {
        word.bytes().all(|u| self.plain(u).is_some())
    }

    /// Number of pairings.
    pub fn len(&self) -> usize {
        self.backward.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.len() == ALPHABET.len()
    }

    /// Pairings as `(cipher, plain)` in cipher-alphabet order.
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        ALPHABET
            .iter()
            .zip(self.backward.iter())
            .filter_map(|(&cipher, &plain)| plain.map(|plain| (cipher, plain)))
    }

    /// Fills in every unassigned letter to make a total bijection.
    ///
    /// Plain letters missing from `forward` and cipher letters missing from `backward` are listed
    /// alphabetically and paired up by position. The assignment carries no information; it only
    /// exists so the key is total.
    pub fn complete(&self) -> CompleteKey {
        let free_plain = ALPHABET.iter().filter(|&&p| self.cipher(p).is_none());
        let free_cipher = ALPHABET.iter().filter(|&&c| self.plain(c).is_none());

        let mut key = *self;
        for (&plain, &cipher) in free_plain.zip(free_cipher) {
            key.insert(cipher, plain);
        }

        debug_assert!(key.is_complete());
        CompleteKey(key)
    }

    /// Decodes text through `backward`.
    ///
    /// Letters keep their case. Characters that are not mapped, including everything outside
    /// the ASCII alphabet, are copied unchanged.
    pub fn decode(&self, text: &str) -> String {
        translate(text, &self.backward)
    }

    /// Encodes text through `forward`; the inverse of [`Key::decode`].
    pub fn encode(&self, text: &str) -> String {
        translate(text, &self.forward)
    }
}

fn translate(text: &str, table: &[Option<u8>; 26]) -> String {
    text.chars()
        .map(|c| {
            if !c.is_ascii_alphabetic() {
                return c;
            }

            match table[(c.to_ascii_lowercase() as u8 - b'a') as usize] {
                Some(mapped) if c.is_ascii_uppercase() => mapped.to_ascii_uppercase() as char,
                Some(mapped) => mapped as char,
                None => c,
            }
        })
        .collect()
}

/// A key covering all 26 letters in both directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompleteKey(Key);

impl CompleteKey {
    /// Builds a complete key from `(cipher, plain)` pairs, or `None` if they do not form a
    /// bijection on the whole alphabet.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u8, u8)>) -> Option<Self> {
        let mut key = Key::new();
        for (cipher, plain) in pairs {
            if !key.insert(cipher, plain) {
                return None;
            }
        }

        if key.is_complete() {
            Some(CompleteKey(key))
        } else {
            None
        }
    }

    pub fn key(&self) -> &Key {
        &self.0
    }

    pub fn plain(&self, cipher: u8) -> u8 {
        self.0.plain(cipher).unwrap_or(cipher)
    }

    pub fn decode(&self, text: &str) -> String {
        self.0.decode(text)
    }

    pub fn encode(&self, text: &str) -> String {
        self.0.encode(text)
    }

    /// The key running the other way: encodes what this one decodes.
    pub fn inverse(&self) -> CompleteKey {
        CompleteKey(Key {
            forward: self.0.backward,
            backward: self.0.forward,
        })
    }
}

/// Key file format: one `<cipher> -> <plain>` line per cipher letter, alphabetically.
impl fmt::Display for CompleteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (cipher, plain) in self.0.pairs() {
            writeln!(f, "{} -> {}", cipher as char, plain as char)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_bijection(key: &Key) {
        for &letter in ALPHABET {
            if let Some(plain) = key.plain(letter) {
                assert_eq!(key.cipher(plain), Some(letter));
            }
            if let Some(cipher) = key.cipher(letter) {
                assert_eq!(key.plain(cipher), Some(letter));
            }
        }
    }

    fn complete_from_permutation(permutation: &[u8]) -> CompleteKey {
        CompleteKey::from_pairs(
            ALPHABET
                .iter()
                .zip(permutation)
                .map(|(&cipher, &plain)| (cipher, ALPHABET[plain as usize])),
        )
        .unwrap()
    }

    #[test]
    fn insert_rejects_many_to_one() {
        let mut key = Key::new();
        assert!(key.insert(b'x', b't'));
        assert!(key.insert(b'x', b't'));
        assert!(!key.insert(b'y', b't'));
        assert!(!key.insert(b'x', b'h'));
        assert!(!key.insert(b'1', b'h'));
        assert_eq!(key.len(), 1);
        assert_bijection(&key);
    }

    #[test]
    fn insert_folds_case() {
        let mut key = Key::new();
        assert!(key.insert(b'X', b'T'));
        assert_eq!(key.plain(b'x'), Some(b't'));
        assert_eq!(key.cipher(b'T'), Some(b'x'));
    }

    #[test]
    fn complete_pairs_free_letters_alphabetically() {
        let mut key = Key::new();
        key.insert(b'a', b'b');
        let complete = key.complete();

        assert!(complete.key().is_complete());
        assert_bijection(complete.key());
        assert_eq!(complete.plain(b'a'), b'b');
        // free plain: a, c, d...; free cipher: b, c, d...
        assert_eq!(complete.plain(b'b'), b'a');
        assert_eq!(complete.plain(b'c'), b'c');
        assert_eq!(complete.plain(b'z'), b'z');
    }

    #[test]
    fn complete_of_empty_key_is_identity() {
        let complete = Key::new().complete();
        assert_eq!(complete.decode("Hello, World"), "Hello, World");
    }

    #[test]
    fn decode_preserves_case_and_non_letters() {
        let mut key = Key::new();
        key.insert(b'x', b't');
        key.insert(b'y', b'h');
        key.insert(b'z', b'e');
        assert_eq!(key.decode("Xyz, XYZ! 42 w\u{e9}"), "The, THE! 42 w\u{e9}");
    }

    #[test]
    fn partial_key_leaves_unmapped_letters() {
        let mut key = Key::new();
        key.insert(b'q', b'c');
        assert_eq!(key.decode("qwx"), "cwx");
    }

    #[test]
    fn key_file_format() {
        let complete = Key::new().complete();
        let rendered = complete.to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 26);
        assert_eq!(lines[0], "a -> a");
        assert_eq!(lines[25], "z -> z");
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn from_pairs_requires_total_bijection() {
        assert!(CompleteKey::from_pairs(vec![(b'a', b'b')]).is_none());
        let mut pairs: Vec<_> = ALPHABET.iter().map(|&u| (u, u)).collect();
        pairs[1] = (b'b', b'a');
        assert!(CompleteKey::from_pairs(pairs).is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn decode_inverts_encode(
            permutation in Just((0..26u8).collect::<Vec<_>>()).prop_shuffle(),
            text in "[a-zA-Z0-9 ,.!?'\n]{0,80}",
        ) {
            let key = complete_from_permutation(&permutation);
            let cipher = key.inverse().decode(&text);
            prop_assert_eq!(key.decode(&cipher), text.clone());
            prop_assert_eq!(key.encode(&key.decode(&text)), text);
        }

        #[test]
        fn completion_is_total_bijection(
            pairs in proptest::collection::vec((0..26u8, 0..26u8), 0..40),
        ) {
            let mut key = Key::new();
            for (c, p) in pairs {
                key.insert(ALPHABET[c as usize], ALPHABET[p as usize]);
            }
            assert_bijection(&key);

            let complete = key.complete();
            prop_assert!(complete.key().is_complete());
            assert_bijection(complete.key());
            for (cipher, plain) in key.pairs() {
                prop_assert_eq!(complete.plain(cipher), plain);
            }
        }
    }
}
