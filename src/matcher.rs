use crate::key::Key;

/// Pairings a match would add to a key, as `(cipher, plain)`.
///
/// A fragment only holds the new pairings, never the ones its parent key already had, so the
/// parent stays untouched until [`Key::extended`] merges the two.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyFragment(Vec<(u8, u8)>);

impl KeyFragment {
    pub fn pairs(&self) -> &[(u8, u8)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Attempts to read `cipher_word` as `ref_word` under `key`.
///
/// A cipher letter that is already mapped must map to the reference letter at the same
/// position. An unmapped cipher letter may not take a plain letter some other cipher letter
/// already owns. Returns the new pairings on success and `None` if the words are incompatible.
pub fn try_extend(cipher_word: &str, ref_word: &str, key: &Key) -> Option<KeyFragment> {
    if cipher_word.len() != ref_word.len() {
        return None;
    }

    let mut scratch = *key;
    let mut fragment = Vec::new();

    for (cipher, plain) in cipher_word.bytes().zip(ref_word.bytes()) {
        match scratch.plain(cipher) {
            Some(mapped) if mapped == plain.to_ascii_lowercase() => continue,
            Some(_) => return None,
            None if scratch.cipher(plain).is_some() => return None,
            None => {
                if !scratch.insert(cipher, plain) {
                    return None;
                }
                fragment.push((cipher.to_ascii_lowercase(), plain.to_ascii_lowercase()));
            }
        }
    }

    Some(KeyFragment(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(pairs: &[(u8, u8)]) -> Key {
        let mut key = Key::new();
        for &(cipher, plain) in pairs {
            assert!(key.insert(cipher, plain));
        }
        key
    }

    #[test]
    fn fresh_key_accepts_same_pattern() {
        let fragment = try_extend("xyz", "the", &Key::new()).unwrap();
        assert_eq!(fragment.pairs(), &[(b'x', b't'), (b'y', b'h'), (b'z', b'e')]);
    }

    #[test]
    fn only_new_pairings_are_returned() {
        let key = key(&[(b'x', b't')]);
        let fragment = try_extend("xyz", "the", &key).unwrap();
        assert_eq!(fragment.pairs(), &[(b'y', b'h'), (b'z', b'e')]);
        assert_eq!(key.len(), 1);
    }

    #[test]
    fn mapped_cipher_letter_must_agree() {
        let key = key(&[(b'x', b'c')]);
        assert!(try_extend("xyz", "the", &key).is_none());
    }

    #[test]
    fn owned_plain_letter_is_refused() {
        // q already decodes to t, so x cannot decode to t as well.
        let key = key(&[(b'q', b't')]);
        assert!(try_extend("xyz", "the", &key).is_none());
    }

    #[test]
    fn repeated_letters_stay_consistent() {
        assert_eq!(try_extend("xx", "ab", &Key::new()), None);
        assert_eq!(try_extend("xy", "aa", &Key::new()), None);
        let fragment = try_extend("xyx", "aba", &Key::new()).unwrap();
        assert_eq!(fragment.len(), 2);
    }

    #[test]
    fn length_mismatch_is_incompatible() {
        assert!(try_extend("xyz", "th", &Key::new()).is_none());
    }

    #[test]
    fn fully_resolved_word_gives_empty_fragment() {
        let key = key(&[(b'x', b't'), (b'y', b'h'), (b'z', b'e')]);
        let fragment = try_extend("xyz", "the", &key).unwrap();
        assert!(fragment.is_empty());
    }

    #[test]
    fn extension_keeps_bijection() {
        let base = key(&[(b'q', b'c')]);
        let fragment = try_extend("ywx", "hat", &base).unwrap();
        let extended = base.extended(&fragment);
        assert_eq!(extended.len(), 4);
        assert_eq!(extended.decode("qwx ywx"), "cat hat");
        for (cipher, plain) in extended.pairs() {
            assert_eq!(extended.cipher(plain), Some(cipher));
        }
    }
}
