use std::rc::Rc;

use tracing::{debug, info};

use crate::frequency::{count_words, FrequencyIndex, WordCount};
use crate::key::{CompleteKey, Key};
use crate::matcher::try_extend;
use crate::pattern::Pattern;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    beam_width: usize,
}

impl SolverConfig {
    pub const DEFAULT_BEAM_WIDTH: usize = 100;

    /// A beam narrower than one candidate cannot hold a solution, so widths are clamped to 1.
    pub fn new(beam_width: usize) -> Self {
        SolverConfig {
            beam_width: beam_width.max(1),
        }
    }

    /// Candidates kept after each word, and the cap on extensions per candidate and word.
    pub fn beam_width(&self) -> usize {
        self.beam_width
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig::new(Self::DEFAULT_BEAM_WIDTH)
    }
}

/// One link of a candidate's match history. Siblings in the beam share their common prefix.
#[derive(Debug)]
struct Trail<'w> {
    word: Option<&'w str>,
    parent: Option<Rc<Trail<'w>>>,
}

impl Drop for Trail<'_> {
    // Unlink iteratively so long histories don't recurse once per word on drop.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(link) = parent {
            parent = match Rc::try_unwrap(link) {
                Ok(mut trail) => trail.parent.take(),
                Err(_) => None,
            };
        }
    }
}

/// A scored partial decipherment.
///
/// Candidates are never modified; extending one derives a child that shares the parent's
/// match history and owns its own copy of the key.
#[derive(Clone, Debug)]
pub struct Candidate<'w> {
    score: f64,
    trail: Option<Rc<Trail<'w>>>,
    depth: usize,
    key: Key,
}

impl<'w> Candidate<'w> {
    pub fn seed() -> Self {
        Candidate {
            score: 0.0,
            trail: None,
            depth: 0,
            key: Key::new(),
        }
    }

    fn extend(&self, score: f64, word: Option<&'w str>, key: Key) -> Self {
        Candidate {
            score: self.score + score,
            trail: Some(Rc::new(Trail {
                word,
                parent: self.trail.clone(),
            })),
            depth: self.depth + 1,
            key,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Number of cipher words processed to reach this candidate.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The reference word chosen for each cipher word, in processing order. `None` marks a
    /// cipher word left unmatched.
    pub fn matched_words(&self) -> Vec<Option<&'w str>> {
        let mut words = Vec::with_capacity(self.depth);
        let mut link = self.trail.as_deref();
        while let Some(trail) = link {
            words.push(trail.word);
            link = trail.parent.as_deref();
        }
        words.reverse();
        words
    }
}

/// The outcome of a solve: the winning candidate with its key completed.
#[derive(Clone, Debug)]
pub struct Solution<'w> {
    score: f64,
    cipher_words: Vec<WordCount>,
    matched: Vec<Option<&'w str>>,
    key: CompleteKey,
}

impl<'w> Solution<'w> {
    fn new(best: Candidate<'w>, cipher_words: Vec<WordCount>) -> Self {
        Solution {
            score: best.score(),
            matched: best.matched_words(),
            key: best.key().complete(),
            cipher_words,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn key(&self) -> &CompleteKey {
        &self.key
    }

    /// Each distinct cipher word with the reference word it was matched to.
    pub fn matches(&self) -> impl Iterator<Item = (&str, Option<&'w str>)> + '_ {
        self.cipher_words
            .iter()
            .map(|entry| entry.word.as_str())
            .zip(self.matched.iter().copied())
    }

    pub fn matched_count(&self) -> usize {
        self.matched.iter().filter(|word| word.is_some()).count()
    }

    /// Deciphers any text with the solved key.
    pub fn decode(&self, text: &str) -> String {
        self.key.decode(text)
    }
}

/// Beam search over partial keys, scored against a reference corpus.
///
/// The reference index is built once and only read afterwards, so a single solver may serve
/// any number of solves, including concurrent ones through a shared reference.
#[derive(Clone, Debug)]
pub struct Solver {
    reference: FrequencyIndex,
    config: SolverConfig,
}

impl Solver {
    pub fn new(reference: FrequencyIndex, config: SolverConfig) -> Self {
        Solver { reference, config }
    }

    pub fn from_reference_text(text: &str, config: SolverConfig) -> Self {
        Self::new(FrequencyIndex::from_text(text), config)
    }

    pub fn reference(&self) -> &FrequencyIndex {
        &self.reference
    }

    pub fn config(&self) -> SolverConfig {
        self.config
    }

    pub fn solve(&self, cipher_text: &str) -> Solution<'_> {
        let cipher_words = count_words(cipher_text);
        let best = self.search_words(&cipher_words);
        Solution::new(best, cipher_words)
    }

    /// Runs the search on a cipher text and returns the best partial candidate.
    pub fn search(&self, cipher_text: &str) -> Candidate<'_> {
        self.search_words(&count_words(cipher_text))
    }

    /// Runs the search over cipher words in the given order.
    ///
    /// Words are expected most frequent first and lowercase; each word's count weights the
    /// score of whatever it is matched to.
    pub fn search_words(&self, cipher_words: &[WordCount]) -> Candidate<'_> {
        let mut beam = vec![Candidate::seed()];

        for (idx, entry) in cipher_words.iter().enumerate() {
            debug!(
                word = %entry.word,
                count = entry.count,
                "matching word {} of {}",
                idx + 1,
                cipher_words.len()
            );
            beam = self.step(&beam, entry);
        }

        let best = beam.into_iter().next().unwrap_or_else(Candidate::seed);
        info!(
            words = cipher_words.len(),
            score = best.score(),
            assigned = best.key().len(),
            "search finished"
        );
        best
    }

    /// Extends every candidate in the beam by one cipher word and keeps the best of the results.
    fn step<'w>(&'w self, beam: &[Candidate<'w>], entry: &WordCount) -> Vec<Candidate<'w>> {
        let pattern = Pattern::of(&entry.word);
        let weight = entry.count as f64;
        let mut next: Vec<Candidate<'w>> = Vec::new();

        for candidate in beam {
            let spawned = next.len();
            self.spawn(candidate, &entry.word, &pattern, weight, &mut next);
            if next.len() == spawned {
                next.push(candidate.extend(0.0, None, candidate.key));
            }
        }

        // sort_by is stable: equal scores keep discovery order.
        next.sort_by(|a, b| b.score.total_cmp(&a.score));
        next.truncate(self.config.beam_width);
        next
    }

    fn spawn<'w>(
        &'w self,
        candidate: &Candidate<'w>,
        word: &str,
        pattern: &Pattern,
        weight: f64,
        out: &mut Vec<Candidate<'w>>,
    ) {
        let key = candidate.key();

        if key.resolves(word) {
            if let Some((plain, log_count)) = self.reference.lookup(&key.decode(word)) {
                out.push(candidate.extend(log_count * weight, Some(plain), *key));
            }
            return;
        }

        let references = match self.reference.candidates(pattern) {
            Some(references) => references,
            None => return,
        };

        let mut emitted = 0;
        for reference in references {
            if let Some(fragment) = try_extend(word, &reference.word, key) {
                out.push(candidate.extend(
                    reference.log_count * weight,
                    Some(reference.word.as_str()),
                    key.extended(&fragment),
                ));
                emitted += 1;
                if emitted >= self.config.beam_width {
                    break;
                }
            }
        }
    }
}
