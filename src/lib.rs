//! Recovers the key of a simple substitution cipher.
//!
//! Cipher words are matched, most frequent first, against words of a reference corpus with the
//! same letter pattern. A beam of the best partial keys is kept after every word; the winner is
//! completed into a full key and used to decode the text.
//!
//! ```
//! use decipher::{Solver, SolverConfig};
//!
//! let solver = Solver::from_reference_text("the cat hat", SolverConfig::default());
//! let solution = solver.solve("xyz qwx ywx");
//! assert_eq!(solution.decode("Xyz qwx ywx."), "The cat hat.");
//! ```

mod error;
mod frequency;
mod key;
mod matcher;
mod pattern;
mod solver;

pub mod io;

pub use error::{Error, Result};
pub use frequency::{count_words, FrequencyIndex, ScoredWord, WordCount};
pub use key::{CompleteKey, Key, ALPHABET};
pub use matcher::{try_extend, KeyFragment};
pub use pattern::Pattern;
pub use solver::{Candidate, Solution, Solver, SolverConfig};
