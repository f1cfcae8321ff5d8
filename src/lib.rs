//! Library for finite automata over a fixed alphabet and the regular
//! expressions describing their languages.
//!
//! Two engines share one graph substrate. [`prelude::Automaton`] carries
//! single-symbol labels, allows nondeterminism and empty-symbol edges, and
//! normalizes through [`prelude::Automaton::remove_epsilons`],
//! [`prelude::Automaton::subset_construction`],
//! [`prelude::Automaton::completed`] and [`prelude::Automaton::complement`].
//! [`prelude::RegexAutomaton`] carries whole expressions on its edges and
//! implements Kleene's state elimination, folding an automaton into a single
//! [`prelude::Regex`] through [`prelude::RegexAutomaton::to_regex`].
//!
//! Vertices are plain indices, vertex `0` is the start, and referencing a
//! vertex creates it, so assembling an automaton never fails:
//!
//! ```
//! use kleene::prelude::*;
//!
//! let mut nfa = Automaton::new(Alphabet::of_size(2));
//! nfa.add_edge(0, 'a', 1);
//! nfa.add_edge(1, 'b', 1);
//! nfa.mark_terminal(1);
//!
//! let dfa = nfa.to_dfa();
//! assert!(dfa.is_deterministic());
//! assert!(dfa.accepts("abb".chars()));
//! assert_eq!(nfa.to_regex().to_string(), "ab*");
//! ```

/// The alphabet of an automaton together with edge labels and the
/// length-lexicographic word enumerator.
pub mod alphabet;
/// The character-labeled engine: nondeterministic automata and their
/// normalizing transformations.
pub mod automaton;
/// Export of automata in the graphviz dot format.
pub mod dot;
/// The expression-labeled engine implementing Kleene's state elimination.
pub mod elimination;
/// The shared graph substrate both engines operate on.
pub mod graph;
/// Aliases for the collection types used throughout the crate.
pub mod math;
/// The regular expression algebra with its parser.
pub mod regex;
/// Human readable rendering of labels, expressions and collections.
pub mod show;

#[cfg(test)]
mod tests;

/// Re-exports everything needed for everyday use of the crate.
pub mod prelude {
    pub use crate::alphabet::{Alphabet, Label, Words};
    pub use crate::automaton::Automaton;
    pub use crate::dot::Dottable;
    pub use crate::elimination::RegexAutomaton;
    pub use crate::graph::{Merge, StateId, TransitionGraph};
    pub use crate::regex::{ParseError, Regex};
    pub use crate::show::Show;
}
