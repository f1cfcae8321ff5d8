use std::collections::VecDeque;
use std::fmt;

use itertools::Itertools;

use crate::graph::Merge;
use crate::show::Show;

/// An ordered, duplicate-free collection of `char` symbols. Every automaton
/// carries one, fixed at construction; completion and complementation are
/// taken with respect to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    /// Creates an alphabet of the given size which uses the first `size`
    /// lowercase letters.
    ///
    /// # Panics
    /// Panics for `size` of 26 or more, there are only so many letters.
    pub fn of_size(size: usize) -> Self {
        assert!(size < 26, "alphabet of size {size} does not fit the lowercase letters");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }

    /// Iterates the symbols in their fixed ascending order.
    pub fn universe(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Whether `sym` belongs to the alphabet.
    pub fn contains(&self, sym: char) -> bool {
        self.0.contains(&sym)
    }

    /// Number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<char> for Alphabet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(", "))
    }
}

/// The label of one edge in a character automaton: either a proper symbol of
/// the alphabet or the empty symbol, which consumes no input when traversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    /// An edge consuming the given symbol.
    Symbol(char),
    /// An edge consuming nothing.
    Epsilon,
}

impl Label {
    /// Whether this is the empty symbol.
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// The underlying symbol, unless this is the empty symbol.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Label::Symbol(sym) => Some(*sym),
            Label::Epsilon => None,
        }
    }
}

impl From<char> for Label {
    fn from(sym: char) -> Self {
        Label::Symbol(sym)
    }
}

/// Two labels between the same pair of vertices collapse only if they are
/// equal. Distinct labels stay as parallel edges.
impl Merge for Label {
    fn merge(&self, incoming: &Self) -> Option<Self> {
        (self == incoming).then_some(*self)
    }
}

impl Show for Label {
    fn show(&self) -> String {
        match self {
            Label::Symbol(sym) => sym.to_string(),
            Label::Epsilon => "ε".to_string(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.show())
    }
}

/// Iterator over all finite words of an alphabet in length-lexicographic
/// order, beginning with the empty word. Never ends for nonempty alphabets,
/// callers are expected to `take` what they need. Mainly useful for
/// comparing the languages of two automata up to a bounded length.
#[derive(Clone, Debug)]
pub struct Words {
    alphabet: Alphabet,
    queue: VecDeque<Vec<char>>,
}

impl Words {
    /// Starts the enumeration for the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(Vec::new());
        Self { alphabet, queue }
    }
}

impl Iterator for Words {
    type Item = Vec<char>;

    fn next(&mut self) -> Option<Self::Item> {
        let word = self.queue.pop_front()?;
        for sym in self.alphabet.universe() {
            let mut extended = word.clone();
            extended.push(sym);
            self.queue.push_back(extended);
        }
        Some(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_of_size_uses_lowercase_prefix() {
        let alphabet = Alphabet::of_size(3);
        assert_eq!(alphabet.universe().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
        assert!(alphabet.contains('b'));
        assert!(!alphabet.contains('d'));
    }

    #[test]
    fn alphabet_from_iterator_sorts_and_dedups() {
        let alphabet = Alphabet::from_iter("baab".chars());
        assert_eq!(alphabet.universe().collect::<Vec<_>>(), vec!['a', 'b']);
        assert_eq!(alphabet.size(), 2);
    }

    #[test]
    fn labels() {
        assert_eq!(Label::from('a'), Label::Symbol('a'));
        assert!(Label::Epsilon.is_epsilon());
        assert_eq!(Label::Symbol('x').symbol(), Some('x'));
        assert_eq!(Label::Epsilon.symbol(), None);
        assert_eq!(Label::Epsilon.show(), "ε");
    }

    #[test]
    fn words_are_length_lexicographic() {
        let words: Vec<String> = Words::new(Alphabet::of_size(2))
            .take(7)
            .map(|word| word.into_iter().collect())
            .collect();
        assert_eq!(words, vec!["", "a", "b", "aa", "ab", "ba", "bb"]);
    }

    #[test]
    fn words_of_the_empty_alphabet() {
        let mut words = Words::new(Alphabet::of_size(0));
        assert_eq!(words.next(), Some(Vec::new()));
        assert_eq!(words.next(), None);
    }
}
