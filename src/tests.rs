use crate::alphabet::Label::{Epsilon, Symbol};
use crate::prelude::*;

fn automaton(symbols: usize, edges: &[(StateId, Label, StateId)], terminal: &[StateId]) -> Automaton {
    let mut automaton = Automaton::new(Alphabet::of_size(symbols));
    for &(q, label, p) in edges {
        automaton.add_edge(q, label, p);
    }
    for &t in terminal {
        automaton.mark_terminal(t);
    }
    automaton
}

/// A nondeterministic automaton exercising every normalization step at
/// once. It branches on a into two separate cycles, with an ε edge jumping
/// back into the terminal vertex.
fn textbook() -> Automaton {
    automaton(
        2,
        &[
            (0, Symbol('a'), 1),
            (1, Symbol('b'), 1),
            (1, Symbol('a'), 2),
            (2, Symbol('a'), 4),
            (4, Symbol('b'), 2),
            (2, Symbol('a'), 3),
            (3, Symbol('a'), 5),
            (5, Symbol('b'), 3),
            (3, Epsilon, 1),
        ],
        &[1],
    )
}

fn assert_same_language(left: &Automaton, right: &Automaton, words: usize) {
    for word in Words::new(left.alphabet().clone()).take(words) {
        let rendered: String = word.iter().collect();
        assert_eq!(
            left.accepts(word.iter().copied()),
            right.accepts(word.iter().copied()),
            "the automata disagree on {rendered:?}"
        );
    }
}

/// Compiles an expression back into an automaton with empty-symbol glue, in
/// the style of Thompson's construction. This is the independent oracle for
/// the state elimination: folding an automaton and compiling the result must
/// preserve the language.
struct Compiler {
    automaton: Automaton,
    next: StateId,
}

impl Compiler {
    fn fresh(&mut self) -> StateId {
        let q = self.next;
        self.next += 1;
        q
    }

    fn compile(&mut self, expr: &Regex, from: StateId, to: StateId) {
        match expr {
            Regex::Empty => {}
            Regex::Epsilon => self.automaton.add_edge(from, Epsilon, to),
            Regex::Literal(sym) => self.automaton.add_edge(from, Symbol(*sym), to),
            Regex::Concat(x, y) => {
                let mid = self.fresh();
                self.compile(x, from, mid);
                self.compile(y, mid, to);
            }
            Regex::Alt(x, y) => {
                self.compile(x, from, to);
                self.compile(y, from, to);
            }
            Regex::Star(x) => {
                let hub = self.fresh();
                self.automaton.add_edge(from, Epsilon, hub);
                self.compile(x, hub, hub);
                self.automaton.add_edge(hub, Epsilon, to);
            }
        }
    }
}

fn thompson(expr: &Regex, alphabet: Alphabet) -> Automaton {
    let mut compiler = Compiler {
        automaton: Automaton::new(alphabet),
        next: 2,
    };
    compiler.compile(expr, 0, 1);
    compiler.automaton.mark_terminal(1);
    compiler.automaton
}

fn assert_folding_preserves_the_language(subject: &Automaton, words: usize) {
    let folded = subject.to_regex();
    let compiled = thompson(&folded, subject.alphabet().clone());
    for word in Words::new(subject.alphabet().clone()).take(words) {
        let rendered: String = word.iter().collect();
        assert_eq!(
            subject.accepts(word.iter().copied()),
            compiled.accepts(word.iter().copied()),
            "{folded} disagrees with its source on {rendered:?}"
        );
    }
}

#[test_log::test]
fn the_textbook_automaton_determinizes() {
    let nfa = textbook();
    let dfa = nfa.to_dfa();
    assert!(dfa.is_deterministic());
    assert!(!dfa.has_epsilons());
    assert!(dfa.accepts("a".chars()), "the word a must reach a terminal");
    assert!(!dfa.accepts("b".chars()));
    assert!(
        dfa.graph()
            .edges_from(0)
            .all(|&(label, _)| label != Symbol('b')),
        "b leads nowhere from the start"
    );
    assert_same_language(&nfa, &dfa, 255);
}

#[test]
fn epsilon_removal_preserves_the_language() {
    let nfa = textbook();
    let plain = nfa.remove_epsilons();
    assert!(!plain.has_epsilons());
    assert_same_language(&nfa, &plain, 255);
}

#[test]
fn completion_preserves_the_language() {
    let dfa = textbook().to_dfa();
    let complete = dfa.completed();
    assert!(complete.is_complete());
    assert_eq!(complete.completed(), complete);
    assert!(complete.size() <= dfa.size() + 1);
    assert_same_language(&dfa, &complete, 255);
}

#[test]
fn complementation_flips_the_language() {
    let dfa = textbook().to_dfa();
    let complement = dfa.complement();
    for word in Words::new(dfa.alphabet().clone()).take(255) {
        let rendered: String = word.iter().collect();
        assert_ne!(
            dfa.accepts(word.iter().copied()),
            complement.accepts(word.iter().copied()),
            "exactly one of the two must accept {rendered:?}"
        );
    }
    assert_same_language(&complement.complement(), &dfa, 255);
}

#[test_log::test]
fn folding_the_textbook_automaton_preserves_the_language() {
    assert_folding_preserves_the_language(&textbook(), 255);
}

#[test]
fn folding_small_automata_preserves_their_languages() {
    // a single letter
    let single = automaton(2, &[(0, Symbol('a'), 1)], &[1]);
    assert_eq!(single.to_regex(), Regex::Literal('a'));
    // a union of two letters
    let union = automaton(2, &[(0, Symbol('a'), 1), (0, Symbol('b'), 1)], &[1]);
    assert_folding_preserves_the_language(&union, 63);
    // a loop before and after a letter
    let loops = automaton(
        2,
        &[(0, Symbol('a'), 0), (0, Symbol('b'), 1), (1, Symbol('a'), 1)],
        &[1],
    );
    assert_eq!(loops.to_regex().to_string(), "a*ba*");
    assert_folding_preserves_the_language(&loops, 127);
    // branching through two interior vertices
    let branches = automaton(
        2,
        &[
            (0, Symbol('a'), 1),
            (0, Symbol('b'), 2),
            (1, Symbol('b'), 3),
            (2, Symbol('a'), 3),
        ],
        &[3],
    );
    assert_folding_preserves_the_language(&branches, 63);
}

#[test]
fn folding_degenerate_automata() {
    let no_terminal = automaton(1, &[(0, Symbol('a'), 1)], &[]);
    assert_eq!(no_terminal.to_regex(), Regex::Empty);

    let lonely_start = automaton(1, &[], &[0]);
    assert_eq!(lonely_start.to_regex(), Regex::Epsilon);

    let start_loop = automaton(1, &[(0, Symbol('a'), 0)], &[0]);
    assert_eq!(start_loop.to_regex(), Regex::Literal('a').star());
}

#[test]
fn folding_an_automaton_with_a_terminal_start() {
    let subject = automaton(2, &[(0, Symbol('a'), 1), (1, Symbol('b'), 0)], &[0]);
    assert_folding_preserves_the_language(&subject, 127);
}

#[test_log::test]
fn a_full_circle_through_expression_and_back() {
    let expr: Regex = "a(a+b)*".parse().unwrap();
    let nfa = thompson(&expr, Alphabet::of_size(2));
    let folded = nfa.to_dfa().to_regex();
    let recompiled = thompson(&folded, Alphabet::of_size(2));
    assert_same_language(&nfa, &recompiled, 255);
}

#[test]
fn determinization_of_a_compiled_expression_accepts_the_same_words() {
    for pattern in ["ab*", "(a+b)*a", "a*b*", "(ab)*+ba"] {
        let expr: Regex = pattern.parse().unwrap();
        let nfa = thompson(&expr, Alphabet::of_size(2));
        let dfa = nfa.to_dfa();
        assert!(dfa.is_deterministic());
        assert_same_language(&nfa, &dfa, 255);
    }
}

#[test]
fn complementing_twice_gives_the_completion() {
    let dfa = textbook().to_dfa();
    let twice = dfa.complement().complement();
    assert_eq!(twice, dfa.completed());
    assert_same_language(&twice, &dfa, 255);
}
