use std::collections::VecDeque;
use std::fmt;

use bit_set::BitSet;
use tracing::{debug, trace};

use crate::alphabet::{Alphabet, Label};
use crate::elimination::RegexAutomaton;
use crate::graph::{StateId, TransitionGraph};
use crate::math::{Bijection, OrderedSet, Set};
use crate::regex::Regex;
use crate::show::Show;

/// A finite automaton over a fixed alphabet, in general nondeterministic and
/// possibly containing empty-symbol edges.
///
/// Vertices are dense indices starting at zero and vertex `0` is always the
/// start; it exists from construction. Referencing a vertex in
/// [`Automaton::add_edge`] or [`Automaton::mark_terminal`] creates it, so
/// building an automaton can never fail on indices.
///
/// All transformations are pure, they leave `self` untouched and return the
/// transformed automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton {
    alphabet: Alphabet,
    graph: TransitionGraph<Label>,
}

impl Automaton {
    /// Creates an automaton over the given alphabet with a single vertex,
    /// the start vertex `0`.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            graph: TransitionGraph::new(),
        }
    }

    /// The alphabet this automaton works over.
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.graph.size()
    }

    /// Read access to the underlying graph.
    pub fn graph(&self) -> &TransitionGraph<Label> {
        &self.graph
    }

    /// Whether `q` is terminal.
    pub fn is_terminal(&self, q: StateId) -> bool {
        self.graph.is_terminal(q)
    }

    /// The terminal vertices in ascending order.
    pub fn terminals(&self) -> impl Iterator<Item = StateId> + '_ {
        self.graph.terminals()
    }

    /// Inserts an edge from `q` to `p`, creating both vertices if necessary.
    /// An exact duplicate of an existing edge is dropped. Plain characters
    /// lift into symbol labels, so `add_edge(0, 'a', 1)` works.
    ///
    /// # Panics
    /// Panics when a symbol label does not belong to the alphabet.
    pub fn add_edge<L: Into<Label>>(&mut self, q: StateId, label: L, p: StateId) {
        let label = label.into();
        if let Some(sym) = label.symbol() {
            assert!(
                self.alphabet.contains(sym),
                "symbol {sym} does not belong to the alphabet {}",
                self.alphabet
            );
        }
        self.graph.add_edge(q, label, p);
    }

    /// Marks `q` as terminal, creating it if necessary.
    pub fn mark_terminal(&mut self, q: StateId) {
        self.graph.mark_terminal(q);
    }

    /// Unmarks all terminal vertices.
    pub fn clear_terminals(&mut self) {
        self.graph.clear_terminals();
    }

    /// Whether any empty-symbol edge exists.
    pub fn has_epsilons(&self) -> bool {
        self.graph.edges().any(|(_, label, _)| label.is_epsilon())
    }

    /// Whether the automaton is deterministic: no empty-symbol edges and at
    /// most one outgoing edge per vertex and symbol.
    pub fn is_deterministic(&self) -> bool {
        if self.has_epsilons() {
            return false;
        }
        for q in 0..self.size() {
            let mut seen: Set<char> = Set::default();
            for &(label, _) in self.graph.edges_from(q) {
                if let Some(sym) = label.symbol() {
                    if !seen.insert(sym) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Whether every vertex has an outgoing edge for every symbol of the
    /// alphabet. This is a syntactic check, it does not care about
    /// determinism or reachability.
    pub fn is_complete(&self) -> bool {
        (0..self.size()).all(|q| {
            self.alphabet.universe().all(|sym| {
                self.graph
                    .edges_from(q)
                    .any(|&(label, _)| label == Label::Symbol(sym))
            })
        })
    }

    /// All vertices reachable from `q` by empty-symbol edges alone,
    /// including `q` itself. Breadth-first.
    ///
    /// # Panics
    /// Panics when `q` does not exist.
    pub fn epsilon_closure(&self, q: StateId) -> BitSet {
        assert!(q < self.size(), "vertex {q} does not exist");
        let mut closure = BitSet::with_capacity(self.size());
        closure.insert(q);
        let mut queue = VecDeque::new();
        queue.push_back(q);
        while let Some(v) = queue.pop_front() {
            for &(label, p) in self.graph.edges_from(v) {
                if label.is_epsilon() && closure.insert(p) {
                    queue.push_back(p);
                }
            }
        }
        closure
    }

    /// Returns an equivalent automaton without empty-symbol edges: every
    /// vertex receives copies of all proper edges leaving its closure and
    /// inherits terminality from it.
    pub fn remove_epsilons(&self) -> Automaton {
        debug!("removing empty-symbol edges");
        let mut result = Automaton::new(self.alphabet.clone());
        for q in 0..self.size() {
            let closure = self.epsilon_closure(q);
            for v in closure.iter() {
                if self.is_terminal(v) {
                    result.mark_terminal(q);
                }
                for &(label, p) in self.graph.edges_from(v) {
                    if !label.is_epsilon() {
                        trace!("pulling edge {}--{}->{} up to {}", v, label.show(), p, q);
                        result.add_edge(q, label, p);
                    }
                }
            }
        }
        result
    }

    /// Determinizes an epsilon-free automaton through the subset
    /// construction. The start subset `{0}` becomes vertex `0` and successor
    /// subsets are discovered breadth-first. Subsets are keyed as ordered
    /// sets, so the order in which an equal subset is reached can never
    /// split it into two vertices. Empty successors are skipped, which
    /// means the result is deterministic but not necessarily complete. A
    /// result vertex is terminal iff its subset contains a terminal vertex
    /// of `self`.
    ///
    /// # Panics
    /// Panics when the automaton still has empty-symbol edges.
    pub fn subset_construction(&self) -> Automaton {
        assert!(
            !self.has_epsilons(),
            "empty-symbol edges must be removed before determinizing"
        );
        debug!("running the subset construction");

        let mut result = Automaton::new(self.alphabet.clone());
        let mut subsets: Bijection<OrderedSet<StateId>, StateId> = Bijection::new();
        subsets.insert(OrderedSet::from([0]), 0);
        let mut queue = VecDeque::new();
        queue.push_back(0);

        while let Some(q) = queue.pop_front() {
            let subset = subsets
                .get_by_right(&q)
                .cloned()
                .expect("vertices are mapped before they enter the worklist");
            for sym in self.alphabet.universe() {
                let successor: OrderedSet<StateId> = subset
                    .iter()
                    .flat_map(|&v| {
                        self.graph
                            .edges_from(v)
                            .filter_map(move |&(label, p)| (label == Label::Symbol(sym)).then_some(p))
                    })
                    .collect();
                if successor.is_empty() {
                    continue;
                }
                let target = match subsets.get_by_left(&successor) {
                    Some(&known) => known,
                    None => {
                        let fresh = subsets.len();
                        trace!(
                            "subset {} becomes vertex {}",
                            usize::show_collection(successor.iter()),
                            fresh
                        );
                        subsets.insert(successor, fresh);
                        queue.push_back(fresh);
                        fresh
                    }
                };
                result.add_edge(q, sym, target);
            }
        }

        for (subset, &q) in subsets.iter() {
            if subset.iter().any(|&v| self.is_terminal(v)) {
                result.mark_terminal(q);
            }
        }
        result
    }

    /// Empty-symbol removal followed by the subset construction, yielding a
    /// deterministic automaton for the same language.
    pub fn to_dfa(&self) -> Automaton {
        self.remove_epsilons().subset_construction()
    }

    /// Completes a deterministic automaton: if any (vertex, symbol) pair has
    /// no outgoing edge, a single fresh sink vertex is added with a self
    /// loop on every symbol and all missing pairs are routed to it. Already
    /// complete automata come back unchanged, so the operation is
    /// idempotent.
    ///
    /// # Panics
    /// Panics when the automaton is not deterministic.
    pub fn completed(&self) -> Automaton {
        assert!(
            self.is_deterministic(),
            "completion is only defined for deterministic automata"
        );
        if self.is_complete() {
            return self.clone();
        }
        let mut result = self.clone();
        let sink = result.size();
        result.graph.ensure_vertex(sink);
        debug!("completing with sink vertex {}", sink);
        for q in 0..=sink {
            for sym in self.alphabet.universe() {
                if result
                    .graph
                    .edges_from(q)
                    .any(|&(label, _)| label == Label::Symbol(sym))
                {
                    continue;
                }
                result.add_edge(q, sym, sink);
            }
        }
        result
    }

    /// Complements a deterministic automaton with respect to its alphabet:
    /// the result accepts exactly the words that `self` rejects. The
    /// automaton is completed first, so falling off the graph corresponds to
    /// ending in the sink, which the complement accepts.
    ///
    /// # Panics
    /// Panics when the automaton is not deterministic.
    pub fn complement(&self) -> Automaton {
        let mut result = self.completed();
        let terminal: OrderedSet<StateId> = result.terminals().collect();
        result.clear_terminals();
        for q in 0..result.size() {
            if !terminal.contains(&q) {
                result.mark_terminal(q);
            }
        }
        result
    }

    /// Whether the automaton accepts the given word. Works on any automaton:
    /// the epsilon-closed frontier of vertices is stepped through the word
    /// symbol by symbol.
    pub fn accepts<W: IntoIterator<Item = char>>(&self, word: W) -> bool {
        let mut frontier = self.epsilon_closure(0);
        for sym in word {
            let mut next = BitSet::with_capacity(self.size());
            for v in frontier.iter() {
                for &(label, p) in self.graph.edges_from(v) {
                    if label == Label::Symbol(sym) {
                        next.union_with(&self.epsilon_closure(p));
                    }
                }
            }
            frontier = next;
            if frontier.is_empty() {
                return false;
            }
        }
        frontier.iter().any(|v| self.is_terminal(v))
    }

    /// Folds the automaton into a single regular expression for its
    /// language, by lifting it into a [`RegexAutomaton`] and running state
    /// elimination.
    pub fn to_regex(&self) -> Regex {
        RegexAutomaton::from(self).to_regex()
    }
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "alphabet: {}", self.alphabet)?;
        write!(f, "{}", self.graph)
    }
}
