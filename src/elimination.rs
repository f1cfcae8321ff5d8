use std::fmt;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::automaton::Automaton;
use crate::graph::{StateId, TransitionGraph};
use crate::regex::Regex;

/// An automaton whose edges carry regular expressions instead of single
/// symbols. Between any ordered pair of vertices there is at most one edge;
/// inserting a second one alternates the expressions into it.
///
/// This is the substrate of Kleene's state elimination: a character
/// automaton is lifted with [`RegexAutomaton::from`], then interior vertices
/// are removed one by one with [`RegexAutomaton::eliminate`], each removal
/// rewiring the paths through the vertex into composite expressions, until
/// [`RegexAutomaton::to_regex`] can read a single expression off the residue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegexAutomaton {
    alphabet: Alphabet,
    graph: TransitionGraph<Regex>,
}

impl RegexAutomaton {
    /// Creates an expression automaton over the given alphabet with a single
    /// vertex, the start vertex `0`.
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
    pub fn graph(&self) -> &TransitionGraph<Regex> {
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

    /// Inserts an edge carrying `expr` from `q` to `p`, creating vertices on
    /// demand. If the pair is already connected the expressions merge by
    /// alternation. Plain characters lift into literal expressions, so
    /// `add_edge(0, 'a', 1)` works.
    pub fn add_edge<E: Into<Regex>>(&mut self, q: StateId, expr: E, p: StateId) {
        self.graph.add_edge(q, expr.into(), p);
    }

    /// Marks `q` as terminal, creating it if necessary.
    pub fn mark_terminal(&mut self, q: StateId) {
        self.graph.mark_terminal(q);
    }

    /// The expression on the edge from `q` to `p`. Unconnected pairs give ∅,
    /// re-encoding "no such path" as an expression.
    pub fn edge_expression(&self, q: StateId, p: StateId) -> Regex {
        self.graph
            .edge_between(q, p)
            .cloned()
            .unwrap_or(Regex::Empty)
    }

    /// Removes vertex `q` while preserving the path language between all
    /// remaining vertices: every pair of an incoming edge `i --p--> q` and an
    /// outgoing edge `q --s--> k` becomes an edge `i --p·l*·s--> k`, where
    /// `l` is the self loop of `q` (∅ when there is none, so the starred
    /// loop vanishes). The new edges merge into existing `i --> k` edges by
    /// alternation, and `q` itself is disconnected; its slot stays so all
    /// indices remain stable.
    ///
    /// The start vertex and terminal vertices are never eliminated, calls
    /// naming them are ignored.
    pub fn eliminate(&mut self, q: StateId) {
        if q == 0 || q >= self.size() || self.is_terminal(q) {
            trace!("not eliminating vertex {}", q);
            return;
        }
        let through = self.edge_expression(q, q).star();
        let incoming: Vec<(StateId, Regex)> = self
            .graph
            .edges_into(q)
            .filter(|(i, _)| *i != q)
            .map(|(i, expr)| (i, expr.clone()))
            .collect();
        let outgoing: Vec<(Regex, StateId)> = self
            .graph
            .edges_from(q)
            .filter(|&&(_, p)| p != q)
            .cloned()
            .collect();
        trace!(
            "eliminating vertex {} with {} incoming and {} outgoing edges",
            q,
            incoming.len(),
            outgoing.len()
        );
        self.graph.disconnect(q);
        for (i, into) in &incoming {
            for (out, k) in &outgoing {
                let expr = into
                    .clone()
                    .concatenate(through.clone())
                    .concatenate(out.clone());
                self.graph.add_edge(*i, expr, *k);
            }
        }
    }

    /// Folds the whole automaton into one expression describing the language
    /// between the start vertex and the terminal vertices.
    ///
    /// Works on a copy. A fresh sink vertex is appended and every terminal
    /// is wired to it with an ε edge, making the sink the only terminal.
    /// All other vertices except the start are then eliminated in ascending
    /// order, and the answer is read off the residual pair: with
    /// `a = edge(start, start)`, `b = edge(start, sink)`,
    /// `c = edge(sink, sink)` and `d = edge(sink, start)` (absent edges
    /// being ∅), the language is `a*·b·(c*·d·a*·b)*` when a back edge `d`
    /// exists and `a*·b·c*` otherwise.
    pub fn to_regex(&self) -> Regex {
        debug!("folding an automaton of {} vertices into an expression", self.size());
        let mut work = self.clone();
        let sink = work.size();
        work.graph.ensure_vertex(sink);
        let old: Vec<StateId> = work.terminals().collect();
        for t in old {
            work.add_edge(t, Regex::Epsilon, sink);
        }
        work.graph.clear_terminals();
        work.graph.mark_terminal(sink);

        for q in 1..sink {
            work.eliminate(q);
        }

        let a = work.edge_expression(0, 0);
        let b = work.edge_expression(0, sink);
        let c = work.edge_expression(sink, sink);
        let d = work.edge_expression(sink, 0);
        trace!("residual expressions a = {}, b = {}, c = {}, d = {}", a, b, c, d);

        if d.is_empty() {
            a.star().concatenate(b).concatenate(c.star())
        } else {
            let back = c
                .star()
                .concatenate(d)
                .concatenate(a.clone().star())
                .concatenate(b.clone())
                .star();
            a.star().concatenate(b).concatenate(back)
        }
    }
}

impl From<&Automaton> for RegexAutomaton {
    /// Lifts a character automaton into an expression automaton: symbol
    /// labels become literal expressions and empty-symbol labels become ε.
    /// Parallel edges of the source merge by alternation.
    fn from(automaton: &Automaton) -> Self {
        let mut lifted = RegexAutomaton::new(automaton.alphabet().clone());
        lifted.graph.ensure_vertex(automaton.size() - 1);
        for (q, label, p) in automaton.graph().edges() {
            let expr = match label.symbol() {
                Some(sym) => Regex::Literal(sym),
                None => Regex::Epsilon,
            };
            lifted.add_edge(q, expr, p);
        }
        for t in automaton.terminals() {
            lifted.mark_terminal(t);
        }
        lifted
    }
}

impl fmt::Display for RegexAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "alphabet: {}", self.alphabet)?;
        write!(f, "{}", self.graph)
    }
}
