use std::fmt;

use itertools::Itertools;

use crate::math::OrderedSet;
use crate::show::Show;

/// The index of a vertex in a [`TransitionGraph`]. Vertices are dense,
/// starting at zero, and index `0` is always the start vertex.
pub type StateId = usize;

/// Decides what happens when an edge is inserted between a pair of vertices
/// that is already connected.
///
/// This is the seam between the two engines built on the shared substrate:
/// character labels keep distinct parallel edges apart and only drop exact
/// duplicates, while expression labels combine into a single alternative so
/// that at most one edge per ordered vertex pair exists.
pub trait Merge: Clone {
    /// Combines `self`, the label of the existing edge, with the label of an
    /// incoming parallel edge. Returning `None` keeps both edges side by
    /// side.
    fn merge(&self, incoming: &Self) -> Option<Self>;
}

/// Adjacency-list multigraph with labeled edges and a set of terminal
/// vertices, the substrate shared by both automaton engines.
///
/// Vertices come into existence by being referenced: adding an edge or
/// marking a terminal grows the vertex space to cover the index, it never
/// fails. A freshly created graph has exactly one vertex, the start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionGraph<L> {
    edges: Vec<Vec<(L, StateId)>>,
    terminal: OrderedSet<StateId>,
}

impl<L> TransitionGraph<L> {
    /// Creates a graph with a single vertex, the start vertex `0`.
    pub fn new() -> Self {
        Self {
            edges: vec![Vec::new()],
            terminal: OrderedSet::new(),
        }
    }

    /// Number of vertices. At least one, since the start vertex always
    /// exists.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// Grows the vertex space so that `q` exists. Does nothing if it already
    /// does.
    pub fn ensure_vertex(&mut self, q: StateId) {
        if q >= self.edges.len() {
            self.edges.resize_with(q + 1, Vec::new);
        }
    }

    /// Marks `q` as terminal, creating it if necessary.
    pub fn mark_terminal(&mut self, q: StateId) {
        self.ensure_vertex(q);
        self.terminal.insert(q);
    }

    /// Unmarks all terminal vertices.
    pub fn clear_terminals(&mut self) {
        self.terminal.clear();
    }

    /// Whether `q` is terminal.
    pub fn is_terminal(&self, q: StateId) -> bool {
        self.terminal.contains(&q)
    }

    /// The terminal vertices in ascending order.
    pub fn terminals(&self) -> impl Iterator<Item = StateId> + '_ {
        self.terminal.iter().copied()
    }

    /// The outgoing edges of `q` in insertion order. Empty for out-of-range
    /// indices.
    pub fn edges_from(&self, q: StateId) -> impl Iterator<Item = &(L, StateId)> {
        self.edges.get(q).into_iter().flatten()
    }

    /// All edges of the graph as `(source, label, target)` triples, grouped
    /// by source.
    pub fn edges(&self) -> impl Iterator<Item = (StateId, &L, StateId)> {
        self.edges
            .iter()
            .enumerate()
            .flat_map(|(q, out)| out.iter().map(move |(label, p)| (q, label, *p)))
    }

    /// The label of the first edge from `q` to `p`, if the two are
    /// connected. For labels that merge on insertion this is the unique
    /// connecting label.
    pub fn edge_between(&self, q: StateId, p: StateId) -> Option<&L> {
        self.edges
            .get(q)?
            .iter()
            .find(|(_, target)| *target == p)
            .map(|(label, _)| label)
    }

    /// The sources and labels of all edges into `q`.
    pub fn edges_into(&self, q: StateId) -> impl Iterator<Item = (StateId, &L)> {
        self.edges.iter().enumerate().flat_map(move |(i, out)| {
            out.iter()
                .filter_map(move |(label, p)| (*p == q).then_some((i, label)))
        })
    }

    /// Drops every edge out of and into `q`. The vertex slot itself stays,
    /// keeping all other indices valid.
    pub fn disconnect(&mut self, q: StateId) {
        if let Some(out) = self.edges.get_mut(q) {
            out.clear();
        }
        for out in &mut self.edges {
            out.retain(|(_, p)| *p != q);
        }
    }
}

impl<L: Merge> TransitionGraph<L> {
    /// Inserts an edge from `q` to `p`, growing the vertex space to cover
    /// both endpoints. When the pair is already connected the labels decide
    /// what happens, see [`Merge`].
    pub fn add_edge(&mut self, q: StateId, label: L, p: StateId) {
        self.ensure_vertex(q.max(p));
        for (existing, target) in &mut self.edges[q] {
            if *target != p {
                continue;
            }
            if let Some(merged) = existing.merge(&label) {
                *existing = merged;
                return;
            }
        }
        self.edges[q].push((label, p));
    }
}

impl<L> Default for TransitionGraph<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Show> fmt::Display for TransitionGraph<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "vertices: {} | terminal: {}",
            self.size(),
            usize::show_collection(self.terminal.iter())
        )?;
        for (q, out) in self.edges.iter().enumerate() {
            writeln!(
                f,
                "{q}: {}",
                out.iter()
                    .map(|(label, p)| format!("{}->{}", label.show(), p))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}
