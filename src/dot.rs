use itertools::Itertools;
use tracing::trace;

use crate::automaton::Automaton;
use crate::elimination::RegexAutomaton;
use crate::graph::TransitionGraph;
use crate::show::Show;

/// Conversion into the graphviz dot format for rendering automata as
/// diagrams.
pub trait Dottable {
    /// Returns the complete dot representation: a `digraph` with one node
    /// per vertex and one labeled arrow per edge. Terminal vertices are
    /// drawn as double circles and the start vertex receives an unlabeled
    /// entry arrow.
    fn dot_representation(&self) -> String;
}

impl Dottable for Automaton {
    fn dot_representation(&self) -> String {
        render(self.graph())
    }
}

impl Dottable for RegexAutomaton {
    fn dot_representation(&self) -> String {
        render(self.graph())
    }
}

fn render<L: Show>(graph: &TransitionGraph<L>) -> String {
    let header = [
        "digraph {".to_string(),
        "  rankdir=LR;".to_string(),
        "  init [shape=none, label=\"\"];".to_string(),
        "  init -> 0;".to_string(),
    ];
    let vertices = (0..graph.size()).map(|q| {
        let shape = if graph.is_terminal(q) {
            "doublecircle"
        } else {
            "circle"
        };
        format!("  {q} [shape={shape}];")
    });
    let edges = graph.edges().map(|(q, label, p)| {
        format!("  {} -> {} [label=\"{}\"];", q, p, sanitize(&label.show()))
    });
    let rendered = header
        .into_iter()
        .chain(vertices)
        .chain(edges)
        .chain(std::iter::once("}".to_string()))
        .join("\n");
    trace!("dot representation\n{}", rendered);
    rendered
}

fn sanitize(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
