//! Exports automata in Graphviz's DOT format.

use std::fmt::Write;

use itertools::Itertools;

use crate::automaton::{Automaton, StateId};

impl Automaton {
    /// Returns the states reachable from `initial` as a graph in DOT
    /// format.
    ///
    /// Final states are drawn as double circles labelled with the patterns
    /// associated to them, and edges are labelled with the bytes they
    /// match.
    pub fn to_dot(&self, initial: StateId) -> String {
        let mut dot = String::new();

        // Writing into a String never fails.
        let _ = writeln!(dot, "digraph automaton {{");
        let _ = writeln!(dot, "  rankdir=LR;");
        let _ = writeln!(dot, "  node [shape=circle];");
        let _ = writeln!(dot, "  start [shape=point];");
        let _ = writeln!(dot, "  start -> {};", initial);

        let reachable = self.reachable(initial);

        for id in &reachable {
            let state = self.state(*id);
            if state.is_final() {
                if state.associations().is_empty() {
                    let _ = writeln!(dot, "  {} [shape=doublecircle];", id);
                } else {
                    let _ = writeln!(
                        dot,
                        "  {} [shape=doublecircle, xlabel=\"{}\"];",
                        id,
                        state.associations().iter().join(" ")
                    );
                }
            }
        }

        for id in &reachable {
            for transition in self.state(*id).transitions() {
                let _ = writeln!(
                    dot,
                    "  {} -> {} [label=\"{}\"];",
                    id,
                    transition.target(),
                    transition.bytes()
                );
            }
        }

        dot.push('}');
        dot
    }
}
