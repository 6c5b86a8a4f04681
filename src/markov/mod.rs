//! Discrete-time Markov chains over page numbers.
//!
//! Nodes are page numbers, `EXIT_STATE` (0) is the implicit end of a
//! session. Only numeric nodes are supported.

pub mod graph;
pub mod render;

pub use graph::{aggregate, Edge, Graph, GraphError, Node, TransitionMatrix, EXIT_STATE};
pub use render::{draw_source, draw_transitions, render_transitions};
