//! ASCII block diagrams of transition probabilities.
//!
//! One line-group per source node: the source box joined with its first
//! destination arrow, then every other destination indented below it.
//! Destinations with 0 % render as empty blocks, which come out as empty
//! lines and separate the sections. Blocks are ordered by sorting their
//! text and reversing, which keeps the output stable for snapshots.

use std::iter;

use super::graph::{Graph, GraphError, Node, TransitionMatrix, EXIT_STATE};

/// Column where the destination box starts.
const ARROW_WIDTH: usize = 20;

const EXIT_LABEL: &str = "exit";

/// Draw every non-exit source node of `graph`, one output line per call
/// of `writeln`. Probabilities must be computed.
pub fn draw_transitions(graph: &Graph, writeln: &mut dyn FnMut(&str)) -> Result<(), GraphError> {
    let matrix = graph.transition_matrix()?;
    for current in 1..matrix.size() {
        draw_source(&matrix, current as Node, writeln);
    }
    Ok(())
}

/// `draw_transitions` collected into a string, each line newline-terminated.
pub fn render_transitions(graph: &Graph) -> Result<String, GraphError> {
    let mut out = String::new();
    draw_transitions(graph, &mut |line| {
        out.push_str(line);
        out.push('\n');
    })?;
    Ok(out)
}

/// Draw the transitions out of `current`. Nothing is written for a node
/// without outgoing probability mass.
///
/// # Panics
///
/// If `current` is the exit state, which never has transitions.
pub fn draw_source(matrix: &TransitionMatrix, current: Node, writeln: &mut dyn FnMut(&str)) {
    assert_ne!(
        current, EXIT_STATE,
        "can not have a transition from the exit state"
    );

    if matrix.size() <= current as usize || matrix.row_sum(current) == 0.0 {
        return;
    }

    let mut blocks: Vec<String> = (1..matrix.size())
        .map(|d| d as Node)
        .filter(|&d| d != current)
        .chain(iter::once(EXIT_STATE))
        .map(|d| arrow_block(d, matrix.get(current, d) * 100.0))
        .collect();
    blocks.sort();
    blocks.reverse();

    let mut blocks = blocks.into_iter();
    let first = blocks.next().unwrap_or_default();
    writeln(&join(&node_box(current), &first));

    let indent = current.to_string().len() + 4;
    for block in blocks {
        writeln(&indent_lines(indent, &block));
    }
}

fn label(node: Node) -> String {
    if node == EXIT_STATE {
        EXIT_LABEL.to_string()
    } else {
        node.to_string()
    }
}

fn node_box(current: Node) -> String {
    let dashes = "-".repeat(current.to_string().len());
    format!("+-{dashes}-+\n| {current} |\n+-{dashes}-+\n")
}

/// Arrow into a boxed destination, led by a newline. Empty for 0 %.
fn arrow_block(next: Node, percent: f64) -> String {
    if percent == 0.0 {
        return String::new();
    }

    let next = label(next);
    let pad = " ".repeat(ARROW_WIDTH);
    let dashes = "-".repeat(next.len());
    format!(
        "\n{pad}+-{dashes}-+\n --- {percent:3.0} % --->     | {next} |\n{pad}+-{dashes}-+"
    )
}

/// Put `right` beside `left` line by line, padding the shorter side with
/// empty lines.
fn join(left: &str, right: &str) -> String {
    let left: Vec<&str> = left.lines().collect();
    let right: Vec<&str> = right.trim_start_matches('\n').lines().collect();

    (0..left.len().max(right.len()))
        .map(|i| {
            let l = left.get(i).copied().unwrap_or("");
            let r = right.get(i).copied().unwrap_or("");
            format!("{l}{r}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn indent_lines(width: usize, text: &str) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
