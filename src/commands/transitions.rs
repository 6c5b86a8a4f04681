use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use super::OutputFormat;
use crate::markov::{aggregate, render_transitions, Graph, Node, EXIT_STATE};
use crate::store::HitSource;

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Report(String),
    UnknownSession(Uuid),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransitionReport {
    scope: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<Uuid>,
    nodes: Vec<Node>,
    edges: Vec<EdgeReport>,
}

#[derive(Debug, Serialize)]
struct EdgeReport {
    from: Node,
    to: Node,
    weight: u64,
    probability: f64,
}

/// Transition report for one session, or aggregated over all of them.
pub fn run(
    source: &dyn HitSource,
    session_id: Option<Uuid>,
    format: OutputFormat,
) -> Result<Outcome> {
    let mut graphs = source.transitions(EXIT_STATE)?;

    let (header, mut graph) = match session_id {
        Some(id) => match graphs.remove(&id) {
            Some(g) => (format!("Transitions for session {id}:"), g),
            None => return Ok(Outcome::UnknownSession(id)),
        },
        None => {
            tracing::info!(sessions = graphs.len(), "aggregating session graphs");
            ("Aggregated transitions:".to_string(), aggregate(graphs.values()))
        }
    };
    graph.compute_probabilities();

    let report = match format {
        OutputFormat::Text => format!("{header}\n\n{}", render_transitions(&graph)?),
        OutputFormat::Json => {
            let report = TransitionReport {
                scope: if session_id.is_some() { "session" } else { "aggregate" },
                session_id,
                nodes: graph.nodes().collect(),
                edges: edge_reports(&graph),
            };
            format!("{}\n", serde_json::to_string_pretty(&report)?)
        }
    };

    Ok(Outcome::Report(report))
}

fn edge_reports(graph: &Graph) -> Vec<EdgeReport> {
    graph
        .edges()
        .map(|(from, to, edge)| EdgeReport {
            from,
            to,
            weight: edge.weight,
            probability: edge.probability.unwrap_or(0.0),
        })
        .collect()
}
