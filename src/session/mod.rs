//! Per-session transition graphs from an ordered hit stream.

pub mod peek;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::iter::Peekable;

use thiserror::Error;
use tracing::debug;

use crate::markov::{Graph, Node};

pub use peek::{insert_peeks, Peeks};

#[derive(Debug, Error, PartialEq)]
pub enum GroupError {
    #[error("hits of session {session} are not contiguous")]
    Unordered { session: String },
}

/// Splits `(page, session)` events into adjacent runs of one session.
struct SessionRuns<S, I>
where
    I: Iterator<Item = (Node, S)>,
{
    events: Peekable<I>,
}

impl<S, I> Iterator for SessionRuns<S, I>
where
    S: PartialEq,
    I: Iterator<Item = (Node, S)>,
{
    type Item = (S, Vec<Node>);

    fn next(&mut self) -> Option<Self::Item> {
        let (page, session) = self.events.next()?;
        let mut pages = vec![page];
        while let Some((page, _)) = self.events.next_if(|(_, s)| *s == session) {
            pages.push(page);
        }
        Some((session, pages))
    }
}

fn session_runs<S, I>(events: I) -> SessionRuns<S, I::IntoIter>
where
    I: IntoIterator<Item = (Node, S)>,
{
    SessionRuns {
        events: events.into_iter().peekable(),
    }
}

fn session_graph(pages: Vec<Node>, exit_state: Node) -> Graph {
    Graph::from_pairs(insert_peeks(pages, exit_state))
}

/// Build one graph per session from `(page, session)` events.
///
/// Events must be grouped by session and chronological within each
/// session; grouping only splits adjacent runs and does not check this.
/// A session that reappears later replaces its earlier graph. Use
/// [`group_sessions_checked`] to reject such input instead.
pub fn group_sessions_to_graphs<S, I>(events: I, exit_state: Node) -> BTreeMap<S, Graph>
where
    S: Ord,
    I: IntoIterator<Item = (Node, S)>,
{
    let mut graphs = BTreeMap::new();
    for (session, pages) in session_runs(events) {
        graphs.insert(session, session_graph(pages, exit_state));
    }
    debug!(sessions = graphs.len(), "grouped hits into session graphs");
    graphs
}

/// Like [`group_sessions_to_graphs`], but fails when a session's events
/// are not contiguous.
pub fn group_sessions_checked<S, I>(
    events: I,
    exit_state: Node,
) -> Result<BTreeMap<S, Graph>, GroupError>
where
    S: Ord + Clone + Debug,
    I: IntoIterator<Item = (Node, S)>,
{
    let mut seen = BTreeSet::new();
    let mut graphs = BTreeMap::new();
    for (session, pages) in session_runs(events) {
        if !seen.insert(session.clone()) {
            return Err(GroupError::Unordered {
                session: format!("{session:?}"),
            });
        }
        graphs.insert(session, session_graph(pages, exit_state));
    }
    Ok(graphs)
}
