use std::collections::BTreeMap;

use anyhow::Result;
use uuid::Uuid;

use super::{HitSource, SessionSummary};
use crate::markov::{Graph, Node};

/// `00000000-0000-0000-0000-000000000001`, `…0002`, and so on.
pub fn predictable_uuids() -> impl Iterator<Item = Uuid> {
    (1u128..).map(Uuid::from_u128)
}

/// No hits at all.
pub struct EmptyModel;

impl HitSource for EmptyModel {
    fn transitions(&self, _exit_state: Node) -> Result<BTreeMap<Uuid, Graph>> {
        Ok(BTreeMap::new())
    }

    fn sessions(&self) -> Result<Vec<SessionSummary>> {
        Ok(Vec::new())
    }
}

/// Two canned sessions over pages 1..=3, for trying out reports.
///
/// Combined weights:
///
/// ```text
/// 1 -> 0: 2   2 -> 0: 0   3 -> 0: 0
/// 1 -> 1: 0   2 -> 1: 1   3 -> 1: 2
/// 1 -> 2: 1   2 -> 2: 0   3 -> 2: 1
/// 1 -> 3: 1   2 -> 3: 2   3 -> 3: 2
/// ```
pub struct FixtureModel {
    sessions: Vec<(Uuid, Vec<(Node, Node)>)>,
}

impl FixtureModel {
    pub fn new() -> Self {
        let mut ids = predictable_uuids();
        let mut next_id = || ids.next().unwrap_or_default();

        Self {
            sessions: vec![
                (
                    next_id(),
                    vec![(1, 0), (1, 3), (1, 2), (2, 3), (3, 3), (3, 1)],
                ),
                (
                    next_id(),
                    vec![(1, 0), (2, 3), (2, 1), (3, 3), (3, 1), (3, 2)],
                ),
            ],
        }
    }
}

impl Default for FixtureModel {
    fn default() -> Self {
        Self::new()
    }
}

impl HitSource for FixtureModel {
    fn transitions(&self, _exit_state: Node) -> Result<BTreeMap<Uuid, Graph>> {
        Ok(self
            .sessions
            .iter()
            .map(|(id, edges)| (*id, Graph::from_pairs(edges.iter().copied())))
            .collect())
    }

    fn sessions(&self) -> Result<Vec<SessionSummary>> {
        // every recorded transition starts at one hit
        Ok(self
            .sessions
            .iter()
            .rev()
            .map(|(id, edges)| SessionSummary {
                session_id: *id,
                hits: edges.len() as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markov::aggregate;

    #[test]
    fn uuids_count_up_from_one() {
        let ids: Vec<String> = predictable_uuids().take(2).map(|u| u.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "00000000-0000-0000-0000-000000000001",
                "00000000-0000-0000-0000-000000000002",
            ]
        );
    }

    #[test]
    fn fixture_totals_match_table() {
        let graphs = FixtureModel::new().transitions(0).unwrap();
        let g = aggregate(graphs.values());

        assert_eq!(g.weight(1, 0), Some(2));
        assert_eq!(g.weight(2, 3), Some(2));
        assert_eq!(g.weight(3, 1), Some(2));
        assert_eq!(g.weight(3, 3), Some(2));
        assert_eq!(g.weight(2, 0), None);
    }

    #[test]
    fn empty_model_has_nothing() {
        assert!(EmptyModel.transitions(0).unwrap().is_empty());
        assert!(EmptyModel.sessions().unwrap().is_empty());
    }
}
