//! Sources of ordered page hits.

pub mod fixture;
pub mod schema;
pub mod sqlite;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use uuid::Uuid;

use crate::config::models::{StoreConfig, StoreModel};
use crate::config::resolve_store_path;
use crate::markov::{Graph, Node};

pub use fixture::{predictable_uuids, EmptyModel, FixtureModel};
pub use sqlite::SqliteStore;

/// A page view to record.
#[derive(Debug, Clone)]
pub struct NewHit {
    pub page_no: Node,
    pub session_id: Uuid,
    pub ip: Option<String>,
    pub socket: Option<u16>,
    pub headers: BTreeMap<String, String>,
}

impl NewHit {
    pub fn new(page_no: Node, session_id: Uuid) -> Self {
        Self {
            page_no,
            session_id,
            ip: None,
            socket: None,
            headers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub hits: u64,
}

pub trait HitSource {
    /// One transition graph per session, probabilities not computed.
    fn transitions(&self, exit_state: Node) -> Result<BTreeMap<Uuid, Graph>>;

    /// Sessions with their hit counts, most recently active first.
    fn sessions(&self) -> Result<Vec<SessionSummary>>;
}

/// Open the hit source selected by `store.model`.
pub fn open_source(config: &StoreConfig, home: &Path) -> Result<Box<dyn HitSource>> {
    match config.model {
        StoreModel::Actual => {
            let store = SqliteStore::open(&resolve_store_path(&config.path, home))?;
            store.initialize()?;
            Ok(Box::new(store))
        }
        StoreModel::Empty => Ok(Box::new(EmptyModel)),
        StoreModel::Fixture => Ok(Box::new(FixtureModel::new())),
    }
}
