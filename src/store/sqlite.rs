use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::schema;
use super::{HitSource, NewHit, SessionSummary};
use crate::markov::{Graph, Node, EXIT_STATE};
use crate::session::group_sessions_to_graphs;

/// Hit log persisted in SQLite.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create DB directory: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("failed to open DB: {}", db_path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        Ok(Self { conn })
    }

    pub fn initialize(&self) -> Result<()> {
        schema::create_tables(&self.conn).context("failed to initialize schema")
    }

    pub fn schema_version(&self) -> Result<Option<u32>> {
        match self.conn.query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get::<_, String>(0),
        ) {
            Ok(v) => Ok(v.parse().ok()),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Append one page view. Returns the row id.
    pub fn register_hit(&self, hit: &NewHit) -> Result<i64> {
        if hit.page_no == EXIT_STATE {
            anyhow::bail!("page number {EXIT_STATE} is reserved for the exit state");
        }

        let now = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO hits (page_no, session_id, ip, socket, headers, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                hit.page_no,
                hit.session_id.to_string(),
                &hit.ip,
                hit.socket,
                serde_json::to_string(&hit.headers)?,
                &now,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, page = hit.page_no, session = %hit.session_id, "registered hit");
        Ok(id)
    }

    /// `(page, session)` pairs ordered by session, then arrival.
    pub fn ordered_hits(&self) -> Result<Vec<(Node, Uuid)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT page_no, session_id FROM hits ORDER BY session_id, id")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(page, session)| {
                let page = Node::try_from(page)
                    .with_context(|| format!("invalid page number in hits: {page}"))?;
                let session = Uuid::parse_str(&session)
                    .with_context(|| format!("invalid session id in hits: {session}"))?;
                Ok((page, session))
            })
            .collect()
    }
}

impl HitSource for SqliteStore {
    fn transitions(&self, exit_state: Node) -> Result<BTreeMap<Uuid, Graph>> {
        let hits = self.ordered_hits()?;
        tracing::debug!(hits = hits.len(), "loaded hits");
        Ok(group_sessions_to_graphs(hits, exit_state))
    }

    fn sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, COUNT(*) AS hits FROM hits
             GROUP BY session_id
             ORDER BY MAX(id) DESC",
        )?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(session, hits)| {
                Ok(SessionSummary {
                    session_id: Uuid::parse_str(&session)
                        .with_context(|| format!("invalid session id in hits: {session}"))?,
                    hits: hits as u64,
                })
            })
            .collect()
    }
}
