use std::path::Path;

use pagechain::markov::EXIT_STATE;
use pagechain::store::{HitSource, NewHit, SqliteStore};
use uuid::Uuid;

// ─── Helpers ───

fn open_memory_db() -> SqliteStore {
    let store = SqliteStore::open(Path::new(":memory:")).expect("open in-memory db");
    store.initialize().expect("initialize schema");
    store
}

fn record(store: &SqliteStore, page: u32, session: Uuid) {
    store
        .register_hit(&NewHit::new(page, session))
        .expect("register hit");
}

fn sid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

// ═══════════════════════════════════════════════
// 1. Schema
// ═══════════════════════════════════════════════

#[test]
fn initialize_sets_schema_version() {
    let store = open_memory_db();
    assert_eq!(store.schema_version().unwrap(), Some(1));
}

#[test]
fn initialize_is_repeatable() {
    let store = open_memory_db();
    store.initialize().unwrap();
    assert!(store.ordered_hits().unwrap().is_empty());
}

// ═══════════════════════════════════════════════
// 2. register_hit
// ═══════════════════════════════════════════════

#[test]
fn register_hit_rejects_exit_page() {
    let store = open_memory_db();
    let err = store
        .register_hit(&NewHit::new(EXIT_STATE, sid(1)))
        .unwrap_err();
    assert!(err.to_string().contains("reserved"));
}

#[test]
fn register_hit_stores_metadata() {
    let store = open_memory_db();
    let mut hit = NewHit::new(2, sid(1));
    hit.ip = Some("127.0.0.1".into());
    hit.socket = Some(50123);
    hit.headers.insert("User-Agent".into(), "curl".into());

    let first = store.register_hit(&hit).unwrap();
    let second = store.register_hit(&hit).unwrap();
    assert!(second > first);
}

// ═══════════════════════════════════════════════
// 3. Reading hits back
// ═══════════════════════════════════════════════

#[test]
fn ordered_hits_group_sessions_and_keep_arrival_order() {
    let store = open_memory_db();
    record(&store, 1, sid(2));
    record(&store, 1, sid(1));
    record(&store, 3, sid(2));
    record(&store, 2, sid(1));

    assert_eq!(
        store.ordered_hits().unwrap(),
        vec![(1, sid(1)), (2, sid(1)), (1, sid(2)), (3, sid(2))]
    );
}

#[test]
fn transitions_build_one_graph_per_session() {
    let store = open_memory_db();
    record(&store, 1, sid(1));
    record(&store, 3, sid(1));
    record(&store, 1, sid(2));

    let graphs = store.transitions(EXIT_STATE).unwrap();
    assert_eq!(graphs.len(), 2);

    let s1: Vec<_> = graphs[&sid(1)].edges().map(|(u, v, _)| (u, v)).collect();
    assert_eq!(s1, vec![(1, 3), (3, 0)]);
    let s2: Vec<_> = graphs[&sid(2)].edges().map(|(u, v, _)| (u, v)).collect();
    assert_eq!(s2, vec![(1, 0)]);
}

#[test]
fn transitions_on_empty_store_is_empty() {
    let store = open_memory_db();
    assert!(store.transitions(EXIT_STATE).unwrap().is_empty());
}

#[test]
fn sessions_ordered_by_latest_hit() {
    let store = open_memory_db();
    record(&store, 1, sid(1));
    record(&store, 1, sid(2));
    record(&store, 2, sid(1));
    record(&store, 3, sid(3));

    let sessions = store.sessions().unwrap();
    let order: Vec<(Uuid, u64)> = sessions.iter().map(|s| (s.session_id, s.hits)).collect();
    assert_eq!(order, vec![(sid(3), 1), (sid(1), 2), (sid(2), 1)]);
}

#[test]
fn open_creates_parent_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("hits.db");

    let store = SqliteStore::open(&path).unwrap();
    store.initialize().unwrap();
    assert!(path.exists());
}
