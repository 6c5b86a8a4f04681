use anyhow::Result;

use crate::store::{NewHit, SqliteStore};

/// Record one page view and return the session id it was filed under.
pub fn run(store: &SqliteStore, hit: &NewHit) -> Result<String> {
    store.register_hit(hit)?;
    Ok(hit.session_id.to_string())
}
