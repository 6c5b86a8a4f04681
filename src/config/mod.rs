pub mod loader;
pub mod models;

use std::path::{Path, PathBuf};

/// Environment variable access, swapped out in tests.
pub trait Env: Send + Sync {
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;
}

pub struct RealEnv;

impl Env for RealEnv {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }
}

/// `$PAGECHAIN_HOME`, else `$HOME/.pagechain`.
pub fn pagechain_home(env: &dyn Env) -> PathBuf {
    if let Ok(home) = env.var("PAGECHAIN_HOME") {
        return PathBuf::from(home);
    }
    let home = env.var("HOME").unwrap_or_else(|_| ".".into());
    Path::new(&home).join(".pagechain")
}

/// Absolute store paths are kept, relative ones resolve against `home`.
pub fn resolve_store_path(path: &str, home: &Path) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() || path.starts_with(":memory:") {
        path.to_path_buf()
    } else {
        home.join(path)
    }
}
