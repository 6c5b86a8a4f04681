use serde::{Deserialize, Serialize};

/// Schema of `config.yaml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite file, relative to the pagechain home unless absolute.
    pub path: String,
    pub model: StoreModel,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "pagechain.db".into(),
            model: StoreModel::Actual,
        }
    }
}

/// Which hit source backs the reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreModel {
    /// Recorded hits in SQLite.
    #[default]
    Actual,
    /// No data.
    Empty,
    /// Two canned sessions.
    Fixture,
}
