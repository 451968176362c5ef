use std::path::PathBuf;

/// Storage and listener settings shared by all modules.
///
/// The server binary fills this from its TOML file and CLI flags, then
/// uses it to open the embedded stores.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Directory holding all persistent state.
    pub data_dir: Option<PathBuf>,

    /// Path to the SQLite database file.
    /// Defaults to `{data_dir}/homecook.sqlite` if not specified.
    pub sqlite_path: Option<PathBuf>,

    /// Path to the redb key-value file (verification tokens).
    /// Defaults to `{data_dir}/homecook.redb` if not specified.
    pub kv_path: Option<PathBuf>,

    /// Listen address for the HTTP server.
    pub listen: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            sqlite_path: None,
            kv_path: None,
            listen: "0.0.0.0:5057".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve the SQLite database path.
    pub fn resolve_sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("homecook.sqlite"))
    }

    /// Resolve the redb database path.
    pub fn resolve_kv_path(&self) -> PathBuf {
        self.kv_path
            .clone()
            .unwrap_or_else(|| self.resolve_data_subpath("homecook.redb"))
    }

    fn resolve_data_subpath(&self, name: &str) -> PathBuf {
        self.data_dir
            .as_ref()
            .map(|d| d.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}
