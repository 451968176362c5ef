//! Server configuration loaded from a TOML file.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/homecook"
//!
//! [jwt]
//! secret = "..."
//! issuer = "homecook"
//! expire_secs = 86400
//!
//! [app]
//! base_url = "https://homecook.example.com"
//!
//! [superadmin]
//! email = "owner@example.com"
//! full_name = "Site Owner"
//! password_hash = "$argon2id$..."
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Directory searched for bare context names.
const CONFIG_DIR: &str = "/etc/homecook";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub superadmin: Option<SuperAdminConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Public URL used in verification emails.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Account ensured at startup with the SuperAdmin role.
#[derive(Debug, Clone, Deserialize)]
pub struct SuperAdminConfig {
    pub email: String,
    #[serde(default = "default_admin_name")]
    pub full_name: String,
    /// argon2id PHC string, see `homecookd hash-password`.
    pub password_hash: String,
}

fn default_issuer() -> String {
    "homecook".to_string()
}

fn default_expire_secs() -> i64 {
    86400
}

fn default_base_url() -> String {
    "http://localhost:5057".to_string()
}

fn default_admin_name() -> String {
    "Super Admin".to_string()
}

impl ServerConfig {
    /// Resolve `-c` to a file path. Anything that looks like a path is used
    /// as is; a bare name maps to `/etc/homecook/<name>.toml`.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn account_config(&self) -> account::service::AccountConfig {
        account::service::AccountConfig {
            jwt_secret: self.jwt.secret.clone(),
            issuer: self.jwt.issuer.clone(),
            access_token_ttl: self.jwt.expire_secs,
            base_url: self.app.base_url.clone(),
            ..Default::default()
        }
    }
}
