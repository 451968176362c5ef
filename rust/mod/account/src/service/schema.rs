use homecook_sql::SQLStore;

use crate::service::AccountError;

/// Initialize the SQLite schema for accounts.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), AccountError> {
    sql.exec_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            full_name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            email_confirmed INTEGER NOT NULL DEFAULT 0,
            profile_image TEXT,
            join_date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS roles (
            name TEXT PRIMARY KEY COLLATE NOCASE,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_roles (
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            role_name TEXT NOT NULL REFERENCES roles(name) ON DELETE CASCADE,
            PRIMARY KEY (user_id, role_name)
        );
        CREATE INDEX IF NOT EXISTS idx_user_roles_role ON user_roles(role_name);

        -- One row per login; the token's sid points here.
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            revoked INTEGER NOT NULL DEFAULT 0,
            issued_at TEXT NOT NULL,
            expires_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);",
    )?;
    Ok(())
}
