//! SQLite-based store implementation

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{
    AccessRights, AccessRule, AliasNamespaceStore, NamespaceHandle, StoreError, StoreResult,
};

/// SQLite-based store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }

    fn init_schema(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Namespaces
            CREATE TABLE IF NOT EXISTS namespaces (
                path TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            );

            -- Allow rules, one per account
            CREATE TABLE IF NOT EXISTS namespace_acl (
                path TEXT NOT NULL REFERENCES namespaces(path),
                account TEXT NOT NULL,
                rights INTEGER NOT NULL,
                PRIMARY KEY (path, account)
            );

            -- Values, ordered by id
            CREATE TABLE IF NOT EXISTS namespace_values (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                path TEXT NOT NULL REFERENCES namespaces(path),
                name TEXT NOT NULL,
                value TEXT NOT NULL,
                UNIQUE (path, name)
            );
            "#,
        )?;

        debug!("Store schema initialized");
        Ok(())
    }

    fn require(ns: &NamespaceHandle, rights: AccessRights) -> StoreResult<()> {
        if ns.can(rights) {
            Ok(())
        } else {
            Err(StoreError::AccessDenied {
                account: ns.account.clone(),
                path: ns.path.clone(),
            })
        }
    }
}

impl AliasNamespaceStore for SqliteStore {
    fn open(
        &self,
        path: &str,
        account: &str,
        rights: AccessRights,
    ) -> StoreResult<NamespaceHandle> {
        let conn = self.conn()?;

        let exists: Option<String> = conn
            .query_row(
                "SELECT path FROM namespaces WHERE path = ?",
                [path],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::NotFound(path.to_string()));
        }

        let bits: Option<u32> = conn
            .query_row(
                "SELECT rights FROM namespace_acl WHERE path = ? AND account = ?",
                params![path, account],
                |row| row.get(0),
            )
            .optional()?;
        let granted = bits
            .map(AccessRights::from_bits_truncate)
            .unwrap_or(AccessRights::empty());

        if !granted.contains(rights) {
            debug!(path, account, requested = ?rights, granted = ?granted, "Namespace access denied");
            return Err(StoreError::AccessDenied {
                account: account.to_string(),
                path: path.to_string(),
            });
        }

        Ok(NamespaceHandle {
            path: path.to_string(),
            account: account.to_string(),
            granted: rights,
        })
    }

    fn create(&self, path: &str, rule: &AccessRule) -> StoreResult<Option<NamespaceHandle>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO namespaces (path, created_at) VALUES (?, ?)",
            params![path, punch_util::now().to_rfc3339()],
        )?;
        if inserted == 0 {
            return Ok(None);
        }

        tx.execute(
            "INSERT INTO namespace_acl (path, account, rights) VALUES (?, ?, ?)",
            params![path, rule.account, rule.rights.bits()],
        )?;
        tx.commit()?;

        debug!(path, account = %rule.account, "Namespace created");
        Ok(Some(NamespaceHandle {
            path: path.to_string(),
            account: rule.account.clone(),
            granted: rule.rights,
        }))
    }

    fn set_value(&self, ns: &NamespaceHandle, name: &str, value: &str) -> StoreResult<()> {
        Self::require(ns, AccessRights::WRITE)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO namespace_values (path, name, value)
            VALUES (?, ?, ?)
            ON CONFLICT(path, name)
            DO UPDATE SET value = excluded.value
            "#,
            params![ns.path, name, value],
        )?;

        debug!(path = %ns.path, name, "Namespace value set");
        Ok(())
    }

    fn value_names(&self, ns: &NamespaceHandle) -> StoreResult<Vec<String>> {
        Self::require(ns, AccessRights::READ)?;
        let conn = self.conn()?;

        let mut stmt =
            conn.prepare("SELECT name FROM namespace_values WHERE path = ? ORDER BY id")?;
        let rows = stmt.query_map([&ns.path], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    fn get_value(&self, ns: &NamespaceHandle, name: &str) -> StoreResult<Option<String>> {
        Self::require(ns, AccessRights::READ)?;
        let conn = self.conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM namespace_values WHERE path = ? AND name = ?",
                params![ns.path, name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn is_healthy(&self) -> bool {
        match self.conn.lock() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => {
                warn!("Store lock poisoned");
                false
            }
        }
    }
}
