//! SQLite persistence layer for the shader repository

use crate::error::RepositoryError;
use crate::stage::ShaderStage;
use crate::store::{AccessMode, ShaderRecord, ShaderStore};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// How long a shared-mode writer waits on a locked database before failing.
const SHARED_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS shaders (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        stage INTEGER NOT NULL,
        code BLOB NOT NULL
    );
    CREATE UNIQUE INDEX IF NOT EXISTS shaders_name ON shaders (name);
";

/// SQLite-based implementation of ShaderStore
///
/// Owns one connection for its lifetime. The connection is guarded by a lock,
/// so statements issued through one store never interleave.
pub struct SqliteShaderStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
    mode: AccessMode,
}

impl SqliteShaderStore {
    /// Open the repository at `path`.
    ///
    /// An empty path selects a private in-memory database. A missing file is
    /// created (along with missing parent directories); an existing file is
    /// opened read/write. The schema is created if absent.
    pub fn open<P: AsRef<Path>>(path: P, mode: AccessMode) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let in_memory = path.as_os_str().is_empty();

        let conn = open_connection(path, mode)?;
        apply_pragmas(&conn, path, mode, in_memory)?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| RepositoryError::SchemaInit(e.to_string()))?;

        debug!(path = %path.display(), in_memory, ?mode, "Opened shader repository");

        Ok(Self {
            conn: Mutex::new(conn),
            path: (!in_memory).then(|| path.to_path_buf()),
            mode,
        })
    }

    /// Open a private in-memory repository
    pub fn in_memory() -> Result<Self, RepositoryError> {
        Self::open("", AccessMode::Exclusive)
    }

    /// Backing file, or `None` for an in-memory repository
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }
}

fn open_connection(path: &Path, mode: AccessMode) -> Result<Connection, RepositoryError> {
    let open_error = |reason: String| RepositoryError::Open {
        path: path.to_path_buf(),
        reason,
    };

    let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE;
    flags |= match mode {
        AccessMode::Exclusive => OpenFlags::SQLITE_OPEN_NO_MUTEX,
        AccessMode::Shared => OpenFlags::SQLITE_OPEN_FULL_MUTEX,
    };

    if path.as_os_str().is_empty() {
        return Connection::open_in_memory_with_flags(flags | OpenFlags::SQLITE_OPEN_CREATE)
            .map_err(|e| open_error(e.to_string()));
    }

    if !path.exists() {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| open_error(format!("Failed to create parent directory: {}", e)))?;
        }
        flags |= OpenFlags::SQLITE_OPEN_CREATE;
    }

    Connection::open_with_flags(path, flags).map_err(|e| open_error(e.to_string()))
}

fn apply_pragmas(
    conn: &Connection,
    path: &Path,
    mode: AccessMode,
    in_memory: bool,
) -> Result<(), RepositoryError> {
    let pragma_error = |e: rusqlite::Error| RepositoryError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    match mode {
        AccessMode::Exclusive => {
            conn.execute_batch("PRAGMA locking_mode = EXCLUSIVE;")
                .map_err(pragma_error)?;
        }
        AccessMode::Shared => {
            conn.busy_timeout(SHARED_BUSY_TIMEOUT).map_err(pragma_error)?;
            if !in_memory {
                conn.execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(pragma_error)?;
            }
        }
    }
    Ok(())
}

fn decode_stage(name: &str, raw: i64) -> Result<ShaderStage, RepositoryError> {
    ShaderStage::from_raw(raw).ok_or_else(|| RepositoryError::Corrupt {
        name: name.to_string(),
        reason: format!("unknown stage value {}", raw),
    })
}

impl ShaderStore for SqliteShaderStore {
    fn store(&self, name: &str, stage: ShaderStage, code: &[u8]) -> Result<(), RepositoryError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO shaders (name, stage, code) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET stage = excluded.stage, code = excluded.code",
            params![name, stage.as_raw(), code],
        )
        .map_err(|e| RepositoryError::Store {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        debug!(shader = name, ?stage, bytes = code.len(), "Stored shader");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Vec<u8>, RepositoryError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT code FROM shaders WHERE name = ?1",
            params![name],
            |row| row.get::<_, Vec<u8>>(0),
        )
        .optional()
        .map_err(|e| RepositoryError::Load {
            name: name.to_string(),
            reason: e.to_string(),
        })?
        .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }

    fn fetch(&self, name: &str) -> Result<Option<ShaderRecord>, RepositoryError> {
        let row = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT stage, code FROM shaders WHERE name = ?1",
                params![name],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Vec<u8>>(1)?)),
            )
            .optional()
            .map_err(|e| RepositoryError::Load {
                name: name.to_string(),
                reason: e.to_string(),
            })?
        };

        match row {
            Some((raw_stage, code)) => Ok(Some(ShaderRecord {
                name: name.to_string(),
                stage: decode_stage(name, raw_stage)?,
                code,
            })),
            None => Ok(None),
        }
    }

    fn query(&self, name: &str) -> Result<Option<ShaderStage>, RepositoryError> {
        let raw = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT stage FROM shaders WHERE name = ?1",
                params![name],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map_err(|e| RepositoryError::Query {
                name: name.to_string(),
                reason: e.to_string(),
            })?
        };

        raw.map(|raw| decode_stage(name, raw)).transpose()
    }

    fn remove(&self, name: &str) -> Result<bool, RepositoryError> {
        let conn = self.conn.lock();
        let deleted = conn
            .execute("DELETE FROM shaders WHERE name = ?1", params![name])
            .map_err(|e| RepositoryError::Remove {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        debug!(shader = name, deleted, "Removed shader");
        Ok(deleted > 0)
    }

    fn clear(&self) -> Result<usize, RepositoryError> {
        let conn = self.conn.lock();
        let deleted = conn
            .execute("DELETE FROM shaders", [])
            .map_err(|e| RepositoryError::Clear(e.to_string()))?;

        debug!(deleted, "Cleared shader repository");
        Ok(deleted)
    }

    fn names(&self) -> Result<Vec<String>, RepositoryError> {
        let query_error = |e: rusqlite::Error| RepositoryError::Query {
            name: String::new(),
            reason: e.to_string(),
        };

        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare("SELECT name FROM shaders ORDER BY name")
            .map_err(query_error)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_error)?;
        Ok(names)
    }
}
