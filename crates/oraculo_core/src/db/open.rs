use super::migrations::migrate;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Display for Target<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "file path={}", path.display()),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Opens (creating if needed) the notes database at `path`.
///
/// Missing parent directories are created. The returned connection has the
/// `local_storage` schema at the latest version.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_target(Target::File(path.as_ref()))
}

/// Throwaway database for tests and previews.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_target(Target::Memory)
}

fn open_target(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect(&target).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrate(&mut conn)?;
        Ok(conn)
    });

    let elapsed = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event=db_open module=db status=ok mode={target} duration_ms={elapsed}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={target} duration_ms={elapsed} error={err}"
        ),
    }
    result
}

fn connect(target: &Target<'_>) -> DbResult<Connection> {
    match target {
        Target::Memory => Ok(Connection::open_in_memory()?),
        Target::File(path) => {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(|source| DbError::CreateDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
            Ok(Connection::open(path)?)
        }
    }
}
