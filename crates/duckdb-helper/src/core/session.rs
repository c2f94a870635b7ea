use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};

use duckdb::{AccessMode, Config, Connection};
use tokio::sync::oneshot;

use crate::{
    core::{
        query, schema,
        types::{QueryResult, SessionOptions, TableList},
    },
    error::{AppError, AppResult},
};

/// The live connection to one database file.
///
/// DuckDB connections are `Send` but not `Sync`, so the connection lives on a
/// dedicated worker thread and every operation is a message to that thread
/// answered through a oneshot channel. Requests are served strictly in order,
/// one at a time.
#[derive(Debug)]
pub struct QuerySession {
    tx: Option<mpsc::Sender<SessionTask>>,
    worker: Option<thread::JoinHandle<()>>,
    path: PathBuf,
}

impl QuerySession {
    /// Opens `path` on the calling thread so a bad file fails here, then hands
    /// the connection to the worker.
    pub fn open(path: &Path, options: SessionOptions) -> AppResult<Self> {
        let conn = open_conn(path, options)?;
        let (tx, rx) = mpsc::channel::<SessionTask>();
        let path_for_thread = path.to_path_buf();
        let worker = thread::Builder::new()
            .name("duckdb-session".into())
            .spawn(move || session_worker_main(path_for_thread, conn, rx))?;
        tracing::info!(path=%path.display(), read_only=options.read_only, "session opened");
        Ok(Self {
            tx: Some(tx),
            worker: Some(worker),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.tx.is_some()
    }

    pub async fn list_tables(&self) -> AppResult<TableList> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionTask::Tables { respond_to: tx })?;
        rx.await.map_err(|_| AppError::SessionClosed)?
    }

    /// Runs `sql` exactly as given and returns every row.
    pub async fn execute_query(&self, sql: String) -> AppResult<QueryResult> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionTask::Query { sql, respond_to: tx })?;
        rx.await.map_err(|_| AppError::SessionClosed)?
    }

    /// Releases the connection and waits for the worker to close it. Requests
    /// already queued still complete first; their callers may have gone away,
    /// in which case the answer is dropped.
    pub fn close(&mut self) {
        if self.tx.take().is_some() {
            tracing::debug!(path=%self.path.display(), "session close requested");
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!(path=%self.path.display(), "session worker panicked");
            }
        }
    }

    fn send(&self, task: SessionTask) -> AppResult<()> {
        let tx = self.tx.as_ref().ok_or(AppError::SessionClosed)?;
        tx.send(task).map_err(|_| AppError::SessionClosed)
    }
}

impl Drop for QuerySession {
    fn drop(&mut self) {
        self.close();
    }
}

enum SessionTask {
    Query {
        sql: String,
        respond_to: oneshot::Sender<AppResult<QueryResult>>,
    },
    Tables {
        respond_to: oneshot::Sender<AppResult<TableList>>,
    },
}

fn session_worker_main(db_path: PathBuf, conn: Connection, rx: mpsc::Receiver<SessionTask>) {
    while let Ok(task) = rx.recv() {
        match task {
            SessionTask::Query { sql, respond_to } => {
                tracing::debug!(sql=%sql, "executing query");
                let res = guarded(|| query::run_query(&conn, &sql));
                match &res {
                    Ok(rows) => tracing::debug!(rows = rows.len(), "query finished"),
                    Err(e) => tracing::debug!(error=%e, "query failed"),
                }
                if respond_to.send(res).is_err() {
                    tracing::debug!("query result discarded; requester gone");
                }
            }
            SessionTask::Tables { respond_to } => {
                let res = guarded(|| schema::list_tables(&conn));
                let _ = respond_to.send(res);
            }
        }
    }

    if let Err((_, e)) = conn.close() {
        tracing::warn!(error=%e, path=%db_path.display(), "error while closing connection");
    }
    tracing::info!(path=%db_path.display(), "session closed");
}

/// The duckdb crate panics on a few value types it cannot read; turn that
/// into a failed request so the worker keeps serving.
fn guarded<T>(f: impl FnOnce() -> AppResult<T>) -> AppResult<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(error=%message, "engine call panicked");
        Err(AppError::Query(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "engine call panicked".to_string()
    }
}

fn open_conn(path: &Path, options: SessionOptions) -> AppResult<Connection> {
    let connection_error = |e: duckdb::Error| AppError::Connection {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut config = Config::default();
    if options.read_only {
        config = config.access_mode(AccessMode::ReadOnly).map_err(connection_error)?;
    }
    Connection::open_with_flags(path, config).map_err(connection_error)
}
