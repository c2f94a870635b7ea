use std::path::Path;

use crate::{
    core::{session::QuerySession, types::SessionOptions},
    error::AppResult,
    protocol::{HostMessage, ViewRequest},
};

/// Owns the session for one open document and answers view requests.
pub struct SessionHost {
    session: QuerySession,
}

impl SessionHost {
    pub fn open(path: &Path, options: SessionOptions) -> AppResult<Self> {
        let session = QuerySession::open(path, options)?;
        Ok(Self { session })
    }

    /// The one-time `update` telling the view it may ask for tables.
    pub fn ready_message(&self) -> HostMessage {
        HostMessage::Update {
            db_path: self.session.path().display().to_string(),
        }
    }

    pub async fn handle(&mut self, req: ViewRequest) -> HostMessage {
        match req {
            ViewRequest::Query { sql } => match self.session.execute_query(sql).await {
                Ok(results) => HostMessage::QueryResult { results },
                Err(e) => {
                    tracing::info!(code = e.code(), error=%e, "query failed");
                    HostMessage::QueryError { error: e.to_string() }
                }
            },
            ViewRequest::ListTables => match self.session.list_tables().await {
                Ok(tables) => HostMessage::TablesResult { tables },
                Err(e) => {
                    tracing::warn!(code = e.code(), error=%e, "listing tables failed");
                    HostMessage::TablesError { error: e.to_string() }
                }
            },
        }
    }

    pub fn close(&mut self) {
        self.session.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host(dir: &tempfile::TempDir) -> SessionHost {
        let path = dir.path().join("host.duckdb");
        let conn = duckdb::Connection::open(&path).unwrap();
        conn.execute_batch("CREATE TABLE a (x INTEGER); CREATE TABLE b (y VARCHAR); INSERT INTO a VALUES (7);")
            .unwrap();
        drop(conn);
        SessionHost::open(&path, SessionOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn answers_table_listing() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = host(&dir);
        let msg = h.handle(ViewRequest::ListTables).await;
        assert_eq!(msg, HostMessage::TablesResult { tables: vec!["a".into(), "b".into()] });
    }

    #[tokio::test]
    async fn answers_query_and_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = host(&dir);

        match h.handle(ViewRequest::Query { sql: "SELECT x FROM a".into() }).await {
            HostMessage::QueryResult { results } => assert_eq!(results[0]["x"], json!(7)),
            other => panic!("unexpected {other:?}"),
        }

        match h.handle(ViewRequest::Query { sql: "SELEC 1".into() }).await {
            HostMessage::QueryError { error } => assert!(error.contains("SELEC"), "{error}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_session_answers_with_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = host(&dir);
        h.close();
        h.close();
        assert!(matches!(
            h.handle(ViewRequest::ListTables).await,
            HostMessage::TablesError { .. }
        ));
    }

    #[test]
    fn ready_message_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let h = host(&dir);
        match h.ready_message() {
            HostMessage::Update { db_path } => assert!(db_path.ends_with("host.duckdb")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
