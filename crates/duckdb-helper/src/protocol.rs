use serde::{Deserialize, Serialize};

use crate::core::types::{QueryResult, TableList};

/// Messages from the view to the session host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewRequest {
    Query { sql: String },
    #[serde(alias = "getTables")]
    ListTables,
}

/// Messages from the session host to the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Sent once when the session is ready; the view answers with `ListTables`.
    Update {
        #[serde(rename = "dbPath")]
        db_path: String,
    },
    QueryResult { results: QueryResult },
    QueryError { error: String },
    TablesResult { tables: TableList },
    TablesError { error: String },
    ConnectionError { error: String },
}
