/// One result row: column name to scalar, in select-list order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// A fully materialized result set.
pub type QueryResult = Vec<Row>;

pub type TableList = Vec<String>;

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub read_only: bool,
}
