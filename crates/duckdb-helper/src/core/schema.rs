use duckdb::Connection;

use crate::core::types::TableList;
use crate::error::AppResult;

pub fn list_tables(conn: &Connection) -> AppResult<TableList> {
    let mut stmt = conn.prepare("SHOW TABLES")?;
    let rows = stmt
        .query_map([], |r| r.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn is_safe_identifier(s: &str) -> bool {
    // [A-Za-z_][A-Za-z0-9_]*
    let mut chars = s.chars();
    let Some(first) = chars.next() else { return false };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Plain identifiers pass through; anything else is double-quoted.
pub(crate) fn quote_identifier(name: &str) -> String {
    if is_safe_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_tables_from_catalog() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE beta (id INTEGER); CREATE TABLE alpha (id INTEGER);")
            .unwrap();
        assert_eq!(list_tables(&conn).unwrap(), vec!["alpha", "beta"]);
    }

    #[test]
    fn empty_database_has_no_tables() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(list_tables(&conn).unwrap().is_empty());
    }

    #[test]
    fn quotes_only_when_needed() {
        assert_eq!(quote_identifier("orders"), "orders");
        assert_eq!(quote_identifier("_t1"), "_t1");
        assert_eq!(quote_identifier("my table"), "\"my table\"");
        assert_eq!(quote_identifier("1st"), "\"1st\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
