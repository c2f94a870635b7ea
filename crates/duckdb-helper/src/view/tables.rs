use crate::core::{schema::quote_identifier, types::TableList};

/// The table-list panel. Runs its own request cycle, independent of query
/// pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TablesPanel {
    #[default]
    Idle,
    Loading,
    Loaded(TableList),
    Error(String),
}

impl TablesPanel {
    pub fn is_loading(&self) -> bool {
        matches!(self, TablesPanel::Loading)
    }

    pub fn tables(&self) -> &[String] {
        match self {
            TablesPanel::Loaded(t) => t,
            _ => &[],
        }
    }
}

/// The statement placed in the query input when a table is picked.
pub fn select_all_from(table: &str) -> String {
    format!("SELECT * FROM {};", quote_identifier(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_select_statement() {
        assert_eq!(select_all_from("orders"), "SELECT * FROM orders;");
        assert_eq!(select_all_from("order items"), "SELECT * FROM \"order items\";");
    }

    #[test]
    fn only_loaded_panel_exposes_tables() {
        assert!(TablesPanel::Loading.tables().is_empty());
        let p = TablesPanel::Loaded(vec!["a".into()]);
        assert_eq!(p.tables(), ["a".to_string()]);
    }
}
