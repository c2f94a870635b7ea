//! Client-side presentation state for query results.
//!
//! `ResultView` never talks to the session directly. User actions return the
//! [`ViewRequest`] to send (if any) and inbound [`HostMessage`]s are fed to
//! [`ResultView::handle_message`]. Each call runs to completion before the
//! next one, so there is no interleaving inside a transition.
//!
//! Failed queries keep the rows of the last successful query on display. The
//! submit that preceded the failure has already reset the page to 1 and
//! cleared column widths.

use crate::{
    core::types::{QueryResult, Row},
    error::{AppError, AppResult},
    protocol::{HostMessage, ViewRequest},
    view::{
        columns::{ColumnResize, ColumnWidths},
        pagination::{PageSize, Pagination},
        tables::{select_all_from, TablesPanel},
    },
};

pub const EMPTY_QUERY_MESSAGE: &str = "Enter a SQL query.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPhase {
    Idle,
    Loading,
    Displaying,
    Error(ViewError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    Validation(String),
    Query(String),
    Connection(String),
}

impl ViewError {
    pub fn message(&self) -> &str {
        match self {
            ViewError::Validation(m) | ViewError::Query(m) | ViewError::Connection(m) => m,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView<'a> {
    pub name: &'a str,
    pub width: u32,
}

/// Everything needed to draw the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub columns: Vec<ColumnView<'a>>,
    pub rows: &'a [Row],
    pub row_width: u32,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub page_size: usize,
    pub record_info: String,
    pub page_info: String,
    pub can_previous: bool,
    pub can_next: bool,
}

#[derive(Debug, Clone)]
pub struct ResultView {
    phase: ViewPhase,
    query_input: String,
    rows: QueryResult,
    columns: Vec<String>,
    pagination: Pagination,
    widths: ColumnWidths,
    tables: TablesPanel,
    disconnected: bool,
}

impl Default for ResultView {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ResultView {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            phase: ViewPhase::Idle,
            query_input: String::new(),
            rows: Vec::new(),
            columns: Vec::new(),
            pagination: Pagination::new(0, page_size),
            widths: ColumnWidths::default(),
            tables: TablesPanel::Idle,
            disconnected: false,
        }
    }

    pub fn phase(&self) -> &ViewPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ViewPhase::Loading
    }

    /// Whether the submit control is live.
    pub fn can_submit(&self) -> bool {
        !self.disconnected && !self.is_loading()
    }

    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    pub fn set_query_input(&mut self, text: impl Into<String>) {
        self.query_input = text.into();
    }

    pub fn tables(&self) -> &TablesPanel {
        &self.tables
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    pub fn page_size(&self) -> PageSize {
        self.pagination.size()
    }

    pub fn column_width(&self, column: &str) -> u32 {
        self.widths.width(column)
    }

    /// Submits the text in the query input.
    ///
    /// Blank input never leaves the view: it becomes a validation error and
    /// no request is produced.
    pub fn submit(&mut self) -> AppResult<ViewRequest> {
        if self.disconnected {
            return Err(AppError::SessionClosed);
        }
        if self.is_loading() {
            return Err(AppError::QueryInFlight);
        }

        let sql = self.query_input.trim();
        if sql.is_empty() {
            self.phase = ViewPhase::Error(ViewError::Validation(EMPTY_QUERY_MESSAGE.into()));
            return Err(AppError::Validation(EMPTY_QUERY_MESSAGE.into()));
        }
        let sql = sql.to_string();

        self.pagination.reset(self.rows.len());
        self.widths.clear();
        self.phase = ViewPhase::Loading;
        tracing::debug!(sql=%sql, "query submitted");
        Ok(ViewRequest::Query { sql })
    }

    pub fn submit_query(&mut self, text: impl Into<String>) -> AppResult<ViewRequest> {
        self.set_query_input(text);
        self.submit()
    }

    pub fn refresh_tables(&mut self) -> AppResult<ViewRequest> {
        if self.disconnected {
            return Err(AppError::SessionClosed);
        }
        if self.tables.is_loading() {
            return Err(AppError::QueryInFlight);
        }
        self.tables = TablesPanel::Loading;
        Ok(ViewRequest::ListTables)
    }

    /// Fills the query input from the table list. Nothing is sent.
    pub fn select_table(&mut self, table: &str) {
        self.query_input = select_all_from(table);
    }

    /// Applies one inbound message and returns the follow-up request, if any.
    pub fn handle_message(&mut self, msg: HostMessage) -> Option<ViewRequest> {
        match msg {
            HostMessage::Update { db_path } => {
                tracing::debug!(db_path=%db_path, "session ready");
                match self.refresh_tables() {
                    Ok(req) => Some(req),
                    Err(e) => {
                        tracing::debug!(error=%e, "table refresh skipped");
                        None
                    }
                }
            }
            HostMessage::QueryResult { results } => {
                if !self.is_loading() {
                    tracing::debug!(rows = results.len(), "discarding unexpected query result");
                    return None;
                }
                self.columns = results
                    .first()
                    .map(|r| r.keys().cloned().collect())
                    .unwrap_or_default();
                self.pagination.reset(results.len());
                self.rows = results;
                self.phase = ViewPhase::Displaying;
                None
            }
            HostMessage::QueryError { error } => {
                if !self.is_loading() {
                    tracing::debug!(error=%error, "discarding unexpected query error");
                    return None;
                }
                self.phase = ViewPhase::Error(ViewError::Query(error));
                None
            }
            HostMessage::TablesResult { tables } => {
                if !self.tables.is_loading() {
                    tracing::debug!("discarding unexpected table list");
                    return None;
                }
                self.tables = TablesPanel::Loaded(tables);
                None
            }
            HostMessage::TablesError { error } => {
                if !self.tables.is_loading() {
                    tracing::debug!(error=%error, "discarding unexpected table error");
                    return None;
                }
                self.tables = TablesPanel::Error(error);
                None
            }
            HostMessage::ConnectionError { error } => {
                self.disconnected = true;
                if self.tables.is_loading() {
                    self.tables = TablesPanel::Error(error.clone());
                }
                self.phase = ViewPhase::Error(ViewError::Connection(error));
                None
            }
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.pagination.next()
    }

    pub fn previous_page(&mut self) -> bool {
        self.pagination.previous()
    }

    /// Re-slices the held rows; column widths are kept.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.pagination.set_size(size);
    }

    pub fn begin_resize(&mut self, column: &str, pointer_x: i32) {
        if self.columns.iter().any(|c| c == column) {
            self.widths.begin_drag(column, pointer_x);
        }
    }

    pub fn resize_to(&mut self, pointer_x: i32) -> Option<ColumnResize> {
        let columns = self.columns.iter().map(String::as_str);
        self.widths.drag_to(pointer_x, columns)
    }

    pub fn end_resize(&mut self) {
        self.widths.end_drag();
    }

    /// Empties the input and the held result. An outstanding query still
    /// lands when it answers.
    pub fn clear(&mut self) {
        self.query_input.clear();
        self.rows.clear();
        self.columns.clear();
        self.pagination.reset(0);
        if !self.is_loading() && !self.disconnected {
            self.phase = ViewPhase::Idle;
        }
    }

    pub fn page(&self) -> PageView<'_> {
        let columns = self
            .columns
            .iter()
            .map(|c| ColumnView {
                name: c.as_str(),
                width: self.widths.width(c),
            })
            .collect();
        PageView {
            columns,
            rows: &self.rows[self.pagination.range()],
            row_width: self.widths.row_width(self.columns.iter().map(String::as_str)),
            current_page: self.pagination.current(),
            total_pages: self.pagination.total_pages(),
            total_records: self.pagination.total(),
            page_size: self.page_size().get(),
            record_info: self.pagination.record_info(),
            page_info: self.pagination.page_info(),
            can_previous: self.pagination.has_previous(),
            can_next: self.pagination.has_next(),
        }
    }
}
