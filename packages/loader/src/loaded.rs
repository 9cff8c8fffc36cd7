//! Resolved load results
//!
//! A to-one load resolves to an optional row; a to-many load resolves to
//! a [`Page`]: the key's rows in backend order plus the page-boundary
//! flags of the batch it came from. Pages convert into the Relay
//! connection wire shape on demand.

use graphloom_core::Row;
use graphloom_pagination::{cursor, Connection, Edge, PageInfo};

use crate::error::{LoadError, LoadResult};

/// The resolved result of one `load()` call
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// To-one result: the row, or `None` when no row matched
    ///
    /// A missing to-one match is not an error at this layer; the caller
    /// decides null-vs-error semantics.
    One(Option<Row>),
    /// To-many result: the key's page of rows
    Many(Page),
}

impl Loaded {
    /// The to-one row, if this is a to-one result
    pub fn into_one(self) -> Option<Row> {
        match self {
            Loaded::One(row) => row,
            Loaded::Many(_) => None,
        }
    }

    /// The rows of this result, regardless of cardinality
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Loaded::One(row) => row.into_iter().collect(),
            Loaded::Many(page) => page.rows,
        }
    }
}

/// How edge cursors are derived for a page
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CursorStyle {
    /// Position cursors numbered from the page's window offset
    Position { base: u64 },
    /// Keyset cursors built from each row's sort-column values
    Keyset { columns: Vec<String> },
}

/// One parent key's slice of a paginated batch
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub(crate) rows: Vec<Row>,
    pub(crate) style: CursorStyle,
    pub(crate) has_previous_page: bool,
    pub(crate) has_next_page: bool,
}

impl Page {
    /// An empty page with no neighbors
    pub(crate) fn empty() -> Self {
        Self {
            rows: Vec::new(),
            style: CursorStyle::Position { base: 0 },
            has_previous_page: false,
            has_next_page: false,
        }
    }

    /// The rows of this page, in backend order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Whether rows exist after this page
    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Whether rows exist before this page
    pub fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    /// Assemble this page into the Relay connection shape
    ///
    /// The shape is identical for offset and keyset pages; only the
    /// cursor contents differ.
    pub fn connection(&self) -> LoadResult<Connection<Row>> {
        let edges = match &self.style {
            CursorStyle::Position { base } => {
                return Ok(Connection::from_offset_page(
                    self.rows.clone(),
                    *base,
                    self.has_previous_page,
                    self.has_next_page,
                ))
            }
            CursorStyle::Keyset { columns } => {
                let mut edges = Vec::with_capacity(self.rows.len());
                for row in &self.rows {
                    let mut tuple = Vec::with_capacity(columns.len());
                    for column in columns {
                        let value =
                            row.get(column)
                                .ok_or_else(|| LoadError::MissingSortColumn {
                                    column: column.clone(),
                                })?;
                        tuple.push(value.clone());
                    }
                    edges.push(Edge {
                        cursor: cursor::encode_keyset(&tuple).map_err(LoadError::Pagination)?,
                        node: row.clone(),
                    });
                }
                edges
            }
        };

        let page_info = PageInfo {
            has_next_page: self.has_next_page,
            has_previous_page: self.has_previous_page,
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };
        Ok(Connection { edges, page_info })
    }
}
