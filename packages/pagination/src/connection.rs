//! Relay connection wire shape
//!
//! `{edges: [{cursor, node}], pageInfo: {...}}`, identical for offset
//! and keyset pages; only the cursor contents differ.

use serde::Serialize;

use crate::cursor;
use crate::error::PaginationResult;

/// Information about the current page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether rows exist after this page
    pub has_next_page: bool,
    /// Whether rows exist before this page
    pub has_previous_page: bool,
    /// Cursor of the first edge, `None` for an empty page
    pub start_cursor: Option<String>,
    /// Cursor of the last edge, `None` for an empty page
    pub end_cursor: Option<String>,
}

/// One node with its pagination cursor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge<T> {
    /// Opaque cursor addressing this node
    pub cursor: String,
    /// The node itself
    pub node: T,
}

/// A paginated result set in the Relay connection shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// The nodes in this page, each with its cursor
    pub edges: Vec<Edge<T>>,
    /// Page boundary information
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Assemble an offset-mode page
    ///
    /// Edge cursors are position cursors numbered from `offset`.
    pub fn from_offset_page(
        nodes: Vec<T>,
        offset: u64,
        has_previous_page: bool,
        has_next_page: bool,
    ) -> Self {
        let edges: Vec<Edge<T>> = nodes
            .into_iter()
            .enumerate()
            .map(|(i, node)| Edge {
                cursor: cursor::encode_position(offset + i as u64),
                node,
            })
            .collect();
        Self::finish(edges, has_previous_page, has_next_page)
    }

    /// Assemble a keyset-mode page
    ///
    /// `cursor_of` derives each node's keyset cursor from its
    /// sort-column values.
    pub fn from_keyset_page(
        nodes: Vec<T>,
        mut cursor_of: impl FnMut(&T) -> PaginationResult<String>,
        has_previous_page: bool,
        has_next_page: bool,
    ) -> PaginationResult<Self> {
        let mut edges = Vec::with_capacity(nodes.len());
        for node in nodes {
            let cursor = cursor_of(&node)?;
            edges.push(Edge { cursor, node });
        }
        Ok(Self::finish(edges, has_previous_page, has_next_page))
    }

    fn finish(edges: Vec<Edge<T>>, has_previous_page: bool, has_next_page: bool) -> Self {
        let page_info = PageInfo {
            has_next_page,
            has_previous_page,
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };
        Self { edges, page_info }
    }

    /// The nodes of this page, in order, without their cursors
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_page_cursors_number_from_offset() {
        let connection = Connection::from_offset_page(vec!["a", "b", "c"], 3, true, true);
        assert_eq!(connection.edges.len(), 3);
        assert_eq!(
            cursor::decode_position(&connection.edges[0].cursor),
            Some(3)
        );
        assert_eq!(
            cursor::decode_position(&connection.edges[2].cursor),
            Some(5)
        );
        assert_eq!(
            connection.page_info.start_cursor,
            Some(connection.edges[0].cursor.clone())
        );
        assert_eq!(
            connection.page_info.end_cursor,
            Some(connection.edges[2].cursor.clone())
        );
    }

    #[test]
    fn test_empty_page_has_no_cursors() {
        let connection = Connection::<&str>::from_offset_page(Vec::new(), 0, false, false);
        assert!(connection.edges.is_empty());
        assert_eq!(connection.page_info.start_cursor, None);
        assert_eq!(connection.page_info.end_cursor, None);
    }

    #[test]
    fn test_single_row_page_start_equals_end() {
        let connection = Connection::from_offset_page(vec!["only"], 0, false, false);
        assert_eq!(
            connection.page_info.start_cursor,
            connection.page_info.end_cursor
        );
    }

    #[test]
    fn test_keyset_page_uses_derived_cursors() {
        let connection = Connection::from_keyset_page(
            vec![1i64, 2, 3],
            |n| cursor::encode_keyset(&[graphloom_core::ScalarValue::Int(*n)]),
            false,
            true,
        )
        .unwrap();
        assert_eq!(
            cursor::decode_keyset(&connection.edges[1].cursor),
            Some(vec![graphloom_core::ScalarValue::Int(2)])
        );
    }

    #[test]
    fn test_wire_shape_serialization() {
        let connection = Connection::from_offset_page(vec!["n"], 0, false, true);
        let json = serde_json::to_value(&connection).unwrap();
        assert!(json["edges"][0]["cursor"].is_string());
        assert_eq!(json["edges"][0]["node"], "n");
        assert_eq!(json["pageInfo"]["hasNextPage"], true);
        assert_eq!(json["pageInfo"]["hasPreviousPage"], false);
    }
}
