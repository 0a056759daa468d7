//! Relay cursor connections
//!
//! Turns an ordered sequence into a `{ edges, pageInfo }` page following the
//! Relay cursor-connection contract. Cursors encode an item's offset within
//! the canonical ordering of one specific collection; they are meaningless
//! outside the connection that produced them.
//!
//! Slicing order, applied to the full ordering `[0, total_len)`:
//!
//! 1. `after`  drops everything at or before the cursor's offset
//! 2. `before` drops everything at or after the cursor's offset
//! 3. `first`  keeps the first `first` remaining items
//! 4. `last`   keeps the last `last` remaining items (after `first`)
//!
//! A well-formed cursor whose offset lies outside `[0, total_len)` is ignored.
//! `hasPreviousPage`/`hasNextPage` report whether the full ordering holds items
//! before/after the final window.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::global_id::{decode_payload, DecodeError};

/// Prefix of every cursor payload (compatible with graphql-relay array connections)
pub const CURSOR_PREFIX: &str = "arrayconnection:";

/// Errors produced while building a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// `first` or `last` was negative
    #[error("argument '{argument}' must be a non-negative integer, got {value}")]
    InvalidArgument { argument: &'static str, value: i32 },

    /// `after` or `before` could not be decoded
    #[error("invalid cursor for '{argument}': {source}")]
    Decode {
        argument: &'static str,
        #[source]
        source: DecodeError,
    },
}

/// Encode an offset in the canonical ordering as an opaque cursor
pub fn offset_to_cursor(offset: usize) -> String {
    STANDARD.encode(format!("{CURSOR_PREFIX}{offset}"))
}

/// Decode an opaque cursor back into an offset
pub fn cursor_to_offset(cursor: &str) -> Result<usize, DecodeError> {
    let payload = decode_payload(cursor)?;
    payload
        .strip_prefix(CURSOR_PREFIX)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or(DecodeError::InvalidCursor)
}

/// The four standard pagination arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    pub first: Option<i32>,
    pub after: Option<String>,
    pub last: Option<i32>,
    pub before: Option<String>,
}

impl ConnectionArgs {
    pub fn new(
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> Self {
        Self {
            first,
            after,
            last,
            before,
        }
    }

    /// Forward pagination: `first` items after `after`
    pub fn forward(first: i32, after: Option<String>) -> Self {
        Self {
            first: Some(first),
            after,
            ..Self::default()
        }
    }

    /// Backward pagination: `last` items before `before`
    pub fn backward(last: i32, before: Option<String>) -> Self {
        Self {
            last: Some(last),
            before,
            ..Self::default()
        }
    }

    /// Compute which offsets of a collection of `total_len` items the page covers
    ///
    /// Callers backed by a store with a count/slice capability use this to
    /// fetch only the window (`LIMIT window.len() OFFSET window.start`) before
    /// handing the slice to [`connection_from_slice`].
    pub fn window(&self, total_len: usize) -> Result<Window, ConnectionError> {
        let first = non_negative("first", self.first)?;
        let last = non_negative("last", self.last)?;
        let after = decode_cursor("after", self.after.as_deref())?;
        let before = decode_cursor("before", self.before.as_deref())?;

        let mut start = 0;
        let mut end = total_len;

        if let Some(offset) = after.filter(|&o| o < total_len) {
            start = offset + 1;
        }
        if let Some(offset) = before.filter(|&o| o < total_len) {
            end = end.min(offset);
        }
        // `after` at or beyond `before` leaves nothing between them
        end = end.max(start);

        if let Some(first) = first {
            end = end.min(start.saturating_add(first));
        }
        if let Some(last) = last {
            start = start.max(end.saturating_sub(last));
        }

        Ok(Window {
            start,
            end,
            total_len,
        })
    }
}

fn non_negative(
    argument: &'static str,
    value: Option<i32>,
) -> Result<Option<usize>, ConnectionError> {
    match value {
        None => Ok(None),
        Some(v) => usize::try_from(v)
            .map(Some)
            .map_err(|_| ConnectionError::InvalidArgument { argument, value: v }),
    }
}

fn decode_cursor(
    argument: &'static str,
    cursor: Option<&str>,
) -> Result<Option<usize>, ConnectionError> {
    cursor
        .map(|c| cursor_to_offset(c).map_err(|source| ConnectionError::Decode { argument, source }))
        .transpose()
}

/// Half-open range `[start, end)` of offsets selected from a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
    pub total_len: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn has_previous_page(&self) -> bool {
        self.start > 0
    }

    pub fn has_next_page(&self) -> bool {
        self.end < self.total_len
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// One item of a connection with its cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

/// Pagination metadata of a connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// A page of an ordered collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    /// Convert every node while keeping cursors and page info
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Connection<U> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .map(|edge| Edge {
                    cursor: edge.cursor,
                    node: f(edge.node),
                })
                .collect(),
            page_info: self.page_info,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

/// Build a connection over a fully materialised ordered sequence
pub fn connection_from_vec<T>(
    items: Vec<T>,
    args: &ConnectionArgs,
) -> Result<Connection<T>, ConnectionError> {
    let total_len = items.len();
    connection_from_slice(items, 0, total_len, args)
}

/// Build a connection from a slice of a larger ordered collection
///
/// `slice` holds the items at offsets `[slice_start, slice_start + slice.len())`
/// of a collection with `total_len` items. Cursors always encode offsets in
/// the full collection.
pub fn connection_from_slice<T>(
    slice: Vec<T>,
    slice_start: usize,
    total_len: usize,
    args: &ConnectionArgs,
) -> Result<Connection<T>, ConnectionError> {
    let window = args.window(total_len)?;

    let edges: Vec<Edge<T>> = slice
        .into_iter()
        .enumerate()
        .map(|(i, node)| (slice_start + i, node))
        .filter(|(offset, _)| window.contains(*offset))
        .map(|(offset, node)| Edge {
            cursor: offset_to_cursor(offset),
            node,
        })
        .collect();

    let page_info = PageInfo {
        start_cursor: edges.first().map(|edge| edge.cursor.clone()),
        end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        has_next_page: window.has_next_page(),
        has_previous_page: window.has_previous_page(),
    };

    Ok(Connection { edges, page_info })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn letters() -> Vec<char> {
        vec!['a', 'b', 'c', 'd', 'e']
    }

    fn nodes(connection: &Connection<char>) -> Vec<char> {
        connection.nodes().copied().collect()
    }

    #[test]
    fn test_cursor_format() {
        // base64("arrayconnection:0")
        assert_eq!(offset_to_cursor(0), "YXJyYXljb25uZWN0aW9uOjA=");
        assert_eq!(cursor_to_offset("YXJyYXljb25uZWN0aW9uOjA="), Ok(0));
        assert_eq!(cursor_to_offset(&offset_to_cursor(42)), Ok(42));
    }

    #[rstest]
    #[case::garbage("%%%".to_string())]
    #[case::wrong_prefix(STANDARD.encode("offset:1"))]
    #[case::no_digits(STANDARD.encode("arrayconnection:"))]
    #[case::negative(STANDARD.encode("arrayconnection:-1"))]
    #[case::global_id(STANDARD.encode("User:1"))]
    fn test_cursor_rejects_malformed(#[case] cursor: String) {
        assert!(cursor_to_offset(&cursor).is_err());
    }

    #[test]
    fn test_no_arguments_returns_everything() {
        let connection = connection_from_vec(letters(), &ConnectionArgs::default()).unwrap();
        assert_eq!(nodes(&connection), letters());
        assert!(!connection.page_info.has_next_page);
        assert!(!connection.page_info.has_previous_page);
        assert_eq!(connection.page_info.start_cursor, Some(offset_to_cursor(0)));
        assert_eq!(connection.page_info.end_cursor, Some(offset_to_cursor(4)));
    }

    #[test]
    fn test_forward_paging_scenario() {
        let page1 = connection_from_vec(letters(), &ConnectionArgs::forward(2, None)).unwrap();
        assert_eq!(nodes(&page1), vec!['a', 'b']);
        assert!(page1.page_info.has_next_page);
        assert!(!page1.page_info.has_previous_page);

        let page2 = connection_from_vec(
            letters(),
            &ConnectionArgs::forward(2, page1.page_info.end_cursor.clone()),
        )
        .unwrap();
        assert_eq!(nodes(&page2), vec!['c', 'd']);
        assert!(page2.page_info.has_next_page);
        assert!(page2.page_info.has_previous_page);

        let page3 = connection_from_vec(
            letters(),
            &ConnectionArgs::forward(2, page2.page_info.end_cursor.clone()),
        )
        .unwrap();
        assert_eq!(nodes(&page3), vec!['e']);
        assert!(!page3.page_info.has_next_page);
    }

    #[test]
    fn test_backward_paging() {
        let page = connection_from_vec(letters(), &ConnectionArgs::backward(2, None)).unwrap();
        assert_eq!(nodes(&page), vec!['d', 'e']);
        assert!(page.page_info.has_previous_page);
        assert!(!page.page_info.has_next_page);

        let previous = connection_from_vec(
            letters(),
            &ConnectionArgs::backward(2, page.page_info.start_cursor.clone()),
        )
        .unwrap();
        assert_eq!(nodes(&previous), vec!['b', 'c']);
        assert!(previous.page_info.has_previous_page);
        assert!(previous.page_info.has_next_page);
    }

    #[rstest]
    #[case(0, 5)]
    #[case(3, 5)]
    #[case(5, 5)]
    #[case(9, 5)]
    #[case(2, 0)]
    fn test_first_k_properties(#[case] k: i32, #[case] n: usize) {
        let items: Vec<usize> = (0..n).collect();
        let connection = connection_from_vec(items, &ConnectionArgs::forward(k, None)).unwrap();
        let expected = (k as usize).min(n);
        assert_eq!(connection.edges.len(), expected);
        let positions: Vec<usize> = connection.nodes().copied().collect();
        assert_eq!(positions, (0..expected).collect::<Vec<_>>());
        assert_eq!(connection.page_info.has_next_page, (k as usize) < n);
        assert!(!connection.page_info.has_previous_page);
    }

    #[rstest]
    #[case(0, 2)]
    #[case(1, 2)]
    #[case(2, 10)]
    #[case(4, 1)]
    fn test_after_j_first_k_properties(#[case] j: usize, #[case] k: i32) {
        let n = 5;
        let items: Vec<usize> = (0..n).collect();
        let args = ConnectionArgs::forward(k, Some(offset_to_cursor(j)));
        let connection = connection_from_vec(items, &args).unwrap();
        let expected_len = (k as usize).min(n - j - 1);
        assert_eq!(connection.edges.len(), expected_len);
        if let Some(first) = connection.nodes().next() {
            assert_eq!(*first, j + 1);
        };
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(5)]
    #[case(8)]
    fn test_last_k_properties(#[case] k: i32) {
        let connection = connection_from_vec(letters(), &ConnectionArgs::backward(k, None)).unwrap();
        let expected = (k as usize).min(5);
        assert_eq!(nodes(&connection), letters()[5 - expected..].to_vec());
        assert_eq!(connection.page_info.has_previous_page, (k as usize) < 5);
        assert!(!connection.page_info.has_next_page);
    }

    #[test]
    fn test_first_then_last_applies_last_to_first_window() {
        let args = ConnectionArgs::new(Some(4), None, Some(2), None);
        let connection = connection_from_vec(letters(), &args).unwrap();
        assert_eq!(nodes(&connection), vec!['c', 'd']);
        assert!(connection.page_info.has_previous_page);
        assert!(connection.page_info.has_next_page);
    }

    #[test]
    fn test_after_and_before_bound_the_window() {
        let args = ConnectionArgs::new(
            None,
            Some(offset_to_cursor(0)),
            None,
            Some(offset_to_cursor(4)),
        );
        let connection = connection_from_vec(letters(), &args).unwrap();
        assert_eq!(nodes(&connection), vec!['b', 'c', 'd']);
        assert!(connection.page_info.has_previous_page);
        assert!(connection.page_info.has_next_page);
    }

    #[test]
    fn test_crossed_cursors_yield_empty_page() {
        let args = ConnectionArgs::new(
            None,
            Some(offset_to_cursor(3)),
            None,
            Some(offset_to_cursor(1)),
        );
        let connection = connection_from_vec(letters(), &args).unwrap();
        assert!(connection.edges.is_empty());
        assert_eq!(connection.page_info.start_cursor, None);
        assert_eq!(connection.page_info.end_cursor, None);
    }

    #[test]
    fn test_out_of_range_cursors_are_ignored() {
        let args = ConnectionArgs::new(
            Some(2),
            Some(offset_to_cursor(99)),
            None,
            Some(offset_to_cursor(50)),
        );
        let connection = connection_from_vec(letters(), &args).unwrap();
        assert_eq!(nodes(&connection), vec!['a', 'b']);
    }

    #[test]
    fn test_after_last_item_is_empty() {
        let args = ConnectionArgs::forward(2, Some(offset_to_cursor(4)));
        let connection = connection_from_vec(letters(), &args).unwrap();
        assert!(connection.edges.is_empty());
        assert!(!connection.page_info.has_next_page);
        assert!(connection.page_info.has_previous_page);
    }

    #[test]
    fn test_negative_first_is_invalid() {
        let result = connection_from_vec(letters(), &ConnectionArgs::forward(-1, None));
        assert_matches!(
            result,
            Err(ConnectionError::InvalidArgument { argument: "first", value: -1 })
        );
    }

    #[test]
    fn test_negative_last_is_invalid() {
        let result = connection_from_vec(letters(), &ConnectionArgs::backward(-3, None));
        assert_matches!(
            result,
            Err(ConnectionError::InvalidArgument { argument: "last", value: -3 })
        );
    }

    #[test]
    fn test_malformed_cursor_is_decode_error() {
        let args = ConnectionArgs::forward(2, Some("not-a-cursor".to_string()));
        let result = connection_from_vec(letters(), &args);
        assert_matches!(result, Err(ConnectionError::Decode { argument: "after", .. }));
    }

    #[test]
    fn test_cursors_are_unique_and_idempotent() {
        let args = ConnectionArgs::default();
        let first = connection_from_vec(letters(), &args).unwrap();
        let second = connection_from_vec(letters(), &args).unwrap();
        assert_eq!(first, second);

        let mut cursors: Vec<_> = first.edges.iter().map(|e| e.cursor.clone()).collect();
        cursors.sort();
        cursors.dedup();
        assert_eq!(cursors.len(), first.edges.len());
    }

    #[test]
    fn test_slice_uses_absolute_offsets() {
        // Items at offsets 2..5 of a 10 item collection
        let args = ConnectionArgs::forward(2, Some(offset_to_cursor(2)));
        let window = args.window(10).unwrap();
        assert_eq!((window.start, window.end), (3, 5));

        let slice = vec!['d', 'e'];
        let connection = connection_from_slice(slice, window.start, 10, &args).unwrap();
        assert_eq!(nodes(&connection), vec!['d', 'e']);
        assert_eq!(connection.page_info.start_cursor, Some(offset_to_cursor(3)));
        assert_eq!(connection.page_info.end_cursor, Some(offset_to_cursor(4)));
        assert!(connection.page_info.has_next_page);
        assert!(connection.page_info.has_previous_page);
    }

    #[test]
    fn test_slice_drops_items_outside_window() {
        let args = ConnectionArgs::forward(1, None);
        let connection = connection_from_slice(vec!['a', 'b', 'c'], 0, 3, &args).unwrap();
        assert_eq!(nodes(&connection), vec!['a']);
        assert!(connection.page_info.has_next_page);
    }

    #[test]
    fn test_map_preserves_cursors() {
        let connection = connection_from_vec(letters(), &ConnectionArgs::forward(2, None))
            .unwrap()
            .map(|c| c.to_ascii_uppercase());
        assert_eq!(nodes(&connection), vec!['A', 'B']);
        assert_eq!(connection.edges[1].cursor, offset_to_cursor(1));
    }
}
