//! Relay connection types
//!
//! Every paginated field returns a `XConnection { edges, pageInfo }` whose
//! edges carry an opaque cursor next to the node.

use async_graphql::SimpleObject;

use crate::relay;

/// Pagination state of one connection page
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "PageInfo")]
pub struct PageInfoType {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl From<relay::PageInfo> for PageInfoType {
    fn from(info: relay::PageInfo) -> Self {
        Self {
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
            start_cursor: info.start_cursor,
            end_cursor: info.end_cursor,
        }
    }
}

/// Declare a connection type and its edge type for one node type
macro_rules! connection_type {
    ($connection:ident, $edge:ident, $node:ty, $model:ty) => {
        #[derive(async_graphql::SimpleObject)]
        pub struct $edge {
            pub cursor: String,
            pub node: $node,
        }

        #[derive(async_graphql::SimpleObject)]
        pub struct $connection {
            pub edges: Vec<$edge>,
            pub page_info: $crate::graphql::types::PageInfoType,
        }

        impl From<$crate::relay::Connection<$model>> for $connection {
            fn from(connection: $crate::relay::Connection<$model>) -> Self {
                Self {
                    edges: connection
                        .edges
                        .into_iter()
                        .map(|edge| $edge {
                            cursor: edge.cursor,
                            node: <$node>::from(edge.node),
                        })
                        .collect(),
                    page_info: connection.page_info.into(),
                }
            }
        }
    };
}

pub(crate) use connection_type;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::{connection_from_vec, ConnectionArgs};

    #[test]
    fn test_page_info_conversion() {
        let connection = connection_from_vec(vec!["a", "b", "c"], &ConnectionArgs::forward(2, None))
            .unwrap();
        let info = PageInfoType::from(connection.page_info);
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);
        assert_eq!(info.start_cursor.as_deref(), Some("YXJyYXljb25uZWN0aW9uOjA="));
        assert_eq!(info.end_cursor.as_deref(), Some("YXJyYXljb25uZWN0aW9uOjE="));
    }
}
