//! Global object identification and cursor pagination
//!
//! The pieces every Relay client depends on:
//! - [`global_id`]: opaque `{typeName, localId}` identifiers
//! - [`node`]: dispatch from a global id to the store that owns the entity
//! - [`connection`]: cursor-paginated views over ordered collections

pub mod connection;
pub mod global_id;
pub mod node;

pub use connection::{
    connection_from_slice, connection_from_vec, Connection, ConnectionArgs, ConnectionError, Edge,
    PageInfo, Window,
};
pub use global_id::{DecodeError, GlobalId};
pub use node::{Node, NodeError, NodeFetcher, NodeKind, NodeRegistry};
