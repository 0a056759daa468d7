//! Opaque global object identifiers
//!
//! Every node in the graph is addressed by a single string that encodes the
//! node's type name and its store-local id: standard base64 of
//! `"{type_name}:{local_id}"`. Clients treat the value as opaque; the server
//! decodes it to decide which store to ask.
//!
//! Local ids must not contain [`SEPARATOR`]. Store ids in this service are
//! UUIDs, which satisfy that precondition.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Separator between the type name and the local id inside the encoded payload
pub const SEPARATOR: char = ':';

/// Failure to decode a client-supplied identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Input is not valid base64
    #[error("identifier is not valid base64")]
    InvalidBase64,

    /// Decoded bytes are not UTF-8
    #[error("identifier payload is not valid UTF-8")]
    InvalidUtf8,

    /// Payload does not contain exactly one separator
    #[error("identifier payload must contain exactly one '{SEPARATOR}'")]
    InvalidShape,

    /// Type name or local id is empty
    #[error("identifier payload has an empty segment")]
    EmptySegment,

    /// Cursor payload is not a non-negative offset
    #[error("cursor does not encode a valid offset")]
    InvalidCursor,
}

/// A decoded global id: which type, and which entity of that type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlobalId {
    type_name: String,
    local_id: String,
}

impl GlobalId {
    /// Build a global id from its parts
    pub fn new(type_name: impl Into<String>, local_id: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            local_id: local_id.into(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// Encode into the opaque client-facing form
    pub fn encode(&self) -> String {
        encode(&self.type_name, &self.local_id)
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Encode a `(type_name, local_id)` pair into an opaque global id
pub fn encode(type_name: &str, local_id: &str) -> String {
    STANDARD.encode(format!("{type_name}{SEPARATOR}{local_id}"))
}

/// Decode an opaque global id
///
/// Untrusted input is expected here; every failure is reported as a
/// [`DecodeError`].
pub fn decode(global_id: &str) -> Result<GlobalId, DecodeError> {
    let payload = decode_payload(global_id)?;

    let mut parts = payload.split(SEPARATOR);
    let (Some(type_name), Some(local_id), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(DecodeError::InvalidShape);
    };

    if type_name.is_empty() || local_id.is_empty() {
        return Err(DecodeError::EmptySegment);
    }

    Ok(GlobalId::new(type_name, local_id))
}

/// Base64-decode an opaque value into its UTF-8 payload
pub(crate) fn decode_payload(value: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD
        .decode(value.as_bytes())
        .map_err(|_| DecodeError::InvalidBase64)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}
