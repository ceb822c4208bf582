//! Record ↔ hash-field codec.
//!
//! Converts between typed records and the flat string-keyed field set a
//! hash-oriented store persists per record. Records opt in with
//! `#[derive(HashModel)]`; the derive builds the field table from the struct
//! declaration, and both directions resolve each field's storage metadata
//! through the same resolver.
//!
//! # Design Principles
//!
//! - Pure in-memory transformation: no I/O, no store client
//! - Encode is atomic: the first failing field discards the whole mapping
//! - Decode tolerates missing keys: absent fields keep their current value
//! - Metadata resolution is deterministic and shared by both directions

mod errors;
mod field;
mod tag;
mod value;

pub use errors::{HashError, HashResult, ValueError};
pub use field::{json_from_stored, json_to_stored, FieldCodec, DATETIME_FORMAT};
pub use tag::{camel_to_snake, FieldTag, TAG_SEPARATOR};
pub use value::StoredValue;

use std::collections::HashMap;

/// One entry of a record's field table, derived from the struct declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Declared field identifier.
    pub name: &'static str,
    /// Raw annotation string attached to the declaration.
    pub annotation: &'static str,
    /// Declared type, as written.
    pub type_name: &'static str,
}

impl FieldSpec {
    /// Resolves the storage metadata for this field.
    pub fn tag(&self) -> FieldTag {
        FieldTag::resolve(self.name, self.annotation)
    }
}

/// A record that can be stored as a flat set of hash fields.
///
/// Implemented with `#[derive(HashModel)]` on a struct with named fields.
/// Field annotations use the `#[hash("...")]` attribute: an explicit storage
/// name, or `"-"` to exclude the field from storage.
pub trait HashModel {
    /// The record's field table, in declaration order, ignored fields
    /// included.
    fn fields() -> &'static [FieldSpec]
    where
        Self: Sized;

    /// Converts the record into a storage mapping.
    ///
    /// Walks every field in declaration order, skipping ignored ones.
    /// Absent optional fields map to [`StoredValue::Nil`] so a caller can
    /// tell "no value" apart from an empty string. The first failing field
    /// aborts the call; no partial mapping is returned.
    fn encode(&self) -> HashResult<HashMap<String, StoredValue>>;

    /// Fills the record from stored fields.
    ///
    /// Walks every field in declaration order, skipping ignored ones. A
    /// field whose storage name is missing from `fields` keeps its current
    /// value; that is not an error. The first failing field aborts the call,
    /// and fields assigned before the failure keep their new values.
    fn decode(&mut self, fields: &HashMap<String, String>) -> HashResult<()>;
}

/// Encodes a record into the mapping a hash store persists.
pub fn encode<T: HashModel>(record: &T) -> HashResult<HashMap<String, StoredValue>> {
    record.encode()
}

/// Decodes fields read back from a hash store into a record.
pub fn decode<T: HashModel>(fields: &HashMap<String, String>, record: &mut T) -> HashResult<()> {
    record.decode(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_spec_resolves_through_the_shared_resolver() {
        let spec = FieldSpec {
            name: "RedPacketId",
            annotation: "",
            type_name: "i64",
        };
        assert_eq!(spec.tag().name(), "red_packet_id");
        assert!(!spec.tag().is_ignored());

        let ignored = FieldSpec {
            name: "session_token",
            annotation: "-",
            type_name: "String",
        };
        assert!(ignored.tag().is_ignored());
    }
}
