//! hashmodel - codec between typed records and hash-store field maps
//!
//! A hash-oriented store persists one flat set of string-keyed, loosely-typed
//! fields per record. This crate converts typed Rust records into that shape
//! and back:
//!
//! ```
//! use std::collections::HashMap;
//! use hashmodel::{HashModel, StoredValue};
//!
//! #[derive(Default, HashModel)]
//! struct RedPacket {
//!     red_packet_id: i64,
//!     opened: bool,
//!     #[hash("-")]
//!     session_token: String,
//! }
//!
//! let packet = RedPacket { red_packet_id: 7, opened: true, session_token: "s".into() };
//! let fields = packet.encode().unwrap();
//! assert_eq!(fields["red_packet_id"], StoredValue::Int(7));
//! assert!(!fields.contains_key("session_token"));
//!
//! let mut stored = HashMap::new();
//! stored.insert("opened".to_string(), "1".to_string());
//! let mut back = RedPacket::default();
//! back.decode(&stored).unwrap();
//! assert!(back.opened);
//! ```

// Generated record impls name this crate by `hashmodel::...`; make that path
// resolve inside the crate itself as well.
extern crate self as hashmodel;

pub mod hash;

pub use hash::{
    camel_to_snake, decode, encode, json_from_stored, json_to_stored, FieldCodec, FieldSpec,
    FieldTag, HashError, HashModel, HashResult, StoredValue, ValueError, DATETIME_FORMAT,
    TAG_SEPARATOR,
};
pub use hashmodel_derive::{HashModel, JsonField};
