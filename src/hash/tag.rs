//! Field metadata resolution.
//!
//! Each record field carries an annotation string (attached through the
//! `#[hash("...")]` attribute). The annotation decides the field's storage
//! name and whether the field is stored at all:
//!
//! - `""` (or no attribute): store under the declared name, converted from
//!   medial-capital to lowercase underscore form
//! - `"-"`: never store or read this field
//! - anything else: the first `';'`-separated token is the storage name
//!
//! Tokens after the first separator are reserved for future directives and
//! are currently discarded.

/// Separator between directives inside one annotation.
pub const TAG_SEPARATOR: char = ';';

/// Directive that excludes a field from storage entirely.
const IGNORE_DIRECTIVE: &str = "-";

/// Resolved storage metadata for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    name: String,
    ignored: bool,
}

impl FieldTag {
    /// Resolves the storage name and ignore flag for a field declaration.
    ///
    /// Pure and infallible: every declaration resolves to a tag, and the
    /// result depends only on the inputs, so encode and decode always agree
    /// on the mapping.
    pub fn resolve(field_name: &str, annotation: &str) -> Self {
        let mut tag = Self {
            name: camel_to_snake(field_name),
            ignored: false,
        };

        if annotation.is_empty() {
            return tag;
        }

        // Only the first directive is interpreted.
        let first = annotation.split(TAG_SEPARATOR).next().unwrap_or("");
        if first == IGNORE_DIRECTIVE {
            tag.ignored = true;
            return tag;
        }

        tag.name = first.to_owned();
        tag
    }

    /// The key this field is stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field is excluded from storage.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }
}

/// Converts a medial-capital identifier to lowercase underscore form.
///
/// An underscore is inserted before every uppercase letter except the first
/// character; every letter is lowercased. Identifiers that are already in
/// underscore form pass through unchanged.
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i != 0 && ch.is_uppercase() {
            out.push('_');
        }
        for low in ch.to_lowercase() {
            out.push(low);
        }
    }
    out
}
