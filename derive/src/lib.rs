//! Derive macros for `hashmodel`:
//!
//! - [`HashModel`]: implements the record ↔ hash-field codec for a struct
//! - [`JsonField`]: implements the single-field conversion for a composite
//!   type, carried as JSON text

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, Data, DeriveInput, Error, Fields, FieldsNamed, LitStr, Result,
};

static HASH_ATTRIBUTE_NAME: &str = "hash";

/// Mirror of the runtime resolver's reserved separator. The derive only needs
/// it to spot the ignore directive; name resolution stays in the runtime
/// resolver so both directions share one implementation.
const TAG_SEPARATOR: char = ';';
const IGNORE_DIRECTIVE: &str = "-";

/// # Record Codec Derivation
///
/// `#[derive(HashModel)]` implements `hashmodel::HashModel` for a struct with
/// named fields: the field table plus `encode`/`decode`.
///
/// Per-field annotations use the `#[hash("...")]` attribute, a single literal
/// string:
///
/// ```rust, ignore
/// #[derive(HashModel)]
/// struct User {
///     id: i64,                  // stored under "id"
///     #[hash("user_info")]
///     info: Option<UserInfo>,   // stored under "user_info"
///     #[hash("-")]
///     session: RawSession,      // never stored, type needs no codec
/// }
/// ```
///
/// Only the first `';'`-separated token of the annotation is interpreted;
/// later tokens are reserved. Fields annotated `"-"` are skipped entirely, so
/// their types need no `FieldCodec` implementation. Every other field's type
/// must implement `hashmodel::FieldCodec`.
///
/// Generic structs, tuple structs, and enums are rejected.
#[proc_macro_derive(HashModel, attributes(hash))]
pub fn derive_hash_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_hash_model(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// # Composite Field Derivation
///
/// `#[derive(JsonField)]` implements `hashmodel::FieldCodec` for a composite
/// type by carrying it as JSON text inside one hash field. The type must
/// implement serde's `Serialize` and `Deserialize`.
///
/// ```rust, ignore
/// #[derive(Serialize, Deserialize, JsonField)]
/// struct UserInfo {
///     id: i64,
///     name: String,
/// }
/// ```
#[proc_macro_derive(JsonField)]
pub fn derive_json_field(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_json_field(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// One parsed record field: identifier, annotation, declared type.
struct RecordField {
    ident: syn::Ident,
    name: String,
    annotation: String,
    type_name: String,
}

impl RecordField {
    /// Whether the annotation's first directive excludes this field. The
    /// decision is made at expansion time so an ignored field's type needs no
    /// conversion capability; non-ignored fields still resolve their tag at
    /// runtime.
    fn is_ignored(&self) -> bool {
        self.annotation.split(TAG_SEPARATOR).next() == Some(IGNORE_DIRECTIVE)
    }
}

fn expand_hash_model(input: &DeriveInput) -> Result<TokenStream2> {
    ensure_no_generics(input, "HashModel")?;

    let fields = named_fields(input)?;
    let parsed = fields
        .named
        .iter()
        .map(parse_record_field)
        .collect::<Result<Vec<_>>>()?;

    let ident = &input.ident;

    let specs = parsed.iter().map(|f| {
        let (name, annotation, type_name) = (&f.name, &f.annotation, &f.type_name);
        quote! {
            hashmodel::FieldSpec {
                name: #name,
                annotation: #annotation,
                type_name: #type_name,
            }
        }
    });

    let encode_fields = parsed.iter().filter(|f| !f.is_ignored()).map(|f| {
        let field_ident = &f.ident;
        let (name, annotation, type_name) = (&f.name, &f.annotation, &f.type_name);
        quote! {
            {
                let tag = hashmodel::FieldTag::resolve(#name, #annotation);
                if !tag.is_ignored() {
                    let value = hashmodel::FieldCodec::to_stored(&self.#field_ident)
                        .map_err(|err| err.for_field(#name, #type_name))?;
                    out.insert(tag.name().to_owned(), value);
                }
            }
        }
    });

    let decode_fields = parsed.iter().filter(|f| !f.is_ignored()).map(|f| {
        let field_ident = &f.ident;
        let (name, annotation, type_name) = (&f.name, &f.annotation, &f.type_name);
        quote! {
            {
                let tag = hashmodel::FieldTag::resolve(#name, #annotation);
                if !tag.is_ignored() {
                    if let ::core::option::Option::Some(raw) = fields.get(tag.name()) {
                        self.#field_ident = hashmodel::FieldCodec::from_stored(raw)
                            .map_err(|err| err.for_field(#name, #type_name))?;
                    }
                }
            }
        }
    });

    Ok(quote! {
        impl hashmodel::HashModel for #ident {
            fn fields() -> &'static [hashmodel::FieldSpec] {
                &[#(#specs),*]
            }

            fn encode(
                &self,
            ) -> hashmodel::HashResult<
                ::std::collections::HashMap<::std::string::String, hashmodel::StoredValue>,
            > {
                let mut out = ::std::collections::HashMap::new();
                #(#encode_fields)*
                ::core::result::Result::Ok(out)
            }

            fn decode(
                &mut self,
                fields: &::std::collections::HashMap<::std::string::String, ::std::string::String>,
            ) -> hashmodel::HashResult<()> {
                #(#decode_fields)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

fn expand_json_field(input: &DeriveInput) -> Result<TokenStream2> {
    ensure_no_generics(input, "JsonField")?;

    let ident = &input.ident;
    Ok(quote! {
        impl hashmodel::FieldCodec for #ident {
            fn to_stored(
                &self,
            ) -> ::core::result::Result<hashmodel::StoredValue, hashmodel::ValueError> {
                hashmodel::json_to_stored(self)
            }

            fn from_stored(
                raw: &str,
            ) -> ::core::result::Result<Self, hashmodel::ValueError> {
                hashmodel::json_from_stored(raw)
            }
        }
    })
}

fn parse_record_field(field: &syn::Field) -> Result<RecordField> {
    let ident = field
        .ident
        .clone()
        .expect("named fields always carry an identifier");

    let mut annotation: Option<String> = None;
    for attr in &field.attrs {
        if !attr.path().is_ident(HASH_ATTRIBUTE_NAME) {
            continue;
        }
        if annotation.is_some() {
            return Err(Error::new_spanned(
                attr,
                format!("duplicate #[{}] attribute", HASH_ATTRIBUTE_NAME),
            ));
        }
        annotation = Some(attr.parse_args::<LitStr>()?.value());
    }

    Ok(RecordField {
        name: ident.to_string(),
        annotation: annotation.unwrap_or_default(),
        type_name: field.ty.to_token_stream().to_string().replace(' ', ""),
        ident,
    })
}

fn named_fields(input: &DeriveInput) -> Result<&FieldsNamed> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named),
            _ => Err(Error::new_spanned(
                &input.ident,
                "HashModel requires a struct with named fields",
            )),
        },
        _ => Err(Error::new_spanned(
            &input.ident,
            "HashModel can only be derived for structs",
        )),
    }
}

fn ensure_no_generics(input: &DeriveInput, derive_name: &str) -> Result<()> {
    if input.generics.params.is_empty() {
        Ok(())
    } else {
        Err(Error::new_spanned(
            &input.generics,
            format!("{} cannot be derived for generic types", derive_name),
        ))
    }
}
