//! A decoder for LLSD (Linden Lab Structured Data) documents in their XML
//! encoding.
//!
//! LLSD has nine scalar types (`undef`, `boolean`, `integer`, `real`,
//! `string`, `uuid`, `date`, `uri`, `binary`) and two containers (`map`,
//! `array`). A document is a single `<llsd>` element wrapping the payload.
//! Decoding is strict: scalars must match their grammar exactly, map keys
//! must be unique, and every error reports the line and column of the
//! offending element.
//!
//! # Examples
//!
//! ```
//! use llsd::{Value, parse};
//!
//! let doc = r#"<llsd>
//!   <map>
//!     <key>name</key><string>Ahern</string>
//!     <key>region_x</key><integer>256000</integer>
//!   </map>
//! </llsd>"#;
//!
//! let value = parse(doc).unwrap().unwrap();
//! assert_eq!(value.get("name"), Some(&Value::String("Ahern".to_string())));
//! assert_eq!(value.get("region_x").and_then(Value::as_integer), Some(256000));
//! ```

mod element;
mod error;
mod parse;
mod types;
mod value;

pub use crate::element::{Element, Position, XmlElement};
pub use crate::error::{InvalidValue, ParseError, ParseErrorKind, ParseResult};
pub use crate::parse::{DecodeOptions, decode_document, decode_element, parse, parse_with_options};
pub use crate::types::Tag;
pub use crate::value::{Binary, Map, NIL_UUID, Uri, Value};
