use roxmltree::{Document, ParsingOptions};
use tracing::{debug, trace};

use crate::error::InvalidValue;
use crate::types::{Tag, parse_boolean, parse_date, parse_integer, parse_real, parse_uuid};
use crate::value::{Binary, Map, Uri, Value};
use crate::{Element, ParseError, ParseErrorKind, ParseResult, XmlElement};

/// Knobs for [`parse_with_options`] and [`decode_document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    max_depth: Option<usize>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects documents whose values nest deeper than `depth` below the
    /// `llsd` root. The root's own children are at depth 1.
    ///
    /// This bounds the decoder's recursion only. `roxmltree` recurses while
    /// building the tree, so untrusted input should also be capped in size
    /// before it reaches [`parse_with_options`].
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

/// Parse an LLSD-XML document.
///
/// Returns `None` when the `llsd` element is empty and the decoded value
/// when it has exactly one child. Several children are returned as an
/// [`Value::Array`], which makes them indistinguishable from a document
/// holding a single array.
pub fn parse(xml: &str) -> ParseResult<Option<Value>> {
    parse_with_options(xml, &DecodeOptions::default())
}

/// Like [`parse`], with explicit [`DecodeOptions`].
pub fn parse_with_options(xml: &str, options: &DecodeOptions) -> ParseResult<Option<Value>> {
    let xml_options = ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xml, xml_options).map_err(|e| {
        debug!("rejected malformed XML: {e}");
        ParseError::from(e)
    })?;
    let root = XmlElement::new(doc.root_element())
        .ok_or_else(|| ParseError::new(ParseErrorKind::Xml("missing root element".to_string())))?;
    decode_document(&root, options)
}

/// Decodes an already parsed document whose root should be `llsd`.
pub fn decode_document<E: Element>(
    root: &E,
    options: &DecodeOptions,
) -> ParseResult<Option<Value>> {
    if !root.tag().eq_ignore_ascii_case("llsd") {
        return Err(ParseError::new(ParseErrorKind::TagNotFound {
            tag: root.tag().to_string(),
            position: root.start_position(),
        }));
    }

    let children = root.children();
    debug!(count = children.len(), "decoding llsd document");

    let mut decoder = Decoder {
        max_depth: options.max_depth,
        depth: 0,
    };
    let mut values = children
        .iter()
        .map(|child| decoder.decode(child))
        .collect::<ParseResult<Vec<_>>>()
        .inspect_err(|e| debug!("decode failed: {e}"))?;

    Ok(match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::Array(values)),
    })
}

/// Decodes a single element and everything below it.
pub fn decode_element<E: Element>(element: &E) -> ParseResult<Value> {
    Decoder {
        max_depth: None,
        depth: 0,
    }
    .decode(element)
}

struct Decoder {
    max_depth: Option<usize>,
    depth: usize,
}

impl Decoder {
    fn decode<E: Element>(&mut self, element: &E) -> ParseResult<Value> {
        self.depth += 1;
        let result = self.decode_at_depth(element);
        self.depth -= 1;
        result
    }

    fn decode_at_depth<E: Element>(&mut self, element: &E) -> ParseResult<Value> {
        if let Some(limit) = self.max_depth
            && self.depth > limit
        {
            return Err(ParseError::new(ParseErrorKind::DepthLimitExceeded {
                limit,
                position: element.start_position(),
            }));
        }

        let Some(tag) = Tag::from_name(element.tag()) else {
            return Err(ParseError::new(ParseErrorKind::UnexpectedType {
                tag: element.tag().to_string(),
                position: element.start_position(),
            }));
        };
        trace!(%tag, position = %element.start_position(), "decoding element");

        let value = match tag {
            Tag::Undef => Value::Undefined,
            Tag::Boolean => Value::Boolean(parse_boolean(element)?),
            Tag::Integer => Value::Integer(parse_integer(element)?),
            Tag::Real => Value::Real(parse_real(element)?),
            Tag::String => Value::String(element.text().into_owned()),
            Tag::Uuid => Value::Uuid(parse_uuid(element)?),
            Tag::Date => Value::Date(parse_date(element)?),
            Tag::Uri => Value::Uri(Uri::new(element.text())),
            Tag::Binary => Value::Binary(Binary::new(
                element
                    .attribute("encoding")
                    .unwrap_or(Binary::DEFAULT_ENCODING),
                element.text(),
            )),
            Tag::Map => Value::Map(self.decode_map(element)?),
            Tag::Array => Value::Array(self.decode_array(element)?),
        };
        Ok(value)
    }

    fn decode_map<E: Element>(&mut self, element: &E) -> ParseResult<Map> {
        let map_position = element.start_position();
        trace!(start = %map_position, end = %element.end_position(), "decoding map");

        let children = element.children();
        if children.len() % 2 != 0 {
            return Err(InvalidValue::OddMapLength { map: map_position }.into());
        }

        let mut map = Map::with_capacity(children.len() / 2);
        for pair in children.chunks_exact(2) {
            let (key, value) = (&pair[0], &pair[1]);
            if !key.tag().eq_ignore_ascii_case("key") {
                return Err(InvalidValue::ExpectedKey {
                    map: map_position,
                    found: key.tag().to_string(),
                    position: key.start_position(),
                }
                .into());
            }

            let key_text = key.text();
            if map.contains_key(&*key_text) {
                return Err(InvalidValue::DuplicateKey {
                    map: map_position,
                    key: key_text.into_owned(),
                    position: key.start_position(),
                }
                .into());
            }
            let value = self.decode(value)?;
            map.insert(key_text.into_owned(), value);
        }

        Ok(map)
    }

    fn decode_array<E: Element>(&mut self, element: &E) -> ParseResult<Vec<Value>> {
        trace!(start = %element.start_position(), end = %element.end_position(), "decoding array");
        element
            .children()
            .iter()
            .map(|child| self.decode(child))
            .collect()
    }
}
