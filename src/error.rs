use thiserror::Error;

use crate::Position;
use crate::types::Tag;

/// Structural or grammatical reasons an element's content was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidValue {
    #[error("found an invalid value \"{text}\" while parsing the {tag} type at {position}")]
    Scalar {
        tag: Tag,
        text: String,
        position: Position,
    },

    #[error(
        "the map at {map} is invalid, the elements count is odd, therefore it can't be organized into key-value pairs"
    )]
    OddMapLength { map: Position },

    #[error(
        "the map at {map} is invalid, a \"key\" tag was expected at {position} but was \"{found}\" instead"
    )]
    ExpectedKey {
        map: Position,
        found: String,
        position: Position,
    },

    #[error("the map at {map} is invalid, there is a repeated key \"{key}\" at {position}")]
    DuplicateKey {
        map: Position,
        key: String,
        position: Position,
    },
}

impl InvalidValue {
    /// Returns the position of the element that triggered the failure.
    pub fn position(&self) -> Position {
        match self {
            InvalidValue::Scalar { position, .. } => *position,
            InvalidValue::OddMapLength { map } => *map,
            InvalidValue::ExpectedKey { position, .. } => *position,
            InvalidValue::DuplicateKey { position, .. } => *position,
        }
    }
}

/// Specific kinds of errors that can occur when decoding an LLSD-XML
/// document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("\"llsd\" tag was expected at {position} but was \"{tag}\"")]
    TagNotFound { tag: String, position: Position },

    #[error("found an unexpected type \"{tag}\" at {position}")]
    UnexpectedType { tag: String, position: Position },

    #[error(transparent)]
    InvalidValue(#[from] InvalidValue),

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("nesting exceeds the maximum depth of {limit} at {position}")]
    DepthLimitExceeded { limit: usize, position: Position },
}

/// Error type returned when decoding LLSD-XML fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error: {kind}")]
pub struct ParseError {
    /// The specific kind of parse error that occurred.
    kind: ParseErrorKind,
}

impl ParseError {
    /// Creates a new ParseError with the given kind.
    pub const fn new(kind: ParseErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of parse error that occurred.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Returns the source position of the offending element, if the error
    /// is tied to one.
    pub fn position(&self) -> Option<Position> {
        match &self.kind {
            ParseErrorKind::TagNotFound { position, .. }
            | ParseErrorKind::UnexpectedType { position, .. }
            | ParseErrorKind::DepthLimitExceeded { position, .. } => Some(*position),
            ParseErrorKind::InvalidValue(invalid) => Some(invalid.position()),
            ParseErrorKind::Xml(_) => None,
        }
    }
}

impl From<InvalidValue> for ParseError {
    fn from(invalid: InvalidValue) -> Self {
        ParseError::new(ParseErrorKind::InvalidValue(invalid))
    }
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        ParseError::new(ParseErrorKind::Xml(err.to_string()))
    }
}

/// Result type for decoding operations.
pub type ParseResult<T> = Result<T, ParseError>;
