use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::InvalidValue;
use crate::{Element, NIL_UUID};

/// The element tags that name an LLSD type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Undef,
    Boolean,
    Integer,
    Real,
    String,
    Uuid,
    Date,
    Uri,
    Binary,
    Map,
    Array,
}

impl Tag {
    pub(crate) const ALL: [Tag; 11] = [
        Tag::Undef,
        Tag::Boolean,
        Tag::Integer,
        Tag::Real,
        Tag::String,
        Tag::Uuid,
        Tag::Date,
        Tag::Uri,
        Tag::Binary,
        Tag::Map,
        Tag::Array,
    ];

    /// Resolves an element tag, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(name))
    }

    /// The canonical, lowercase tag name.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Undef => "undef",
            Tag::Boolean => "boolean",
            Tag::Integer => "integer",
            Tag::Real => "real",
            Tag::String => "string",
            Tag::Uuid => "uuid",
            Tag::Date => "date",
            Tag::Uri => "uri",
            Tag::Binary => "binary",
            Tag::Map => "map",
            Tag::Array => "array",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Result<T> = std::result::Result<T, InvalidValue>;

fn invalid<E: Element>(tag: Tag, element: &E) -> InvalidValue {
    InvalidValue::Scalar {
        tag,
        text: element.text().into_owned(),
        position: element.start_position(),
    }
}

pub(crate) fn parse_boolean<E: Element>(element: &E) -> Result<bool> {
    const FALSE: [&str; 4] = ["0", "0.0", "false", ""];
    const TRUE: [&str; 3] = ["1", "1.0", "true"];

    let text = element.text();
    if FALSE.iter().any(|s| s.eq_ignore_ascii_case(&text)) {
        Ok(false)
    } else if TRUE.iter().any(|s| s.eq_ignore_ascii_case(&text)) {
        Ok(true)
    } else {
        Err(invalid(Tag::Boolean, element))
    }
}

pub(crate) fn parse_integer<E: Element>(element: &E) -> Result<i64> {
    match &*element.text() {
        "" => Ok(0),
        text => text.parse().map_err(|_| invalid(Tag::Integer, element)),
    }
}

pub(crate) fn parse_real<E: Element>(element: &E) -> Result<f64> {
    match &*element.text() {
        "" => Ok(0.0),
        text => text.parse().map_err(|_| invalid(Tag::Real, element)),
    }
}

pub(crate) fn parse_uuid<E: Element>(element: &E) -> Result<Uuid> {
    const HYPHENATED_LEN: usize = 36;

    match &*element.text() {
        "" => Ok(NIL_UUID),
        // The length check rejects the simple, braced and urn forms that
        // `Uuid::try_parse` also accepts.
        text if text.len() == HYPHENATED_LEN => {
            Uuid::try_parse(text).map_err(|_| invalid(Tag::Uuid, element))
        }
        _ => Err(invalid(Tag::Uuid, element)),
    }
}

pub(crate) fn parse_date<E: Element>(element: &E) -> Result<DateTime<Utc>> {
    match &*element.text() {
        "" => Ok(DateTime::<Utc>::UNIX_EPOCH),
        text => match_date(text).ok_or_else(|| invalid(Tag::Date, element)),
    }
}

/// Matches `YYYY-MM-DDThh:mm:ss(.f+)?Z` exactly.
fn match_date(text: &str) -> Option<DateTime<Utc>> {
    let mut cursor = DateCursor {
        rest: text.as_bytes(),
    };

    let year = cursor.digits(4)?;
    cursor.literal(b'-')?;
    let month = cursor.digits(2)?;
    cursor.literal(b'-')?;
    let day = cursor.digits(2)?;
    cursor.literal(b'T')?;
    let hour = cursor.digits(2)?;
    cursor.literal(b':')?;
    let minute = cursor.digits(2)?;
    cursor.literal(b':')?;
    let second = cursor.digits(2)?;
    let micros = if cursor.literal(b'.').is_some() {
        cursor.fraction_micros()?
    } else {
        0
    };
    cursor.literal(b'Z')?;
    if !cursor.rest.is_empty() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    let datetime = date.and_hms_micro_opt(hour, minute, second, micros)?;
    Some(datetime.and_utc())
}

struct DateCursor<'a> {
    rest: &'a [u8],
}

impl DateCursor<'_> {
    fn literal(&mut self, expected: u8) -> Option<()> {
        let (&first, rest) = self.rest.split_first()?;
        if first != expected {
            return None;
        }
        self.rest = rest;
        Some(())
    }

    fn digits(&mut self, count: usize) -> Option<u32> {
        if self.rest.len() < count {
            return None;
        }
        let (digits, rest) = self.rest.split_at(count);
        let mut value = 0;
        for &b in digits {
            if !b.is_ascii_digit() {
                return None;
            }
            value = value * 10 + u32::from(b - b'0');
        }
        self.rest = rest;
        Some(value)
    }

    /// Consumes one or more digits, truncating them to microseconds.
    fn fraction_micros(&mut self) -> Option<u32> {
        let len = self.rest.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(len);
        let micros = digits
            .iter()
            .chain(std::iter::repeat(&b'0'))
            .take(6)
            .fold(0, |acc, &b| acc * 10 + u32::from(b - b'0'));
        self.rest = rest;
        Some(micros)
    }
}
