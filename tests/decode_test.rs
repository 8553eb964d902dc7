use std::borrow::Cow;

use chrono::{NaiveDate, Timelike};
use llsd::{
    Binary, DecodeOptions, Element, InvalidValue, Map, ParseError, ParseErrorKind, Position, Tag,
    Value, decode_document, decode_element, parse,
};

/// An in-memory element tree, standing in for a different XML library.
#[derive(Debug, Clone)]
struct Node {
    tag: &'static str,
    text: &'static str,
    attributes: Vec<(&'static str, &'static str)>,
    children: Vec<Node>,
    line: u32,
}

impl Node {
    fn new(tag: &'static str, text: &'static str, line: u32) -> Self {
        Node {
            tag,
            text,
            attributes: Vec::new(),
            children: Vec::new(),
            line,
        }
    }

    fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    fn with_attribute(mut self, name: &'static str, value: &'static str) -> Self {
        self.attributes.push((name, value));
        self
    }
}

impl Element for Node {
    fn tag(&self) -> &str {
        self.tag
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.text)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }

    fn children(&self) -> Vec<Self> {
        self.children.clone()
    }

    fn start_position(&self) -> Position {
        Position::new(self.line, 1)
    }

    fn end_position(&self) -> Position {
        Position::new(self.line, 80)
    }
}

#[test]
fn test_custom_element_tree() {
    let root = Node::new("llsd", "", 1).with_children(vec![
        Node::new("map", "", 2).with_children(vec![
            Node::new("key", "payload", 3),
            Node::new("binary", "00ff", 4).with_attribute("encoding", "base16"),
            Node::new("key", "count", 5),
            Node::new("integer", "-7", 6),
        ]),
    ]);

    let mut expected = Map::new();
    expected.insert(
        "payload".to_string(),
        Value::Binary(Binary::new("base16", "00ff")),
    );
    expected.insert("count".to_string(), Value::Integer(-7));

    assert_eq!(
        decode_document(&root, &DecodeOptions::default()),
        Ok(Some(Value::Map(expected)))
    );
}

#[test]
fn test_custom_element_errors_use_its_positions() {
    let root = Node::new("llsd", "", 1).with_children(vec![
        Node::new("array", "", 2).with_children(vec![
            Node::new("real", "1.0", 3),
            Node::new("real", "one", 4),
        ]),
    ]);

    assert_eq!(
        decode_document(&root, &DecodeOptions::default()),
        Err(ParseError::from(InvalidValue::Scalar {
            tag: Tag::Real,
            text: "one".to_string(),
            position: Position::new(4, 1),
        }))
    );

    let not_llsd = Node::new("plist", "", 9);
    assert_eq!(
        decode_document(&not_llsd, &DecodeOptions::default()),
        Err(ParseError::new(ParseErrorKind::TagNotFound {
            tag: "plist".to_string(),
            position: Position::new(9, 1),
        }))
    );
}

#[test]
fn test_decode_element_without_root() {
    let element = Node::new("Uuid", "", 1);
    assert_eq!(decode_element(&element), Ok(Value::Uuid(llsd::NIL_UUID)));

    let element = Node::new("llsd", "", 1);
    assert_eq!(
        decode_element(&element),
        Err(ParseError::new(ParseErrorKind::UnexpectedType {
            tag: "llsd".to_string(),
            position: Position::new(1, 1),
        }))
    );
}

#[test]
fn test_realistic_document() {
    let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<llsd>
  <map>
    <key>agent_id</key>
    <uuid>3c115e51-04f4-523c-9fa6-98aff1034730</uuid>
    <key>login</key>
    <date>2008-08-22T18:27:36.123456789Z</date>
    <key>seed_capability</key>
    <uri>https://sim.example.com:12043/cap/abc</uri>
    <key>inventory</key>
    <array>
      <map>
        <key>name</key><string>Body Shape</string>
        <key>version</key><real>1.5</real>
      </map>
      <undef />
    </array>
    <key>online</key>
    <boolean>true</boolean>
  </map>
</llsd>"#;

    let value = parse(doc).unwrap().unwrap();
    let map = value.as_map().unwrap();
    assert_eq!(
        map.keys().map(String::as_str).collect::<Vec<_>>(),
        ["agent_id", "login", "seed_capability", "inventory", "online"]
    );
    assert_eq!(
        value.get("agent_id").and_then(Value::as_uuid).map(|id| id.to_string()),
        Some("3c115e51-04f4-523c-9fa6-98aff1034730".to_string())
    );

    let login = value.get("login").and_then(Value::as_date).unwrap();
    assert_eq!(
        login.date_naive(),
        NaiveDate::from_ymd_opt(2008, 8, 22).unwrap()
    );
    assert_eq!(login.nanosecond(), 123_456_000);

    assert_eq!(
        value
            .get("seed_capability")
            .and_then(Value::as_uri)
            .map(|uri| uri.as_str()),
        Some("https://sim.example.com:12043/cap/abc")
    );

    let inventory = value.get("inventory").and_then(Value::as_array).unwrap();
    assert_eq!(inventory.len(), 2);
    assert_eq!(
        inventory[0].get("name").and_then(Value::as_str),
        Some("Body Shape")
    );
    assert_eq!(inventory[0].get("version").and_then(Value::as_real), Some(1.5));
    assert!(inventory[1].is_undefined());
    assert_eq!(value.get("online").and_then(Value::as_bool), Some(true));
}

#[test]
fn test_error_messages() {
    let cases = [
        (
            "<llsd>\n  <date>2006-02-01 14:29:53Z</date>\n</llsd>",
            "parse error: found an invalid value \"2006-02-01 14:29:53Z\" while parsing the date type at Line: 2 Column: 3",
        ),
        (
            "<notllsd/>",
            "parse error: \"llsd\" tag was expected at Line: 1 Column: 1 but was \"notllsd\"",
        ),
        (
            "<llsd>\n<map>\n  <key>a</key><integer>1</integer>\n  <key>a</key><integer>2</integer>\n</map>\n</llsd>",
            "parse error: the map at Line: 2 Column: 1 is invalid, there is a repeated key \"a\" at Line: 4 Column: 3",
        ),
        (
            "<llsd>\n<map>\n  <string>a</string><integer>1</integer>\n</map>\n</llsd>",
            "parse error: the map at Line: 2 Column: 1 is invalid, a \"key\" tag was expected at Line: 3 Column: 3 but was \"string\" instead",
        ),
        (
            "<llsd><map><key>a</key></map></llsd>",
            "parse error: the map at Line: 1 Column: 7 is invalid, the elements count is odd, therefore it can't be organized into key-value pairs",
        ),
        (
            "<llsd><set/></llsd>",
            "parse error: found an unexpected type \"set\" at Line: 1 Column: 7",
        ),
    ];

    for (xml, message) in cases {
        let err = parse(xml).unwrap_err();
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_deep_nesting_with_limit() {
    let depth = 64;
    let xml = format!(
        "<llsd>{}<integer>1</integer>{}</llsd>",
        "<array>".repeat(depth),
        "</array>".repeat(depth)
    );

    let value = llsd::parse_with_options(&xml, &DecodeOptions::new().with_max_depth(depth + 1))
        .unwrap()
        .unwrap();
    let mut current = &value;
    for _ in 0..depth {
        current = &current.as_array().unwrap()[0];
    }
    assert_eq!(current, &Value::Integer(1));

    let err = llsd::parse_with_options(&xml, &DecodeOptions::new().with_max_depth(depth))
        .unwrap_err();
    assert!(matches!(
        err.kind(),
        ParseErrorKind::DepthLimitExceeded { limit, .. } if *limit == depth
    ));
}

#[test]
fn test_value_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
    assert_send_sync::<ParseError>();
}
