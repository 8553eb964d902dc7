use std::borrow::Cow;
use std::fmt;

use roxmltree::Node;

/// A 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line: {} Column: {}", self.line, self.column)
    }
}

/// A read-only view of one element of a parsed XML tree.
///
/// The decoder only needs these accessors, so any tree builder can be used
/// by implementing this trait. [`XmlElement`] implements it on top of
/// `roxmltree`.
pub trait Element: Sized {
    /// The element's tag name, without any namespace prefix.
    fn tag(&self) -> &str;

    /// The character data preceding the element's first child element, or
    /// `""` if there is none. Comments and processing instructions in that
    /// span are skipped, not treated as terminators.
    fn text(&self) -> Cow<'_, str>;

    /// Looks up an attribute by name.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Child elements in document order. Text, comments and processing
    /// instructions are not included.
    fn children(&self) -> Vec<Self>;

    /// Where the element's start tag begins.
    fn start_position(&self) -> Position;

    /// Where the element's markup ends.
    fn end_position(&self) -> Position;
}

/// An [`Element`] backed by a `roxmltree` node.
#[derive(Debug, Clone, Copy)]
pub struct XmlElement<'a, 'input> {
    node: Node<'a, 'input>,
}

impl<'a, 'input> XmlElement<'a, 'input> {
    /// Wraps an element node. Returns `None` for any other node type.
    pub fn new(node: Node<'a, 'input>) -> Option<Self> {
        node.is_element().then_some(XmlElement { node })
    }

    fn position_at(&self, offset: usize) -> Position {
        let pos = self.node.document().text_pos_at(offset);
        Position::new(pos.row, pos.col)
    }
}

impl Element for XmlElement<'_, '_> {
    fn tag(&self) -> &str {
        self.node.tag_name().name()
    }

    fn text(&self) -> Cow<'_, str> {
        let mut chunks = self
            .node
            .children()
            .take_while(|n| !n.is_element())
            .filter(|n| n.is_text())
            .filter_map(|n| n.text());

        match (chunks.next(), chunks.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => Cow::Borrowed(only),
            (Some(first), Some(second)) => {
                let mut text = String::from(first);
                text.push_str(second);
                text.extend(chunks);
                Cow::Owned(text)
            }
        }
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.node.attribute(name)
    }

    fn children(&self) -> Vec<Self> {
        self.node.children().filter_map(XmlElement::new).collect()
    }

    fn start_position(&self) -> Position {
        self.position_at(self.node.range().start)
    }

    fn end_position(&self) -> Position {
        self.position_at(self.node.range().end)
    }
}

#[cfg(test)]
mod tests {
    use roxmltree::Document;

    use super::{Element, Position, XmlElement};

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(12, 4).to_string(), "Line: 12 Column: 4");
    }

    #[test]
    fn test_xml_element() {
        let doc = Document::parse(
            "<llsd>\n  <binary encoding=\"base16\">00ff</binary><!-- note -->\n  <undef/>text\n</llsd>",
        )
        .unwrap();
        let root = XmlElement::new(doc.root_element()).unwrap();
        assert_eq!(root.tag(), "llsd");
        assert_eq!(root.start_position(), Position::new(1, 1));
        assert_eq!(root.text(), "\n  ");

        let children = root.children();
        assert_eq!(children.len(), 2);

        let binary = &children[0];
        assert_eq!(binary.tag(), "binary");
        assert_eq!(binary.text(), "00ff");
        assert_eq!(binary.attribute("encoding"), Some("base16"));
        assert_eq!(binary.attribute("missing"), None);
        assert_eq!(binary.start_position(), Position::new(2, 3));
        assert_eq!(binary.end_position(), Position::new(2, 42));

        let undef = &children[1];
        assert_eq!(undef.text(), "");
        assert!(undef.children().is_empty());
        assert_eq!(undef.start_position(), Position::new(3, 3));
    }

    #[test]
    fn test_text_skips_comments_and_instructions() {
        let doc = Document::parse(
            "<llsd><a><!-- c -->5</a><b>hello<!-- x --> wor<?pi data?>ld<c/>tail</b><d>x<![CDATA[<y>]]>z</d></llsd>",
        )
        .unwrap();
        let children = XmlElement::new(doc.root_element()).unwrap().children();
        assert_eq!(children[0].text(), "5");
        assert_eq!(children[1].text(), "hello world");
        assert_eq!(children[2].text(), "x<y>z");
    }

    #[test]
    fn test_non_element_node() {
        let doc = Document::parse("<llsd>text</llsd>").unwrap();
        let text = doc.root_element().first_child().unwrap();
        assert!(XmlElement::new(text).is_none());
    }
}
