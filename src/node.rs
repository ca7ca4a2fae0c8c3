//! In-memory HTML tree consumed by the transcoder.
//!
//! The tree is produced by [`crate::parse_html`] or built by hand, and is
//! never mutated during conversion.

/// Ordered attribute list of an element.
///
/// Order follows the source document. Lookups return the first attribute
/// with a matching name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Creates an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an attribute, keeping insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns the value of the named attribute, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value of the named attribute, or `""` when absent.
    #[must_use]
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Returns true if the named attribute is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A tagged element, or a tagless fragment / document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name; `None` for fragments and the document root
    pub tag: Option<String>,

    /// Attributes in document order
    pub attrs: Attributes,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

/// A node of the HTML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Raw text leaf, already entity-decoded by the parser
    Text(String),

    /// Element or fragment
    Element(Element),
}

impl Node {
    /// Creates a text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a tagged element.
    #[must_use]
    pub fn element(tag: impl Into<String>, attrs: Attributes, children: Vec<Self>) -> Self {
        Self::Element(Element {
            tag: Some(tag.into()),
            attrs,
            children,
        })
    }

    /// Creates a tagless fragment holding `children`.
    #[must_use]
    pub fn fragment(children: Vec<Self>) -> Self {
        Self::Element(Element {
            tag: None,
            attrs: Attributes::new(),
            children,
        })
    }

    /// Returns the tag name, or `None` for text leaves and fragments.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Element(el) => el.tag.as_deref(),
        }
    }

    /// Returns the child nodes; text leaves have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Text(_) => &[],
            Self::Element(el) => &el.children,
        }
    }

    /// Concatenates the text of this node and all its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Returns the first element in document order (depth-first, pre-order)
    /// matching `predicate`, including `self`.
    pub fn find(&self, predicate: &impl Fn(&Self) -> bool) -> Option<&Self> {
        if predicate(self) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(predicate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_lookup() {
        let attrs: Attributes = [("href", "a"), ("href", "b"), ("class", "x")]
            .into_iter()
            .collect();

        assert_eq!(attrs.get("href"), Some("a"));
        assert_eq!(attrs.get_or_empty("style"), "");
        assert!(attrs.contains("class"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_text_content() {
        let node = Node::element(
            "p",
            Attributes::new(),
            vec![
                Node::text("Hello, "),
                Node::element("b", Attributes::new(), vec![Node::text("world")]),
            ],
        );

        assert_eq!(node.text_content(), "Hello, world");
        assert_eq!(Node::text("raw").tag(), None);
        assert!(Node::text("raw").children().is_empty());
    }

    #[test]
    fn test_find_first_match() {
        let tree = Node::fragment(vec![
            Node::element("h2", Attributes::new(), vec![Node::text("first")]),
            Node::element("h2", Attributes::new(), vec![Node::text("second")]),
        ]);

        let found = tree.find(&|n: &Node| n.tag() == Some("h2")).unwrap();
        assert_eq!(found.text_content(), "first");
    }
}
