use crate::node::{Attributes, Element, Node};
use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::trace;

/// Parses an HTML string into a [`Node`] tree.
///
/// Parsing is permissive: malformed markup is repaired by `html5ever` the
/// way a browser would. The returned root is a tagless fragment holding the
/// parser-normalized `html` element. Comments, doctypes and processing
/// instructions are dropped.
///
/// # Examples
///
/// ```
/// use html2asf::parse_html;
///
/// let root = parse_html("<p>Hello</p>");
/// assert_eq!(root.tag(), None);
/// assert_eq!(root.text_content(), "Hello");
/// ```
#[must_use]
pub fn parse_html(html: &str) -> Node {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let dom = parse_document(RcDom::default(), opts).one(html);

    lower(&dom.document).unwrap_or_else(|| Node::fragment(Vec::new()))
}

/// Lowers an rcdom handle into a [`Node`], or `None` for nodes that carry
/// no content.
fn lower(handle: &Handle) -> Option<Node> {
    match handle.data {
        NodeData::Document => Some(Node::fragment(lower_children(handle))),
        NodeData::Text { ref contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let attrs: Attributes = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();

            Some(Node::Element(Element {
                tag: Some(name.local.to_string()),
                attrs,
                children: lower_children(handle),
            }))
        }
        NodeData::Doctype { .. } | NodeData::Comment { .. } | NodeData::ProcessingInstruction { .. } => {
            trace!("Dropping non-content node");
            None
        }
    }
}

fn lower_children(handle: &Handle) -> Vec<Node> {
    handle.children.borrow().iter().filter_map(lower).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(root: &Node) -> &Node {
        root.find(&|n: &Node| n.tag() == Some("body")).unwrap()
    }

    #[test]
    fn test_parse_wraps_in_document() {
        let root = parse_html("<p>Hi</p>");

        assert_eq!(root.tag(), None);
        assert_eq!(root.children()[0].tag(), Some("html"));

        let body = body(&root);
        assert_eq!(body.children()[0].tag(), Some("p"));
    }

    #[test]
    fn test_parse_keeps_attribute_order() {
        let root = parse_html(r#"<a href="x" title="y" class="z">L</a>"#);
        let link = root.find(&|n: &Node| n.tag() == Some("a")).unwrap();

        let Node::Element(el) = link else {
            panic!("expected element");
        };
        let names: Vec<_> = el.attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["href", "title", "class"]);
    }

    #[test]
    fn test_parse_decodes_entities() {
        let root = parse_html("<p>a &amp; b &para;</p>");
        assert_eq!(root.text_content(), "a & b ¶");
    }

    #[test]
    fn test_parse_drops_comments_and_doctype() {
        let root = parse_html("<!DOCTYPE html><!-- note --><p>x</p>");
        assert_eq!(root.text_content(), "x");
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_parse_lowercases_tags() {
        let root = parse_html("<P><STRONG>x</STRONG></P>");
        assert!(root.find(&|n: &Node| n.tag() == Some("strong")).is_some());
    }
}
